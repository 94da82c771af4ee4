//! Raw transaction input as captured by a form or command line.

use std::str::FromStr;

use chrono::NaiveDate;
use plannercell_domain::{Category, Transaction, TransactionKind, MAX_AMOUNT};
use rust_decimal::Decimal;

use crate::CoreError;

/// Unvalidated input. [`TransactionDraft::validate`] either yields a complete
/// [`Transaction`] or a validation error; nothing partial ever reaches the ledger.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub category: Option<String>,
    pub amount: Option<String>,
    pub description: String,
    pub date: NaiveDate,
}

impl TransactionDraft {
    pub fn new(kind: TransactionKind, date: NaiveDate) -> Self {
        Self {
            kind,
            category: None,
            amount: None,
            description: String::new(),
            date,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn validate(&self) -> Result<Transaction, CoreError> {
        let label = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| CoreError::Validation("category is required".into()))?;
        let category = Category::parse(self.kind, label)?;

        let raw_amount = self
            .amount
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| CoreError::Validation("amount is required".into()))?;
        let amount = parse_amount(raw_amount)?;

        if self.description.trim().is_empty() {
            return Err(CoreError::Validation("description is required".into()));
        }

        Ok(Transaction::new(category, amount, &self.description, self.date)?)
    }
}

/// Parses `1200.50`, `1200,50`, `1.200,50` or `1.200` into an exact decimal
/// with at most two places.
///
/// Without a decimal comma, dots followed by groups of exactly three digits
/// are thousands separators.
pub fn parse_amount(raw: &str) -> Result<Decimal, CoreError> {
    let cleaned = raw.trim().trim_start_matches("R$").trim().replace(' ', "");
    let normalized = if cleaned.contains(',') || is_dot_grouped(&cleaned) {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };
    let amount = Decimal::from_str(&normalized)
        .map_err(|_| CoreError::Validation(format!("`{}` is not a valid amount", raw.trim())))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(CoreError::Validation("amount must not be negative".into()));
    }
    if amount > MAX_AMOUNT {
        return Err(CoreError::Validation(format!(
            "amount must not exceed {MAX_AMOUNT}"
        )));
    }
    if amount.normalize().scale() > 2 {
        return Err(CoreError::Validation(
            "amount supports at most two decimal places".into(),
        ));
    }
    Ok(amount)
}

fn is_dot_grouped(value: &str) -> bool {
    let mut groups = value.split('.');
    let lead = groups.next().unwrap_or_default();
    let lead_ok = (1..=3).contains(&lead.len())
        && !lead.starts_with('0')
        && lead.chars().all(|c| c.is_ascii_digit());
    let mut rest = groups.peekable();
    lead_ok
        && rest.peek().is_some()
        && rest.all(|group| group.len() == 3 && group.chars().all(|c| c.is_ascii_digit()))
}
