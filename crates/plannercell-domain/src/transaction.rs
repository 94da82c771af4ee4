//! A single income or expense entry.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Category, DomainError, MonthKey, TransactionKind};

/// Largest accepted amount (one trillion). Keeps every monthly sum far below
/// `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Validated ledger entry. The month partition is always derived from `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TransactionRepr", into = "TransactionRepr")]
pub struct Transaction {
    id: String,
    category: Category,
    amount: Decimal,
    description: String,
    date: NaiveDate,
}

impl Transaction {
    /// Creates a transaction with a freshly generated identifier.
    pub fn new(
        category: Category,
        amount: Decimal,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Result<Self, DomainError> {
        Self::with_id(Uuid::new_v4().to_string(), category, amount, description, date)
    }

    pub fn with_id(
        id: impl Into<String>,
        category: Category,
        amount: Decimal,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Result<Self, DomainError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::NegativeAmount(amount.to_string()));
        }
        if amount > MAX_AMOUNT {
            return Err(DomainError::AmountTooLarge(amount.to_string()));
        }
        let description = description.into().trim().to_string();
        if description.is_empty() {
            return Err(DomainError::EmptyDescription);
        }
        let id = id.into();
        let id = if id.trim().is_empty() {
            Uuid::new_v4().to_string()
        } else {
            id
        };
        Ok(Self {
            id,
            category,
            amount,
            description,
            date,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> TransactionKind {
        self.category.kind()
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn month_key(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }
}

/// Flat persisted shape. Also accepts the field names written by the legacy web client.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionRepr {
    #[serde(default)]
    id: String,
    #[serde(alias = "tipo")]
    kind: TransactionKind,
    #[serde(alias = "categoria")]
    category: String,
    #[serde(alias = "valor")]
    amount: Decimal,
    #[serde(alias = "descricao", default)]
    description: String,
    #[serde(alias = "data", with = "date_format")]
    date: NaiveDate,
    // Written for readers of the blob; recomputed from `date` when loading.
    #[serde(alias = "mesAno", default, skip_serializing_if = "Option::is_none")]
    month_key: Option<String>,
}

impl TryFrom<TransactionRepr> for Transaction {
    type Error = DomainError;

    fn try_from(repr: TransactionRepr) -> Result<Self, Self::Error> {
        let category = Category::parse(repr.kind, &repr.category)?;
        Transaction::with_id(repr.id, category, repr.amount, repr.description, repr.date)
    }
}

impl From<Transaction> for TransactionRepr {
    fn from(txn: Transaction) -> Self {
        let month_key = Some(txn.month_key().to_string());
        Self {
            id: txn.id,
            kind: txn.category.kind(),
            category: txn.category.label().to_string(),
            amount: txn.amount,
            description: txn.description,
            date: txn.date,
            month_key,
        }
    }
}

/// ISO-8601 dates. Reading also accepts full date-times, keeping only the calendar date.
pub mod date_format {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::DomainError;

    const DATE_FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<NaiveDate, DomainError> {
        let value = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
            return Ok(date);
        }
        if let Ok(stamp) = DateTime::parse_from_rfc3339(value) {
            return Ok(stamp.date_naive());
        }
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|stamp| stamp.date())
            .map_err(|_| DomainError::InvalidDate(raw.to_string()))
    }
}
