//! Transaction kinds and the fixed category sets attached to each kind.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[serde(alias = "receita")]
    Income,
    #[serde(alias = "despesa")]
    Expense,
}

impl TransactionKind {
    pub fn categories(self) -> Vec<Category> {
        match self {
            TransactionKind::Income => IncomeCategory::ALL
                .iter()
                .copied()
                .map(Category::Income)
                .collect(),
            TransactionKind::Expense => ExpenseCategory::ALL
                .iter()
                .copied()
                .map(Category::Expense)
                .collect(),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncomeCategory {
    Salary,
    Freelance,
    Investments,
    Other,
}

impl IncomeCategory {
    pub const ALL: [IncomeCategory; 4] = [
        IncomeCategory::Salary,
        IncomeCategory::Freelance,
        IncomeCategory::Investments,
        IncomeCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            IncomeCategory::Salary => "Salário",
            IncomeCategory::Freelance => "Freelance",
            IncomeCategory::Investments => "Investimentos",
            IncomeCategory::Other => "Outros",
        }
    }

    fn alias(self) -> &'static str {
        match self {
            IncomeCategory::Salary => "salary",
            IncomeCategory::Freelance => "freelance",
            IncomeCategory::Investments => "investments",
            IncomeCategory::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpenseCategory {
    Food,
    Transport,
    Housing,
    Health,
    Education,
    Leisure,
    CreditCard,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 8] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Housing,
        ExpenseCategory::Health,
        ExpenseCategory::Education,
        ExpenseCategory::Leisure,
        ExpenseCategory::CreditCard,
        ExpenseCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExpenseCategory::Food => "Alimentação",
            ExpenseCategory::Transport => "Transporte",
            ExpenseCategory::Housing => "Moradia",
            ExpenseCategory::Health => "Saúde",
            ExpenseCategory::Education => "Educação",
            ExpenseCategory::Leisure => "Lazer",
            ExpenseCategory::CreditCard => "Cartão de Crédito",
            ExpenseCategory::Other => "Outros",
        }
    }

    fn alias(self) -> &'static str {
        match self {
            ExpenseCategory::Food => "food",
            ExpenseCategory::Transport => "transport",
            ExpenseCategory::Housing => "housing",
            ExpenseCategory::Health => "health",
            ExpenseCategory::Education => "education",
            ExpenseCategory::Leisure => "leisure",
            ExpenseCategory::CreditCard => "credit card",
            ExpenseCategory::Other => "other",
        }
    }
}

/// A category bound to its transaction kind, so the two can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Income(IncomeCategory),
    Expense(ExpenseCategory),
}

impl Category {
    pub fn kind(&self) -> TransactionKind {
        match self {
            Category::Income(_) => TransactionKind::Income,
            Category::Expense(_) => TransactionKind::Expense,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Income(category) => category.label(),
            Category::Expense(category) => category.label(),
        }
    }

    /// Resolves a user or persisted label within the set allowed for `kind`.
    ///
    /// Matching ignores case, surrounding whitespace and Portuguese accents, and
    /// also accepts the English names (`salary`, `housing`, `credit card`).
    pub fn parse(kind: TransactionKind, label: &str) -> Result<Self, DomainError> {
        let wanted = fold(label);
        let found = match kind {
            TransactionKind::Income => IncomeCategory::ALL
                .iter()
                .find(|c| fold(c.label()) == wanted || c.alias() == wanted)
                .map(|c| Category::Income(*c)),
            TransactionKind::Expense => ExpenseCategory::ALL
                .iter()
                .find(|c| fold(c.label()) == wanted || c.alias() == wanted)
                .map(|c| Category::Expense(*c)),
        };
        found.ok_or_else(|| DomainError::UnknownCategory {
            kind: kind.to_string(),
            label: label.trim().to_string(),
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn fold(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' | 'ü' => 'u',
            'ç' => 'c',
            '-' | '_' => ' ',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_labels_with_or_without_accents() {
        let salary = Category::Income(IncomeCategory::Salary);
        assert_eq!(Category::parse(TransactionKind::Income, "Salário"), Ok(salary));
        assert_eq!(Category::parse(TransactionKind::Income, "salario"), Ok(salary));
        assert_eq!(Category::parse(TransactionKind::Income, " SALARY "), Ok(salary));
        assert_eq!(
            Category::parse(TransactionKind::Expense, "cartao-de-credito"),
            Ok(Category::Expense(ExpenseCategory::CreditCard))
        );
    }

    #[test]
    fn parse_is_scoped_to_kind() {
        let err = Category::parse(TransactionKind::Income, "Moradia").unwrap_err();
        assert!(matches!(err, DomainError::UnknownCategory { .. }));
        assert!(Category::parse(TransactionKind::Expense, "Moradia").is_ok());
    }

    #[test]
    fn shared_label_resolves_per_kind() {
        let income = Category::parse(TransactionKind::Income, "Outros").unwrap();
        let expense = Category::parse(TransactionKind::Expense, "Outros").unwrap();
        assert_eq!(income.kind(), TransactionKind::Income);
        assert_eq!(expense.kind(), TransactionKind::Expense);
        assert_ne!(income, expense);
    }

    #[test]
    fn kind_lists_its_categories_in_display_order() {
        let labels: Vec<_> = TransactionKind::Income
            .categories()
            .iter()
            .map(|c| c.label())
            .collect();
        assert_eq!(labels, ["Salário", "Freelance", "Investimentos", "Outros"]);
        assert_eq!(TransactionKind::Expense.categories().len(), 8);
    }
}
