use plannercell_domain::{Category, Transaction};

/// Narrows a month's transaction list the way the list view does.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Case-insensitive substring of the description or category label.
    pub term: Option<String>,
    pub category: Option<Category>,
}

impl TransactionFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(category) = self.category {
            if txn.category() != category {
                return false;
            }
        }
        match self.term.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                txn.description().to_lowercase().contains(&term)
                    || txn.category().label().to_lowercase().contains(&term)
            }
        }
    }

    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions.iter().filter(|txn| self.matches(txn)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use plannercell_domain::{ExpenseCategory, IncomeCategory};
    use rust_decimal_macros::dec;

    fn sample() -> Vec<Transaction> {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        vec![
            Transaction::new(Category::Expense(ExpenseCategory::Food), dec!(30), "Mercado", date)
                .unwrap(),
            Transaction::new(Category::Expense(ExpenseCategory::Leisure), dec!(45), "Cinema", date)
                .unwrap(),
            Transaction::new(Category::Income(IncomeCategory::Salary), dec!(3000), "Empresa", date)
                .unwrap(),
        ]
    }

    #[test]
    fn term_matches_description_or_category() {
        let txns = sample();
        let by_description = TransactionFilter {
            term: Some("cine".into()),
            category: None,
        };
        assert_eq!(by_description.apply(&txns).len(), 1);

        let by_category = TransactionFilter {
            term: Some("SALÁRIO".into()),
            category: None,
        };
        assert_eq!(by_category.apply(&txns)[0].description(), "Empresa");
    }

    #[test]
    fn category_filter_combines_with_term() {
        let txns = sample();
        let filter = TransactionFilter {
            term: Some("a".into()),
            category: Some(Category::Expense(ExpenseCategory::Food)),
        };
        let found = filter.apply(&txns);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description(), "Mercado");
        assert_eq!(TransactionFilter::default().apply(&txns).len(), 3);
    }
}
