//! Per-month aggregates derived from a transaction list.
//!
//! [`aggregate`] is the only way to build a [`MonthlyRecord`], so totals and
//! category breakdowns can never drift from the transactions they summarize.
//! Deserialized records go through it as well; persisted totals are ignored.

use plannercell_domain::{Category, MonthKey, Transaction, TransactionKind};
use rust_decimal::Decimal;
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

/// Amount per category, kept in order of first occurrence.
///
/// Sums saturate at `Decimal::MAX` instead of panicking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals {
    entries: Vec<(Category, Decimal)>,
}

impl CategoryTotals {
    fn add(&mut self, category: Category, amount: Decimal) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == category) {
            Some((_, total)) => *total = total.saturating_add(amount),
            None => self.entries.push((category, amount)),
        }
    }

    pub fn get(&self, category: Category) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == category)
            .map(|(_, amount)| *amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, Decimal)> + '_ {
        self.entries.iter().copied()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.entries.iter().map(|(category, _)| *category).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> Decimal {
        self.entries
            .iter()
            .fold(Decimal::ZERO, |sum, (_, amount)| sum.saturating_add(*amount))
    }
}

impl Serialize for CategoryTotals {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, amount) in &self.entries {
            map.serialize_entry(category.label(), amount)?;
        }
        map.end()
    }
}

/// Aggregated view of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "MonthlyRecordRepr")]
pub struct MonthlyRecord {
    month_key: MonthKey,
    transactions: Vec<Transaction>,
    total_income: Decimal,
    total_expense: Decimal,
    balance: Decimal,
    income_by_category: CategoryTotals,
    expense_by_category: CategoryTotals,
}

impl MonthlyRecord {
    /// Zero totals, no transactions.
    pub fn empty(month_key: MonthKey) -> Self {
        aggregate(month_key, Vec::new())
    }

    pub fn month_key(&self) -> MonthKey {
        self.month_key
    }

    /// Transactions, newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn into_transactions(self) -> Vec<Transaction> {
        self.transactions
    }

    pub fn has_transactions(&self) -> bool {
        !self.transactions.is_empty()
    }

    pub fn total_income(&self) -> Decimal {
        self.total_income
    }

    pub fn total_expense(&self) -> Decimal {
        self.total_expense
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn income_by_category(&self) -> &CategoryTotals {
        &self.income_by_category
    }

    pub fn expense_by_category(&self) -> &CategoryTotals {
        &self.expense_by_category
    }

    pub fn by_category(&self, kind: TransactionKind) -> &CategoryTotals {
        match kind {
            TransactionKind::Income => &self.income_by_category,
            TransactionKind::Expense => &self.expense_by_category,
        }
    }

    pub fn total(&self, kind: TransactionKind) -> Decimal {
        match kind {
            TransactionKind::Income => self.total_income,
            TransactionKind::Expense => self.total_expense,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MonthlyRecordRepr {
    #[serde(alias = "mesAno")]
    month_key: MonthKey,
    #[serde(alias = "transacoes", default)]
    transactions: Vec<Transaction>,
}

impl From<MonthlyRecordRepr> for MonthlyRecord {
    fn from(repr: MonthlyRecordRepr) -> Self {
        aggregate(repr.month_key, repr.transactions)
    }
}

/// Builds the record for `month_key` from `transactions`.
///
/// The caller is expected to pass transactions of that month only; the list is
/// kept as given.
pub fn aggregate(month_key: MonthKey, transactions: Vec<Transaction>) -> MonthlyRecord {
    let mut income_by_category = CategoryTotals::default();
    let mut expense_by_category = CategoryTotals::default();
    for txn in &transactions {
        match txn.kind() {
            TransactionKind::Income => income_by_category.add(txn.category(), txn.amount()),
            TransactionKind::Expense => expense_by_category.add(txn.category(), txn.amount()),
        }
    }
    let total_income = income_by_category.total();
    let total_expense = expense_by_category.total();
    MonthlyRecord {
        month_key,
        transactions,
        total_income,
        total_expense,
        balance: total_income.saturating_sub(total_expense),
        income_by_category,
        expense_by_category,
    }
}

/// Percentage of `part` within `total`, rounded to two places. Zero when `total` is zero.
pub fn share_of(part: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    (part * Decimal::ONE_HUNDRED / total).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use plannercell_domain::{ExpenseCategory, IncomeCategory};
    use rust_decimal_macros::dec;

    fn march() -> MonthKey {
        MonthKey::new(2024, 3).unwrap()
    }

    fn txn(category: Category, amount: Decimal, day: u32) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        Transaction::new(category, amount, "entry", date).unwrap()
    }

    #[test]
    fn empty_input_yields_zero_record() {
        let record = aggregate(march(), Vec::new());
        assert_eq!(record.total_income(), Decimal::ZERO);
        assert_eq!(record.total_expense(), Decimal::ZERO);
        assert_eq!(record.balance(), Decimal::ZERO);
        assert!(record.income_by_category().is_empty());
        assert!(record.expense_by_category().is_empty());
        assert_eq!(record, MonthlyRecord::empty(march()));
    }

    #[test]
    fn totals_match_breakdowns() {
        let food = Category::Expense(ExpenseCategory::Food);
        let record = aggregate(
            march(),
            vec![
                txn(Category::Income(IncomeCategory::Salary), dec!(3000.00), 5),
                txn(food, dec!(45.10), 6),
                txn(Category::Income(IncomeCategory::Freelance), dec!(420.35), 7),
                txn(food, dec!(19.90), 8),
                txn(Category::Expense(ExpenseCategory::Housing), dec!(1200.50), 10),
            ],
        );
        assert_eq!(record.total_income(), dec!(3420.35));
        assert_eq!(record.total_expense(), dec!(1265.50));
        assert_eq!(record.balance(), record.total_income() - record.total_expense());
        assert_eq!(record.income_by_category().total(), record.total_income());
        assert_eq!(record.expense_by_category().total(), record.total_expense());
        assert_eq!(record.expense_by_category().get(food), Some(dec!(65.00)));
    }

    #[test]
    fn breakdown_keeps_first_occurrence_order() {
        let leisure = Category::Expense(ExpenseCategory::Leisure);
        let health = Category::Expense(ExpenseCategory::Health);
        let record = aggregate(
            march(),
            vec![
                txn(leisure, dec!(10), 1),
                txn(health, dec!(20), 2),
                txn(leisure, dec!(5), 3),
            ],
        );
        assert_eq!(record.expense_by_category().categories(), vec![leisure, health]);
    }

    #[test]
    fn sums_saturate_instead_of_overflowing() {
        let mut totals = CategoryTotals::default();
        let leisure = Category::Expense(ExpenseCategory::Leisure);
        totals.add(leisure, Decimal::MAX);
        totals.add(leisure, Decimal::MAX);
        totals.add(Category::Expense(ExpenseCategory::Health), Decimal::MAX);
        assert_eq!(totals.get(leisure), Some(Decimal::MAX));
        assert_eq!(totals.total(), Decimal::MAX);
    }

    #[test]
    fn share_of_guards_zero_totals() {
        assert_eq!(share_of(dec!(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(share_of(dec!(1200.50), dec!(1200.50)), dec!(100));
        assert_eq!(share_of(dec!(1), dec!(3)), dec!(33.33));
    }

    #[test]
    fn serialized_breakdown_is_a_label_map() {
        let record = aggregate(
            march(),
            vec![txn(Category::Income(IncomeCategory::Salary), dec!(3000.00), 5)],
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["monthKey"], "2024-03");
        assert_eq!(value["incomeByCategory"]["Salário"], "3000.00");
        assert!(value["expenseByCategory"].as_object().unwrap().is_empty());
    }

    #[test]
    fn deserializing_recomputes_stale_totals() {
        let raw = r#"{
            "monthKey": "2024-03",
            "transactions": [{"id":"a","kind":"income","category":"Freelance",
                "amount":"100.00","description":"gig","date":"2024-03-02"}],
            "totalIncome": "999.00",
            "balance": "-5"
        }"#;
        let record: MonthlyRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.total_income(), dec!(100.00));
        assert_eq!(record.balance(), dec!(100.00));
    }
}
