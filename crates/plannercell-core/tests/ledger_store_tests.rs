use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use chrono::NaiveDate;
use plannercell_core::{
    storage::{HISTORY_KEY, LAST_OBSERVED_MONTH_KEY},
    CoreError, KeyValueStore, LedgerStore, MemoryStore,
};
use plannercell_core::TransactionDraft;
use plannercell_domain::{
    Category, ExpenseCategory, IncomeCategory, MonthKey, Transaction, TransactionKind, MAX_AMOUNT,
};
use rust_decimal_macros::dec;

/// Memory store whose writes can be switched off to simulate a full disk, and
/// whose next `fail_reads` reads return an I/O error.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
    fail_reads: AtomicUsize,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let pending = self.fail_reads.load(Ordering::SeqCst);
        if pending > 0 {
            self.fail_reads.store(pending - 1, Ordering::SeqCst);
            return Err(CoreError::Storage("input/output error".into()));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("quota exceeded".into()));
        }
        self.inner.set(key, value)
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn month(raw: &str) -> MonthKey {
    raw.parse().unwrap()
}

fn salary(day: NaiveDate) -> Transaction {
    Transaction::new(
        Category::Income(IncomeCategory::Salary),
        dec!(3000.00),
        "Salário",
        day,
    )
    .unwrap()
}

fn expense(category: ExpenseCategory, amount: rust_decimal::Decimal, day: NaiveDate) -> Transaction {
    Transaction::new(Category::Expense(category), amount, "gasto", day).unwrap()
}

#[test]
fn missing_blob_loads_empty_history() {
    let (store, report) = LedgerStore::load(Box::new(MemoryStore::new()));
    assert!(store.history().is_empty());
    assert!(report.warnings.is_empty());
}

#[test]
fn persisted_history_round_trips_with_dates() {
    let shared = Arc::new(MemoryStore::new());
    let (mut store, _) = LedgerStore::load(Box::new(shared.clone()));
    store.add_transaction(salary(date(2024, 3, 5)), month("2024-03")).unwrap();
    store
        .add_transaction(expense(ExpenseCategory::Health, dec!(250.00), date(2024, 1, 31)), month("2024-03"))
        .unwrap();
    store
        .add_transaction(expense(ExpenseCategory::Housing, dec!(1200.50), date(2024, 3, 10)), month("2024-03"))
        .unwrap();

    let (reloaded, report) = LedgerStore::load(Box::new(shared));
    assert!(report.warnings.is_empty());
    assert_eq!(reloaded.history(), store.history());
    assert_eq!(reloaded.month_keys(), vec![month("2024-03"), month("2024-01")]);
    assert_eq!(
        reloaded.get_month(month("2024-01")).transactions()[0].date(),
        date(2024, 1, 31)
    );
}

#[test]
fn upsert_is_idempotent() {
    let (mut store, _) = LedgerStore::load(Box::new(MemoryStore::new()));
    let txns = vec![
        expense(ExpenseCategory::Food, dec!(12.00), date(2024, 3, 2)),
        salary(date(2024, 3, 1)),
    ];
    store.upsert_month(month("2024-03"), txns.clone()).unwrap();
    let first = store.history().to_vec();
    store.upsert_month(month("2024-03"), txns).unwrap();
    assert_eq!(store.history(), first.as_slice());
    assert_eq!(store.history().len(), 1);
}

#[test]
fn upsert_rejects_transactions_from_other_months() {
    let (mut store, _) = LedgerStore::load(Box::new(MemoryStore::new()));
    let err = store
        .upsert_month(month("2024-03"), vec![salary(date(2024, 2, 28))])
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
    assert!(store.history().is_empty());
}

#[test]
fn duplicate_ids_are_rejected_before_mutation() {
    let (mut store, _) = LedgerStore::load(Box::new(MemoryStore::new()));
    let txn = salary(date(2024, 3, 5));
    store.add_transaction(txn.clone(), month("2024-03")).unwrap();
    let err = store.add_transaction(txn, month("2024-03")).unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
    assert_eq!(store.get_month(month("2024-03")).transactions().len(), 1);
}

#[test]
fn write_failure_is_recoverable_and_keeps_memory_state() {
    let flaky = Arc::new(FlakyStore::default());
    let (mut store, _) = LedgerStore::load(Box::new(flaky.clone()));
    store.add_transaction(salary(date(2024, 3, 5)), month("2024-03")).unwrap();

    flaky.fail_writes.store(true, Ordering::SeqCst);
    let err = store
        .add_transaction(expense(ExpenseCategory::Leisure, dec!(40.00), date(2024, 3, 6)), month("2024-03"))
        .unwrap_err();
    assert!(matches!(err, CoreError::Persistence(_)));
    assert!(err.is_recoverable());
    assert_eq!(store.get_month(month("2024-03")).total_expense(), dec!(40.00));

    let (on_disk, _) = LedgerStore::load(Box::new(flaky.clone()));
    assert_eq!(on_disk.get_month(month("2024-03")).total_expense(), dec!(0));
}

#[test]
fn corrupt_blob_falls_back_to_empty_and_is_quarantined() {
    let shared = Arc::new(MemoryStore::with_value(HISTORY_KEY, "[{\"monthKey\": \"2024-03\""));
    let (store, report) = LedgerStore::load(Box::new(shared.clone()));
    assert!(store.history().is_empty());
    assert_eq!(report.warnings.len(), 1);
    let quarantined = shared.get(&format!("{HISTORY_KEY}.corrupt")).unwrap();
    assert_eq!(quarantined.as_deref(), Some("[{\"monthKey\": \"2024-03\""));
}

#[test]
fn unparseable_dates_count_as_corruption() {
    let blob = r#"[{"monthKey":"2024-03","transactions":[{"id":"1","kind":"income",
        "category":"Freelance","amount":"10","description":"x","date":"not-a-date"}]}]"#;
    let (store, report) = LedgerStore::load(Box::new(MemoryStore::with_value(HISTORY_KEY, blob)));
    assert!(store.history().is_empty());
    assert!(!report.warnings.is_empty());
}

#[test]
fn legacy_blob_is_read_and_misfiled_entries_are_rerouted() {
    let blob = r#"[
      {"mesAno":"2024-03","transacoes":[
        {"id":"1709650000000","tipo":"receita","categoria":"Salário","valor":3000,
         "descricao":"Salário","data":"2024-03-05T00:00:00.000Z","mesAno":"2024-03"},
        {"id":"1709650000001","tipo":"despesa","categoria":"Moradia","valor":1200.5,
         "descricao":"Aluguel","data":"2024-02-10T00:00:00.000Z","mesAno":"2024-03"}
       ],
       "totalReceitas":3000,"totalDespesas":1200.5,"saldo":1799.5,
       "receitasPorCategoria":{"Salário":3000},"despesasPorCategoria":{"Moradia":1200.5}}
    ]"#;
    let (store, report) = LedgerStore::load(Box::new(MemoryStore::with_value(HISTORY_KEY, blob)));
    assert_eq!(report.rerouted, 1);
    assert_eq!(store.get_month(month("2024-03")).total_income(), dec!(3000));
    assert_eq!(store.get_month(month("2024-03")).total_expense(), dec!(0));
    assert_eq!(store.get_month(month("2024-02")).total_expense(), dec!(1200.5));
}

#[test]
fn reset_clears_history_and_persists() {
    let shared = Arc::new(MemoryStore::new());
    let (mut store, _) = LedgerStore::load(Box::new(shared.clone()));
    store.add_transaction(salary(date(2024, 3, 5)), month("2024-03")).unwrap();
    store.reset().unwrap();
    assert!(store.history().is_empty());
    assert_eq!(shared.get(HISTORY_KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn observed_month_marker_round_trips() {
    let shared = Arc::new(MemoryStore::new());
    let (mut store, _) = LedgerStore::load(Box::new(shared.clone()));
    assert_eq!(store.last_observed_month().unwrap(), None);
    store.record_observed_month(month("2024-03")).unwrap();
    assert_eq!(shared.get(LAST_OBSERVED_MONTH_KEY).unwrap().as_deref(), Some("2024-03"));

    let (reopened, _) = LedgerStore::load(Box::new(shared));
    assert_eq!(reopened.last_observed_month().unwrap(), Some(month("2024-03")));
}

#[test]
fn unreadable_history_is_merged_back_before_the_next_write() {
    let flaky = Arc::new(FlakyStore::default());
    let (mut store, _) = LedgerStore::load(Box::new(flaky.clone()));
    store.add_transaction(salary(date(2024, 1, 5)), month("2024-01")).unwrap();

    flaky.fail_reads.store(1, Ordering::SeqCst);
    let (mut restarted, report) = LedgerStore::load(Box::new(flaky.clone()));
    assert!(restarted.history().is_empty());
    assert!(restarted.history_unreadable());
    assert_eq!(report.warnings.len(), 1);

    restarted
        .add_transaction(expense(ExpenseCategory::Food, dec!(30.00), date(2024, 3, 2)), month("2024-03"))
        .unwrap();
    assert!(!restarted.history_unreadable());

    let (reloaded, _) = LedgerStore::load(Box::new(flaky));
    assert_eq!(reloaded.month_keys(), vec![month("2024-03"), month("2024-01")]);
    assert_eq!(reloaded.get_month(month("2024-01")).total_income(), dec!(3000.00));
}

#[test]
fn writes_are_refused_while_the_history_stays_unreadable() {
    let flaky = Arc::new(FlakyStore::default());
    let (mut store, _) = LedgerStore::load(Box::new(flaky.clone()));
    store.add_transaction(salary(date(2024, 1, 5)), month("2024-01")).unwrap();

    flaky.fail_reads.store(usize::MAX, Ordering::SeqCst);
    let (mut restarted, _) = LedgerStore::load(Box::new(flaky.clone()));
    let err = restarted
        .add_transaction(expense(ExpenseCategory::Food, dec!(30.00), date(2024, 3, 2)), month("2024-03"))
        .unwrap_err();
    assert!(matches!(err, CoreError::Persistence(_)));
    assert!(err.is_recoverable());
    assert_eq!(restarted.get_month(month("2024-03")).total_expense(), dec!(30.00));

    flaky.fail_reads.store(0, Ordering::SeqCst);
    let (on_disk, _) = LedgerStore::load(Box::new(flaky.clone()));
    assert_eq!(on_disk.month_keys(), vec![month("2024-01")]);
}

#[test]
fn reset_overrides_an_unreadable_history() {
    let flaky = Arc::new(FlakyStore::default());
    flaky.inner.set(HISTORY_KEY, "[]").unwrap();
    flaky.fail_reads.store(usize::MAX, Ordering::SeqCst);
    let (mut store, _) = LedgerStore::load(Box::new(flaky.clone()));
    store.reset().unwrap();
    assert!(!store.history_unreadable());
    assert_eq!(flaky.inner.get(HISTORY_KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn oversized_amounts_in_a_blob_count_as_corruption() {
    let blob = r#"[{"monthKey":"2024-03","transactions":[
        {"id":"a","kind":"expense","category":"Lazer","amount":"79228162514264337593543950335",
         "description":"x","date":"2024-03-01"},
        {"id":"b","kind":"expense","category":"Lazer","amount":"79228162514264337593543950335",
         "description":"y","date":"2024-03-02"}]}]"#;
    let shared = Arc::new(MemoryStore::with_value(HISTORY_KEY, blob));
    let (store, report) = LedgerStore::load(Box::new(shared.clone()));
    assert!(store.history().is_empty());
    assert!(!report.warnings.is_empty());
    assert_eq!(
        shared.get(&format!("{HISTORY_KEY}.corrupt")).unwrap().as_deref(),
        Some(blob)
    );
}

#[test]
fn largest_amounts_add_up_without_overflow() {
    let (mut store, _) = LedgerStore::load(Box::new(MemoryStore::new()));
    for day in 1..=3 {
        store
            .add_transaction(expense(ExpenseCategory::Leisure, MAX_AMOUNT, date(2024, 3, day)), month("2024-03"))
            .unwrap();
    }
    assert_eq!(
        store.get_month(month("2024-03")).total_expense(),
        MAX_AMOUNT * dec!(3)
    );

    let err = TransactionDraft::new(TransactionKind::Expense, date(2024, 3, 4))
        .category("Lazer")
        .amount("79228162514264337593543950335")
        .description("x")
        .validate()
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn rerouted_entries_keep_months_newest_first_and_drop_repeated_ids() {
    let blob = r#"[
      {"monthKey":"2024-03","transactions":[
        {"id":"m1","kind":"expense","category":"Lazer","amount":"10","description":"cinema","date":"2024-03-05"}]},
      {"monthKey":"2024-02","transactions":[
        {"id":"m2","kind":"expense","category":"Lazer","amount":"20","description":"show","date":"2024-03-20"},
        {"id":"m1","kind":"expense","category":"Lazer","amount":"10","description":"cinema","date":"2024-03-05"},
        {"id":"f1","kind":"expense","category":"Lazer","amount":"5","description":"bar","date":"2024-02-10"}]}
    ]"#;
    let (store, report) = LedgerStore::load(Box::new(MemoryStore::with_value(HISTORY_KEY, blob)));
    let march = store.get_month(month("2024-03"));
    let ids: Vec<&str> = march.transactions().iter().map(|t| t.id()).collect();
    assert_eq!(ids, vec!["m2", "m1"]);
    assert_eq!(march.total_expense(), dec!(30));
    assert_eq!(report.rerouted, 1);
    assert!(report.warnings.iter().any(|w| w.contains("duplicate transaction m1")));
    assert_eq!(store.get_month(month("2024-02")).total_expense(), dec!(5));
}
