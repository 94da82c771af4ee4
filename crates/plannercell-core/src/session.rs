//! Ties the store, the three month cursors and the rollover check together.

use chrono::NaiveDate;
use plannercell_domain::{MonthKey, Transaction};

use crate::{
    aggregation::MonthlyRecord,
    export::ExportDocument,
    ledger_store::{AddOutcome, LedgerStore, LoadReport},
    navigator::{MonthNavigator, NavigationPolicy, NavigatorState},
    rollover::{MonthCloseNotifier, RolloverDetector, RolloverOutcome},
    search::TransactionFilter,
    storage::KeyValueStore,
    CoreError,
};

/// One user's finance workspace.
///
/// Single writer: every mutation goes through `&mut self`. Hosts that share a
/// session across threads must wrap it in a mutex.
pub struct FinanceSession {
    store: LedgerStore,
    active: MonthNavigator,
    calendar: MonthNavigator,
    report_month: MonthKey,
    detector: RolloverDetector,
    locale: String,
}

impl FinanceSession {
    /// Loads the history and points every cursor at the month of `today`.
    pub fn open(
        storage: Box<dyn KeyValueStore>,
        today: NaiveDate,
        locale: impl Into<String>,
    ) -> (Self, LoadReport) {
        let locale = locale.into();
        let (store, report) = LedgerStore::load(storage);
        let session = Self {
            store,
            active: MonthNavigator::new(today, NavigationPolicy::NoFuture),
            calendar: MonthNavigator::new(today, NavigationPolicy::Unrestricted),
            report_month: MonthKey::from_date(today),
            detector: RolloverDetector::new(locale.clone()),
            locale,
        };
        (session, report)
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn active_month(&self) -> MonthKey {
        self.active.month()
    }

    pub fn active_record(&self) -> MonthlyRecord {
        self.store.get_month(self.active.month())
    }

    pub fn active_state(&self, today: NaiveDate) -> NavigatorState {
        self.active.state(today)
    }

    pub fn previous_month(&mut self) -> MonthKey {
        self.active.previous()
    }

    /// Returns `false` when `month` lies after the real-world month.
    pub fn set_active_month(&mut self, month: MonthKey, today: NaiveDate) -> bool {
        self.active.jump_to(month, today)
    }

    /// Free browsing cursor, independent of the active month.
    pub fn calendar(&mut self) -> &mut MonthNavigator {
        &mut self.calendar
    }

    pub fn calendar_month(&self) -> MonthKey {
        self.calendar.month()
    }

    pub fn report_month(&self) -> MonthKey {
        self.report_month
    }

    pub fn select_report_month(&mut self, month: MonthKey) {
        self.report_month = month;
    }

    pub fn report(&self) -> MonthlyRecord {
        self.store.get_month(self.report_month)
    }

    pub fn available_months(&self) -> Vec<MonthKey> {
        self.store.available_months(self.active.month())
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<AddOutcome, CoreError> {
        self.store.add_transaction(transaction, self.active.month())
    }

    pub fn search(&self, month: MonthKey, filter: &TransactionFilter) -> Vec<Transaction> {
        self.store
            .record(month)
            .map(|record| filter.apply(record.transactions()).into_iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn export_report(&self) -> Result<ExportDocument, CoreError> {
        ExportDocument::from_record(&self.report(), &self.locale)
    }

    pub fn reset_history(&mut self) -> Result<(), CoreError> {
        self.store.reset()
    }

    /// Runs the rollover check; on a transition the active month follows the
    /// real-world month.
    pub fn check_rollover(
        &mut self,
        today: NaiveDate,
        notifier: &dyn MonthCloseNotifier,
    ) -> Result<RolloverOutcome, CoreError> {
        let outcome = self.detector.check(&mut self.store, today, notifier)?;
        if outcome.rolled_over() {
            self.active.reset(today);
        }
        Ok(outcome)
    }
}
