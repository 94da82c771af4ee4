//! Durable month-keyed history backed by a single serialized blob.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use plannercell_domain::{MonthKey, Transaction};
use tracing::{debug, info, warn};

use crate::{
    aggregation::{aggregate, MonthlyRecord},
    storage::{KeyValueStore, CORRUPT_SUFFIX, HISTORY_KEY, LAST_OBSERVED_MONTH_KEY},
    CoreError,
};

/// What happened while reading the persisted history.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub warnings: Vec<String>,
    pub months: usize,
    pub transactions: usize,
    /// Transactions moved to the month their date belongs to.
    pub rerouted: usize,
}

/// Result of routing a new transaction into the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    pub id: String,
    pub month_key: MonthKey,
    /// Set when the entry landed in a month other than the active one.
    pub outside_active_month: bool,
}

/// Owns the monthly history and is the only writer of it to storage.
pub struct LedgerStore {
    storage: Box<dyn KeyValueStore>,
    history: Vec<MonthlyRecord>,
    observed_month: Option<MonthKey>,
    /// Set while the stored blob could not be read; writes would erase it.
    unread_history: bool,
}

impl LedgerStore {
    /// Reads the history blob. Never fails: unreadable or corrupt data yields an
    /// empty history plus a warning in the report.
    ///
    /// After a read error, writes are refused until the blob can be read again
    /// or the history is [reset](Self::reset).
    pub fn load(storage: Box<dyn KeyValueStore>) -> (Self, LoadReport) {
        let mut report = LoadReport::default();
        let mut unread_history = false;
        let records = match storage.get(HISTORY_KEY) {
            Ok(raw) => decode_history(storage.as_ref(), raw, &mut report),
            Err(err) => {
                warn!(error = %err, "could not read finance history, starting empty");
                report
                    .warnings
                    .push(format!("history could not be read and will not be overwritten: {err}"));
                unread_history = true;
                Vec::new()
            }
        };

        let history = normalize(records, &mut report);
        report.months = history.len();
        report.transactions = history.iter().map(|r| r.transactions().len()).sum();
        info!(
            months = report.months,
            transactions = report.transactions,
            "finance history loaded"
        );
        let store = Self {
            storage,
            history,
            observed_month: None,
            unread_history,
        };
        (store, report)
    }

    /// True while the stored history is unread and writes are held back.
    pub fn history_unreadable(&self) -> bool {
        self.unread_history
    }

    /// Records, newest month first.
    pub fn history(&self) -> &[MonthlyRecord] {
        &self.history
    }

    pub fn record(&self, month_key: MonthKey) -> Option<&MonthlyRecord> {
        self.history.iter().find(|r| r.month_key() == month_key)
    }

    /// The stored record, or an empty one when the month has never been used.
    pub fn get_month(&self, month_key: MonthKey) -> MonthlyRecord {
        self.record(month_key)
            .cloned()
            .unwrap_or_else(|| MonthlyRecord::empty(month_key))
    }

    pub fn month_keys(&self) -> Vec<MonthKey> {
        self.history.iter().map(|r| r.month_key()).collect()
    }

    /// The active month plus every month in the history, newest first.
    pub fn available_months(&self, active: MonthKey) -> Vec<MonthKey> {
        let mut keys = self.month_keys();
        if !keys.contains(&active) {
            keys.push(active);
        }
        keys.sort_by(|a, b| b.cmp(a));
        keys
    }

    pub fn contains_transaction(&self, id: &str) -> bool {
        self.history
            .iter()
            .flat_map(|r| r.transactions())
            .any(|txn| txn.id() == id)
    }

    /// Replaces the record for `month_key` with one rebuilt from `transactions`
    /// and persists the whole history.
    ///
    /// On `CoreError::Persistence` the new record is already in memory.
    pub fn upsert_month(
        &mut self,
        month_key: MonthKey,
        transactions: Vec<Transaction>,
    ) -> Result<(), CoreError> {
        if let Some(stray) = transactions.iter().find(|t| t.month_key() != month_key) {
            return Err(CoreError::Validation(format!(
                "transaction {} is dated {} and does not belong to {}",
                stray.id(),
                stray.date(),
                month_key
            )));
        }
        self.replace_record(aggregate(month_key, transactions));
        debug!(month = %month_key, "month record updated");
        self.persist()
    }

    /// Prepends `transaction` to the record of its own month.
    ///
    /// `active_month` only drives the `outside_active_month` notice; routing
    /// always follows the transaction date.
    pub fn add_transaction(
        &mut self,
        transaction: Transaction,
        active_month: MonthKey,
    ) -> Result<AddOutcome, CoreError> {
        if self.contains_transaction(transaction.id()) {
            return Err(CoreError::Validation(format!(
                "transaction id {} already exists",
                transaction.id()
            )));
        }
        let month_key = transaction.month_key();
        let outcome = AddOutcome {
            id: transaction.id().to_string(),
            month_key,
            outside_active_month: month_key != active_month,
        };
        if outcome.outside_active_month {
            info!(
                month = %month_key,
                active = %active_month,
                "transaction recorded outside the active month"
            );
        }
        let mut transactions = self
            .record(month_key)
            .map(|r| r.transactions().to_vec())
            .unwrap_or_default();
        transactions.insert(0, transaction);
        self.upsert_month(month_key, transactions)?;
        Ok(outcome)
    }

    /// Drops every record and persists the empty history.
    ///
    /// Also overrides a blob that could not be read at load time.
    pub fn reset(&mut self) -> Result<(), CoreError> {
        info!(months = self.history.len(), "finance history reset");
        self.history.clear();
        self.unread_history = false;
        self.persist()
    }

    /// Writes the entire history blob with a single `set`.
    pub fn persist(&mut self) -> Result<(), CoreError> {
        if self.unread_history {
            self.reread_history()?;
        }
        let json = serde_json::to_string(&self.history)?;
        self.storage.set(HISTORY_KEY, &json).map_err(|err| {
            warn!(error = %err, "finance history could not be saved");
            CoreError::Persistence(err.to_string())
        })
    }

    /// Last real-world month seen by the rollover check.
    ///
    /// An unparseable marker counts as absent.
    pub fn last_observed_month(&self) -> Result<Option<MonthKey>, CoreError> {
        if let Some(month) = self.observed_month {
            return Ok(Some(month));
        }
        let raw = self.storage.get(LAST_OBSERVED_MONTH_KEY)?;
        Ok(raw.and_then(|raw| match raw.parse::<MonthKey>() {
            Ok(month) => Some(month),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable month marker");
                None
            }
        }))
    }

    /// Updates the marker in memory first, so a failed write still keeps the
    /// current session idempotent.
    pub fn record_observed_month(&mut self, month: MonthKey) -> Result<(), CoreError> {
        self.observed_month = Some(month);
        self.storage
            .set(LAST_OBSERVED_MONTH_KEY, &month.to_string())
            .map_err(|err| CoreError::Persistence(err.to_string()))
    }

    /// Retries the read that failed at load time and merges the stored months
    /// under the in-memory ones.
    fn reread_history(&mut self) -> Result<(), CoreError> {
        let raw = self.storage.get(HISTORY_KEY).map_err(|err| {
            warn!(error = %err, "finance history still unreadable, not saving");
            CoreError::Persistence(format!(
                "stored history could not be read and would be overwritten: {err}"
            ))
        })?;
        let mut report = LoadReport::default();
        let mut records = std::mem::take(&mut self.history);
        records.extend(decode_history(self.storage.as_ref(), raw, &mut report));
        self.history = normalize(records, &mut report);
        self.unread_history = false;
        for warning in &report.warnings {
            warn!(%warning, "history merge");
        }
        info!(months = self.history.len(), "finance history recovered");
        Ok(())
    }

    fn replace_record(&mut self, record: MonthlyRecord) {
        let key = record.month_key();
        self.history.retain(|r| r.month_key() != key);
        self.history.push(record);
        self.history.sort_by(|a, b| b.month_key().cmp(&a.month_key()));
    }
}

/// Parses a stored blob. Corrupt data is copied aside under the quarantine key
/// and yields no records.
fn decode_history(
    storage: &dyn KeyValueStore,
    raw: Option<String>,
    report: &mut LoadReport,
) -> Vec<MonthlyRecord> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<MonthlyRecord>>(&raw) {
        Ok(records) => records,
        Err(err) => {
            warn!(error = %err, "finance history is corrupt, starting empty");
            report
                .warnings
                .push(format!("history is corrupt and was set aside: {err}"));
            let quarantine = format!("{HISTORY_KEY}{CORRUPT_SUFFIX}");
            if let Err(err) = storage.set(&quarantine, &raw) {
                report
                    .warnings
                    .push(format!("corrupt history could not be preserved: {err}"));
            }
            Vec::new()
        }
    }
}

/// Merges duplicate months, drops repeated transaction ids (first one wins) and
/// moves transactions whose date disagrees with their record into the right
/// month. Months that received moved or merged entries are re-sorted newest first.
fn normalize(records: Vec<MonthlyRecord>, report: &mut LoadReport) -> Vec<MonthlyRecord> {
    let mut months: BTreeMap<MonthKey, Vec<Transaction>> = BTreeMap::new();
    let mut seen_ids = HashSet::new();
    let mut reordered = BTreeSet::new();
    for record in records {
        let key = record.month_key();
        if months.contains_key(&key) {
            report
                .warnings
                .push(format!("duplicate record for {key} was merged"));
            reordered.insert(key);
        }
        months.entry(key).or_default();
        for txn in record.into_transactions() {
            if !seen_ids.insert(txn.id().to_string()) {
                report
                    .warnings
                    .push(format!("duplicate transaction {} in {key} was dropped", txn.id()));
                continue;
            }
            let own = txn.month_key();
            if own != key {
                report.rerouted += 1;
                report.warnings.push(format!(
                    "transaction {} moved from {key} to {own}",
                    txn.id()
                ));
                reordered.insert(own);
            }
            months.entry(own).or_default().push(txn);
        }
    }
    months
        .into_iter()
        .rev()
        .map(|(key, mut transactions)| {
            if reordered.contains(&key) {
                transactions.sort_by(|a, b| b.date().cmp(&a.date()));
            }
            aggregate(key, transactions)
        })
        .collect()
}
