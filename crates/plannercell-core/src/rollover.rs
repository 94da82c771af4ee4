//! Calendar month rollover detection and the month-close notice.

use chrono::NaiveDate;
use plannercell_domain::MonthKey;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use crate::{aggregation::MonthlyRecord, format, ledger_store::LedgerStore, CoreError};

/// Totals of a month that just closed.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthCloseSummary {
    pub month: MonthKey,
    pub month_label: String,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
}

impl MonthCloseSummary {
    pub fn from_record(record: &MonthlyRecord, locale: &str) -> Self {
        Self {
            month: record.month_key(),
            month_label: format::month_close_label(record.month_key(), locale),
            total_income: record.total_income(),
            total_expense: record.total_expense(),
            balance: record.balance(),
        }
    }
}

#[derive(Debug, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

/// Receives month-close summaries. Delivery is best-effort.
pub trait MonthCloseNotifier {
    fn notify(&self, summary: &MonthCloseSummary) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum RolloverOutcome {
    /// The marker already matches the real-world month.
    Unchanged { month: MonthKey },
    RolledOver {
        previous_marker: Option<MonthKey>,
        month: MonthKey,
        /// Present when the month before `month` had transactions.
        summary: Option<MonthCloseSummary>,
        notified: bool,
        /// `false` when the marker only lives in memory for this session.
        marker_saved: bool,
    },
}

impl RolloverOutcome {
    pub fn rolled_over(&self) -> bool {
        matches!(self, RolloverOutcome::RolledOver { .. })
    }
}

/// Compares the real-world month with the persisted marker.
#[derive(Debug, Clone)]
pub struct RolloverDetector {
    locale: String,
}

impl RolloverDetector {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }

    /// Runs one check for `today`.
    ///
    /// Only a failure to read the marker is returned as an error; in that case
    /// nothing is notified. The marker is updated before notifying so the notice
    /// fires at most once per transition.
    pub fn check(
        &self,
        store: &mut LedgerStore,
        today: NaiveDate,
        notifier: &dyn MonthCloseNotifier,
    ) -> Result<RolloverOutcome, CoreError> {
        let month = MonthKey::from_date(today);
        let previous_marker = store.last_observed_month()?;
        if previous_marker == Some(month) {
            return Ok(RolloverOutcome::Unchanged { month });
        }

        let marker_saved = match store.record_observed_month(month) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, month = %month, "month marker kept in memory only");
                false
            }
        };

        let closed = store.get_month(month.previous());
        let summary = closed
            .has_transactions()
            .then(|| MonthCloseSummary::from_record(&closed, &self.locale));

        let notified = match &summary {
            Some(summary) => match notifier.notify(summary) {
                Ok(()) => true,
                Err(err) => {
                    warn!(error = %err, month = %summary.month, "month-close notice not delivered");
                    false
                }
            },
            None => false,
        };

        info!(
            from = ?previous_marker.map(|m| m.to_string()),
            to = %month,
            notified,
            "month rollover"
        );
        Ok(RolloverOutcome::RolledOver {
            previous_marker,
            month,
            summary,
            notified,
            marker_saved,
        })
    }
}
