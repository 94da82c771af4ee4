//! Wires configuration, on-disk storage, the clock and the finance session.

use std::{
    path::{Path, PathBuf},
    thread,
};

use chrono::NaiveDate;
use plannercell_config::{Config, ConfigManager};
use plannercell_core::{
    format, Clock, FinanceSession, LoadReport, MonthCloseNotifier, ProfileProvider,
    RolloverOutcome,
};
use plannercell_domain::MonthKey;
use plannercell_storage_json::{write_export, JsonFileStore};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::{profile::ConfiguredProfile, AppError};

/// One opened PlannerCell home directory.
pub struct FinanceApp {
    base_dir: PathBuf,
    config: Config,
    session: FinanceSession,
    clock: Box<dyn Clock>,
    profile: ConfiguredProfile,
}

impl FinanceApp {
    /// Loads `<base>/config/config.json` (defaults when missing) and the ledger
    /// from the configured data directory.
    pub fn open(base_dir: PathBuf, clock: Box<dyn Clock>) -> Result<(Self, LoadReport), AppError> {
        let config = ConfigManager::with_base_dir(base_dir.clone())?.load()?;
        Self::with_config(base_dir, config, clock)
    }

    pub fn with_config(
        base_dir: PathBuf,
        config: Config,
        clock: Box<dyn Clock>,
    ) -> Result<(Self, LoadReport), AppError> {
        let store = JsonFileStore::new(config.resolve_data_dir(&base_dir))?;
        let (session, report) =
            FinanceSession::open(Box::new(store), clock.today(), config.locale.clone());
        for warning in &report.warnings {
            warn!(%warning, "ledger load");
        }
        let profile = ConfiguredProfile::new(config.profile.clone());
        let app = Self {
            base_dir,
            config,
            session,
            clock,
            profile,
        };
        Ok((app, report))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &FinanceSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut FinanceSession {
        &mut self.session
    }

    pub fn profile(&self) -> &ConfiguredProfile {
        &self.profile
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn format_amount(&self, amount: Decimal) -> String {
        format::format_amount(amount, &self.config.currency, &self.config.locale)
    }

    pub fn month_label(&self, month: MonthKey) -> String {
        format::month_label(month, &self.config.locale)
    }

    pub fn check_rollover(
        &mut self,
        notifier: &dyn MonthCloseNotifier,
    ) -> Result<RolloverOutcome, AppError> {
        let today = self.clock.today();
        Ok(self.session.check_rollover(today, notifier)?)
    }

    /// Runs `ticks` rollover checks spaced by the configured interval.
    /// `None` keeps polling until the process is stopped. A failed check is
    /// logged and retried on the next tick.
    pub fn watch(
        &mut self,
        ticks: Option<u64>,
        notifier: &dyn MonthCloseNotifier,
    ) -> Result<Vec<RolloverOutcome>, AppError> {
        let interval = self.config.rollover_check_interval();
        info!(interval_secs = interval.as_secs(), ?ticks, "watching for month rollover");
        let mut outcomes = Vec::new();
        let mut tick = 0u64;
        loop {
            tick += 1;
            match self.check_rollover(notifier) {
                Ok(outcome) if outcome.rolled_over() => outcomes.push(outcome),
                Ok(_) => {}
                Err(err) => warn!(error = %err, tick, "rollover check failed"),
            }
            if ticks.is_some_and(|limit| tick >= limit) {
                break;
            }
            thread::sleep(interval);
        }
        Ok(outcomes)
    }

    /// Fails with [`AppError::NotEntitled`] unless the stored plan is active now.
    pub fn require_entitlement(&self, feature: &'static str) -> Result<(), AppError> {
        if self.profile.has_active_entitlement(self.clock.now()) {
            Ok(())
        } else {
            Err(AppError::NotEntitled(feature))
        }
    }

    /// Writes the report month's export and returns the file path.
    pub fn export(&mut self, month: MonthKey, out: Option<PathBuf>) -> Result<PathBuf, AppError> {
        self.require_entitlement("export")?;
        self.session.select_report_month(month);
        let document = self.session.export_report()?;
        let dir = out.unwrap_or_else(|| self.config.resolve_export_dir(&self.base_dir));
        let path = write_export(&dir, &document)?;
        info!(path = %path.display(), month = %month, "report exported");
        Ok(path)
    }
}
