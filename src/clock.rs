use std::env;

use chrono::{DateTime, Local, NaiveDate, Utc};
use plannercell_core::{Clock, FixedClock};
use plannercell_domain::transaction::date_format;

use crate::AppError;

/// Pins "today" to a fixed `YYYY-MM-DD`, mainly for scripted runs and tests.
pub const TODAY_ENV: &str = "PLANNERCELL_TODAY";

/// Wall clock. Month boundaries follow the local calendar date.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// [`SystemClock`], unless `PLANNERCELL_TODAY` pins the date.
pub fn clock_from_env() -> Result<Box<dyn Clock>, AppError> {
    match env::var(TODAY_ENV) {
        Ok(raw) if !raw.trim().is_empty() => {
            let date = date_format::parse(raw.trim())
                .map_err(|err| AppError::InvalidInput(format!("{TODAY_ENV}: {err}")))?;
            Ok(Box::new(FixedClock::on(date)))
        }
        _ => Ok(Box::new(SystemClock)),
    }
}
