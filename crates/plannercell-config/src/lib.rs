//! plannercell-config
//!
//! Persistent user preferences for PlannerCell: locale, currency, data and
//! export locations, rollover cadence, logging and the subscription profile.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{default_base_dir, ConfigManager, HOME_ENV};
pub use model::{Config, ProfileConfig};
