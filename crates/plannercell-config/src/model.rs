use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User-configurable preferences. Every field has a serde default so older or
/// hand-written files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_currency")]
    pub currency: String,

    /// Where the ledger blobs live. Defaults to `<base>/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Where exports are written when `--out` is not given. Defaults to `<base>/exports`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,

    #[serde(default = "Config::default_rollover_interval")]
    pub rollover_check_interval_secs: u64,

    /// `tracing` filter directive, e.g. `plannercell=debug`. `RUST_LOG` wins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileConfig>,
}

/// Subscription state as last synced from the account service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "ProfileConfig::default_plan")]
    pub plan: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<DateTime<Utc>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency: Self::default_currency(),
            data_dir: None,
            export_dir: None,
            rollover_check_interval_secs: Self::default_rollover_interval(),
            log_level: None,
            ui_color_enabled: Self::default_ui_color_enabled(),
            profile: None,
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "pt-BR".into()
    }

    pub fn default_currency() -> String {
        "BRL".into()
    }

    pub fn default_rollover_interval() -> u64 {
        3600
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| base.join("data"))
    }

    pub fn resolve_export_dir(&self, base: &Path) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| base.join("exports"))
    }

    /// Never shorter than one second.
    pub fn rollover_check_interval(&self) -> Duration {
        Duration::from_secs(self.rollover_check_interval_secs.max(1))
    }
}

impl ProfileConfig {
    pub fn default_plan() -> String {
        "free".into()
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            plan: Self::default_plan(),
            expiration: None,
        }
    }
}
