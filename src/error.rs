use plannercell_config::ConfigError;
use plannercell_core::CoreError;
use thiserror::Error;

/// Failures surfaced by the application layer and the CLI.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("`{0}` requires an active paid plan (mensal or anual)")]
    NotEntitled(&'static str),
}

impl AppError {
    /// Whether the session stays usable after this error.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Core(err) => err.is_recoverable(),
            AppError::Config(_) => false,
            AppError::InvalidInput(_) | AppError::NotEntitled(_) => true,
        }
    }
}
