use plannercell_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    /// The mutation was applied in memory but could not be written to storage.
    #[error("Changes kept for this session but not saved: {0}")]
    Persistence(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl CoreError {
    /// Whether the session stays usable after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CoreError::Persistence(_) | CoreError::Storage(_) | CoreError::Io(_)
        )
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}
