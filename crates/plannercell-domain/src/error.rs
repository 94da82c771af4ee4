use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("invalid month key `{0}` (expected YYYY-MM)")]
    InvalidMonthKey(String),
    #[error("unknown {kind} category `{label}`")]
    UnknownCategory { kind: String, label: String },
    #[error("amount must not be negative: {0}")]
    NegativeAmount(String),
    #[error("amount {0} exceeds the supported maximum")]
    AmountTooLarge(String),
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("invalid date `{0}`")]
    InvalidDate(String),
}
