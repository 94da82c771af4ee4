//! plannercell-domain
//!
//! Pure finance domain models (MonthKey, Category, Transaction).
//! No I/O, no storage, no aggregation. Only data types, validation and serde formats.

pub mod category;
pub mod error;
pub mod month;
pub mod transaction;

pub use category::*;
pub use error::DomainError;
pub use month::MonthKey;
pub use transaction::{Transaction, MAX_AMOUNT};

// Re-export so downstream crates agree on the decimal and date types.
pub use chrono;
pub use rust_decimal;
