//! PlannerCell keeps a month-partitioned household finance ledger: entries are
//! routed to the month they belong to, each month carries its own totals, and a
//! rollover check announces the close of the previous month exactly once.
//!
//! The finance logic lives in the `plannercell-*` workspace crates; this crate
//! wires them to the filesystem, the system clock and the terminal.

pub mod app;
pub mod cli;
pub mod clock;
pub mod error;
pub mod notifier;
pub mod profile;
pub mod utils;

pub use app::FinanceApp;
pub use error::AppError;

/// Initializes global tracing with the default filter.
pub fn init() {
    init_with_directive(None);
}

/// Like [`init`], with a filter directive taken from configuration.
pub fn init_with_directive(directive: Option<&str>) {
    utils::init_tracing(directive);
}
