//! plannercell-core
//!
//! Monthly ledger aggregation, persistence orchestration and month rollover for PlannerCell.
//! Depends on plannercell-domain. Storage is reached only through [`KeyValueStore`]; no
//! filesystem, terminal or network access happens here.

pub mod aggregation;
pub mod draft;
pub mod error;
pub mod export;
pub mod format;
pub mod ledger_store;
pub mod navigator;
pub mod profile;
pub mod rollover;
pub mod search;
pub mod session;
pub mod storage;
pub mod time;


pub use aggregation::{aggregate, share_of, CategoryTotals, MonthlyRecord};
pub use draft::TransactionDraft;
pub use error::CoreError;
pub use export::{export_file_name, ExportDocument, MonthExport};
pub use ledger_store::{AddOutcome, LedgerStore, LoadReport};
pub use navigator::{MonthNavigator, NavigationPolicy, NavigatorState};
pub use profile::{Plan, Profile, ProfileProvider};
pub use rollover::{MonthCloseNotifier, MonthCloseSummary, NotifyError, RolloverDetector, RolloverOutcome};
pub use search::TransactionFilter;
pub use session::FinanceSession;
pub use storage::{KeyValueStore, MemoryStore};
pub use time::{Clock, FixedClock};
