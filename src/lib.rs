#![doc(test(attr(deny(warnings))))]

//! Pocket Ledger keeps a personal income/expense ledger on a pluggable
//! persistence medium and derives list views, totals, and monthly series from it.

pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use crate::core::ledger_store::LedgerStore;
pub use crate::core::public_api::{monthly_series, totals, view};
pub use crate::core::services::{
    MonthlyBucket, QueryService, SeriesSummary, SortOrder, SummaryService, Totals,
    TransactionFilter,
};
pub use crate::core::time::{Clock, FixedClock, StepClock, SystemClock};
pub use crate::domain::{MonthKey, Transaction, TransactionDraft, TransactionKind, TransactionPatch};
pub use crate::errors::{LedgerError, LedgerResult};
pub use crate::storage::{JsonFileMedium, MemoryMedium, PersistenceMedium};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        utils::log_startup();
    });
}
