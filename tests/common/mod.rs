#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use once_cell::sync::Lazy;
use pocket_ledger::{
    config::ConfigManager, JsonFileMedium, LedgerStore, MemoryMedium, StepClock,
    TransactionDraft,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn instant(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .expect("valid rfc3339")
        .with_timezone(&Utc)
}

/// Clock starting at 2024-01-01T00:00:00Z that ticks one second per reading.
pub fn ticking_clock() -> Box<StepClock> {
    Box::new(StepClock::new(
        instant("2024-01-01T00:00:00Z"),
        Duration::seconds(1),
    ))
}

pub fn memory_store() -> (LedgerStore<MemoryMedium>, MemoryMedium) {
    let medium = MemoryMedium::new();
    let store = LedgerStore::with_clock(medium.clone(), ticking_clock());
    (store, medium)
}

/// Creates an isolated base directory and a file-backed store rooted in it.
pub fn setup_file_store() -> (LedgerStore<JsonFileMedium>, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let manager = ConfigManager::with_base_dir(base).expect("create config manager");
    let (store, _config) = LedgerStore::open(&manager).expect("open file store");
    (store, manager)
}

/// The three-record ledger used by the aggregation examples.
pub fn sample_drafts() -> Vec<TransactionDraft> {
    vec![
        TransactionDraft::income(100.0, date(2024, 1, 5), "Salary"),
        TransactionDraft::expense(40.0, date(2024, 1, 10), "Groceries"),
        TransactionDraft::expense(25.0, date(2024, 2, 1), "Internet"),
    ]
}
