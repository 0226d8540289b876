//! Stable, public-facing helpers that wrap the internal service layer.
//!
//! Presentation collaborators call these free functions with a snapshot taken from
//! [`LedgerStore::list`](crate::core::ledger_store::LedgerStore::list).

use chrono::NaiveDate;

use crate::core::services::{
    MonthlyBucket, QueryService, SortOrder, SummaryService, Totals, TransactionFilter,
};
use crate::domain::Transaction;

/// Filtered and ordered copy of `records`.
pub fn view(
    records: &[Transaction],
    filter: TransactionFilter,
    sort: SortOrder,
) -> Vec<Transaction> {
    QueryService::view(records, filter, sort)
}

/// Scalar totals with the current month taken from `as_of`.
pub fn totals(records: &[Transaction], as_of: NaiveDate) -> Totals {
    SummaryService::totals(records, as_of)
}

/// Monthly buckets in chronological order, optionally limited to the latest `limit`.
pub fn monthly_series(records: &[Transaction], limit: Option<usize>) -> Vec<MonthlyBucket> {
    SummaryService::monthly_series(records, limit)
}
