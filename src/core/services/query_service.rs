//! Filtering and ordering of ledger snapshots for list views.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::{Transaction, TransactionKind};
use crate::errors::LedgerError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl TransactionFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        match self {
            TransactionFilter::All => true,
            TransactionFilter::Income => txn.kind == TransactionKind::Income,
            TransactionFilter::Expense => txn.kind == TransactionKind::Expense,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionFilter::All => "all",
            TransactionFilter::Income => "income",
            TransactionFilter::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionFilter {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(TransactionFilter::All),
            "income" => Ok(TransactionFilter::Income),
            "expense" => Ok(TransactionFilter::Expense),
            other => Err(LedgerError::Validation(format!("unknown filter `{other}`"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::DateDesc => "date-desc",
            SortOrder::DateAsc => "date-asc",
            SortOrder::AmountDesc => "amount-desc",
            SortOrder::AmountAsc => "amount-asc",
        }
    }

    /// Key comparison only; descending orders reverse the key, never the input order,
    /// so equal keys keep their relative position under a stable sort.
    fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            SortOrder::DateDesc => b.date.cmp(&a.date),
            SortOrder::DateAsc => a.date.cmp(&b.date),
            SortOrder::AmountDesc => b.amount.total_cmp(&a.amount),
            SortOrder::AmountAsc => a.amount.total_cmp(&b.amount),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "date-desc" => Ok(SortOrder::DateDesc),
            "date-asc" => Ok(SortOrder::DateAsc),
            "amount-desc" => Ok(SortOrder::AmountDesc),
            "amount-asc" => Ok(SortOrder::AmountAsc),
            other => Err(LedgerError::Validation(format!(
                "unknown sort order `{other}`"
            ))),
        }
    }
}

pub struct QueryService;

impl QueryService {
    /// Returns the records passing `filter`, ordered by `sort`. The input is untouched.
    pub fn view(
        records: &[Transaction],
        filter: TransactionFilter,
        sort: SortOrder,
    ) -> Vec<Transaction> {
        let mut view: Vec<Transaction> = records
            .iter()
            .filter(|txn| filter.matches(txn))
            .cloned()
            .collect();
        // `sort_by` is stable.
        view.sort_by(|a, b| sort.compare(a, b));
        view
    }
}
