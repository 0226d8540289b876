pub mod query_service;
pub mod summary_service;

pub use query_service::{QueryService, SortOrder, TransactionFilter};
pub use summary_service::{MonthlyBucket, SeriesSummary, SummaryService, Totals};
