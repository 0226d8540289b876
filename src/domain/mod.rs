pub mod common;
pub mod transaction;

pub use common::{Displayable, Identifiable, MonthKey};
pub use transaction::{Transaction, TransactionDraft, TransactionKind, TransactionPatch};
