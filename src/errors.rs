use thiserror::Error;
use uuid::Uuid;

/// Error type that captures ledger store, validation, and persistence failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl LedgerError {
    /// Collapses medium-level failures into `Persistence` so callers see a single class.
    pub fn into_persistence(self) -> LedgerError {
        match self {
            LedgerError::Io(err) => LedgerError::Persistence(err.to_string()),
            LedgerError::Serde(err) => LedgerError::Persistence(err.to_string()),
            other => other,
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
