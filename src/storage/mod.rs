pub mod json_backend;
pub mod memory;

use crate::{
    domain::Transaction,
    errors::{LedgerError, LedgerResult},
};

/// Default key under which the full transaction set is stored.
pub const DEFAULT_STORAGE_KEY: &str = "personal-finance-transactions";

/// Abstraction over the key-value medium holding the serialized ledger.
///
/// `load` returns `Ok(None)` when nothing has been stored yet.
pub trait PersistenceMedium: Send + Sync {
    fn load(&self) -> LedgerResult<Option<Vec<u8>>>;
    fn save(&self, bytes: &[u8]) -> LedgerResult<()>;
}

impl<M: PersistenceMedium + ?Sized> PersistenceMedium for Box<M> {
    fn load(&self) -> LedgerResult<Option<Vec<u8>>> {
        (**self).load()
    }

    fn save(&self, bytes: &[u8]) -> LedgerResult<()> {
        (**self).save(bytes)
    }
}

/// Serializes the full transaction set as a pretty-printed JSON array.
pub fn encode_ledger(transactions: &[Transaction]) -> LedgerResult<Vec<u8>> {
    serde_json::to_vec_pretty(transactions).map_err(|err| LedgerError::Persistence(err.to_string()))
}

/// Parses a stored payload, rejecting records that violate the entity invariants.
pub fn decode_ledger(bytes: &[u8]) -> LedgerResult<Vec<Transaction>> {
    let transactions: Vec<Transaction> = serde_json::from_slice(bytes)
        .map_err(|err| LedgerError::Persistence(format!("malformed ledger payload: {err}")))?;
    for txn in &transactions {
        txn.validate().map_err(|err| {
            LedgerError::Persistence(format!("malformed ledger payload: {err}"))
        })?;
    }
    Ok(transactions)
}

pub use json_backend::JsonFileMedium;
pub use memory::MemoryMedium;
