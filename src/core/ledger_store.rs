use std::collections::HashSet;

use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{ConfigError, ConfigManager, LedgerConfig};
use crate::core::time::{Clock, SystemClock};
use crate::domain::{Displayable, Identifiable, Transaction, TransactionDraft, TransactionPatch};
use crate::errors::{LedgerError, LedgerResult};
use crate::storage::{decode_ledger, encode_ledger, JsonFileMedium, PersistenceMedium};

/// Sole authority over the persisted transaction set.
///
/// Every mutation re-reads the medium, applies the change, and writes the whole set
/// back, so the medium is the only copy of the ledger. There is no conflict
/// detection: two writers sharing one medium (other processes, other handles)
/// overwrite each other and the last save wins.
pub struct LedgerStore<M: PersistenceMedium> {
    medium: M,
    clock: Box<dyn Clock>,
}

impl<M: PersistenceMedium> LedgerStore<M> {
    pub fn new(medium: M) -> Self {
        Self::with_clock(medium, Box::new(SystemClock))
    }

    pub fn with_clock(medium: M, clock: Box<dyn Clock>) -> Self {
        Self { medium, clock }
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Returns the full set, or an empty one when the medium is unreadable or malformed.
    pub fn list(&self) -> Vec<Transaction> {
        match self.read_durable() {
            Ok(transactions) => transactions,
            Err(err) => {
                warn!(error = %err, "unable to read ledger; treating it as empty");
                Vec::new()
            }
        }
    }

    /// Looks up one record; an unreadable medium is a `Persistence` error, not `NotFound`.
    pub fn get(&self, id: Uuid) -> LedgerResult<Transaction> {
        self.read_durable()?
            .into_iter()
            .find(|txn| txn.id() == id)
            .ok_or(LedgerError::NotFound(id))
    }

    /// Stores a new record with a fresh identity and returns it.
    pub fn add(&self, draft: TransactionDraft) -> LedgerResult<Transaction> {
        draft.validate()?;
        let mut transactions = self.read_durable()?;
        let now = self.clock.now();
        let txn = Transaction::from_draft(fresh_id(&transactions), draft, now);
        transactions.push(txn.clone());
        self.write_durable(&transactions)?;
        info!(transaction = %txn.display_label(), "added transaction");
        Ok(txn)
    }

    /// Validates an untyped payload as a draft, then behaves like [`LedgerStore::add`].
    pub fn add_from_json(&self, payload: &Value) -> LedgerResult<Transaction> {
        self.add(TransactionDraft::from_json(payload)?)
    }

    /// Merges `patch` over the stored record and refreshes `updated_at`.
    pub fn update(&self, id: Uuid, patch: TransactionPatch) -> LedgerResult<Transaction> {
        patch.validate()?;
        let mut transactions = self.read_durable()?;
        let now = self.clock.now();
        let txn = transactions
            .iter_mut()
            .find(|txn| txn.id() == id)
            .ok_or(LedgerError::NotFound(id))?;
        txn.apply(&patch);
        txn.updated_at = now.max(txn.updated_at);
        let updated = txn.clone();
        self.write_durable(&transactions)?;
        info!(transaction = %updated.display_label(), "updated transaction");
        Ok(updated)
    }

    /// Parses an untyped edit payload and applies it; `id`/`createdAt` keys are ignored.
    pub fn update_from_json(&self, id: Uuid, payload: &Value) -> LedgerResult<Transaction> {
        self.update(id, TransactionPatch::from_json(payload)?)
    }

    /// Removes the record with `id`. Returns `false` without writing when it is absent.
    pub fn delete(&self, id: Uuid) -> LedgerResult<bool> {
        let mut transactions = self.read_durable()?;
        let before = transactions.len();
        transactions.retain(|txn| txn.id() != id);
        if transactions.len() == before {
            debug!(%id, "delete skipped; transaction not present");
            return Ok(false);
        }
        self.write_durable(&transactions)?;
        info!(%id, "deleted transaction");
        Ok(true)
    }

    /// Overwrites the durable set, e.g. when importing an exported ledger.
    pub fn replace_all(&self, transactions: Vec<Transaction>) -> LedgerResult<()> {
        let mut seen = HashSet::with_capacity(transactions.len());
        for txn in &transactions {
            txn.validate()?;
            if !seen.insert(txn.id()) {
                return Err(LedgerError::Validation(format!(
                    "duplicate transaction id {}",
                    txn.id()
                )));
            }
        }
        self.write_durable(&transactions)?;
        info!(count = transactions.len(), "replaced ledger contents");
        Ok(())
    }

    pub fn clear(&self) -> LedgerResult<()> {
        self.replace_all(Vec::new())
    }

    // Strict read used by mutations: an unreadable payload must never be overwritten.
    fn read_durable(&self) -> LedgerResult<Vec<Transaction>> {
        let transactions = match self.medium.load().map_err(LedgerError::into_persistence)? {
            Some(bytes) => decode_ledger(&bytes)?,
            None => Vec::new(),
        };
        debug!(count = transactions.len(), "loaded ledger from medium");
        Ok(transactions)
    }

    fn write_durable(&self, transactions: &[Transaction]) -> LedgerResult<()> {
        let bytes = encode_ledger(transactions)?;
        self.medium
            .save(&bytes)
            .map_err(LedgerError::into_persistence)
    }
}

impl LedgerStore<JsonFileMedium> {
    /// Opens the file-backed store described by the configuration under `manager`.
    pub fn open(manager: &ConfigManager) -> LedgerResult<(Self, LedgerConfig)> {
        let config = manager.load().map_err(config_failure)?;
        let medium = JsonFileMedium::new(manager.data_dir(), &config.storage_key)?;
        info!(path = %medium.path().display(), "opened ledger store");
        Ok((Self::new(medium), config))
    }

    /// Opens the store under the default application directory.
    pub fn open_default() -> LedgerResult<(Self, LedgerConfig)> {
        let manager = ConfigManager::new().map_err(config_failure)?;
        Self::open(&manager)
    }
}

fn config_failure(err: ConfigError) -> LedgerError {
    LedgerError::Persistence(format!("unable to load configuration: {err}"))
}

fn fresh_id(existing: &[Transaction]) -> Uuid {
    loop {
        let candidate = Uuid::new_v4();
        if !existing.iter().any(|txn| txn.id() == candidate) {
            return candidate;
        }
    }
}
