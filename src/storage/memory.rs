use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use crate::errors::{LedgerError, LedgerResult};

use super::PersistenceMedium;

#[derive(Debug, Default)]
struct MemoryState {
    bytes: Mutex<Option<Vec<u8>>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
}

/// In-process medium; clones share the same slot, which lets tests "restart" a store.
#[derive(Debug, Clone, Default)]
pub struct MemoryMedium {
    state: Arc<MemoryState>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let medium = Self::default();
        *medium.slot() = Some(bytes.into());
        medium
    }

    /// Raw stored payload, if any.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.slot().clone()
    }

    pub fn fail_loads(&self, fail: bool) {
        self.state.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_saves(&self, fail: bool) {
        self.state.fail_saves.store(fail, Ordering::SeqCst);
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Vec<u8>>> {
        self.state
            .bytes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PersistenceMedium for MemoryMedium {
    fn load(&self) -> LedgerResult<Option<Vec<u8>>> {
        if self.state.fail_loads.load(Ordering::SeqCst) {
            return Err(LedgerError::Persistence("medium unavailable for reads".into()));
        }
        Ok(self.slot().clone())
    }

    fn save(&self, bytes: &[u8]) -> LedgerResult<()> {
        if self.state.fail_saves.load(Ordering::SeqCst) {
            return Err(LedgerError::Persistence("medium rejected write".into()));
        }
        *self.slot() = Some(bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_storage() {
        let medium = MemoryMedium::new();
        let other = medium.clone();
        medium.save(b"[]").unwrap();
        assert_eq!(other.load().unwrap().as_deref(), Some(&b"[]"[..]));
    }

    #[test]
    fn failure_switches_affect_only_their_direction() {
        let medium = MemoryMedium::with_bytes("[]");
        medium.fail_saves(true);
        assert!(medium.save(b"[1]").is_err());
        assert_eq!(medium.contents().as_deref(), Some(&b"[]"[..]));
        medium.fail_loads(true);
        assert!(medium.load().is_err());
    }
}
