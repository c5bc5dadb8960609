//! In-memory snapshot store

use std::sync::{Arc, Mutex, PoisonError};

use super::{SnapshotError, SnapshotStore};

/// Snapshot store that keeps the bytes in memory.
///
/// Clones share the same buffer, so a test can hand one clone to a session and inspect or
/// reuse the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    bytes: Arc<Mutex<Option<Vec<u8>>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `bytes`.
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Arc::new(Mutex::new(Some(bytes.into()))),
        }
    }

    /// Copy of the currently stored bytes.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<u8>>, SnapshotError> {
        Ok(self.contents())
    }

    fn save(&mut self, bytes: &[u8]) -> Result<(), SnapshotError> {
        *self.bytes.lock().unwrap_or_else(PoisonError::into_inner) = Some(bytes.to_vec());

        Ok(())
    }
}
