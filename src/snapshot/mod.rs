//! Snapshots
//!
//! A cart survives restarts by writing its line items to a [`SnapshotStore`] after every
//! mutation and reading them back once when a session opens. Stores only move bytes; the
//! [`codec`] decides what those bytes look like.

use std::io;

use thiserror::Error;

pub mod codec;
mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised while loading or saving a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Reading or writing the underlying storage failed.
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The stored bytes are not a cart snapshot, or items could not be encoded.
    #[error("invalid cart snapshot: {0}")]
    Codec(#[from] serde_json::Error),

    /// A store key contains characters that cannot name a snapshot.
    #[error("invalid snapshot key {0:?}")]
    InvalidKey(String),
}

/// Opaque byte store holding one cart snapshot.
pub trait SnapshotStore {
    /// Read the stored snapshot, or `None` if nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if the storage cannot be read.
    fn load(&self) -> Result<Option<Vec<u8>>, SnapshotError>;

    /// Replace the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`SnapshotError`] if the storage cannot be written.
    fn save(&mut self, bytes: &[u8]) -> Result<(), SnapshotError>;
}
