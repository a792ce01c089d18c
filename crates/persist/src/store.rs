//! World store: the single owner of the kv engine handle.
//!
//! Chunk operations live in `chunk_store`, entity and player operations in
//! `entity_store`; both extend [`WorldStore`] with impl blocks so every
//! durable byte flows through one object.

use crate::codec::CodecError;
use crate::kv::{KvError, KvStore, MemoryKvStore};
use worldvault_common::UniqueId;

/// Errors from persistence operations.
///
/// Absence is not represented here: reads return `Option`/empty defaults
/// for keys that do not exist yet. Corruption is distinct and explicit.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Kv(#[from] KvError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt record for {what}: {reason}")]
    CorruptRecord { what: String, reason: String },
    #[error("entity {unique_id:?} is not persisted in this dimension")]
    EntityNotFound { unique_id: UniqueId },
    #[error("world {identifier:?} is already registered at this path")]
    WorldExists { identifier: String },
    #[error("world properties carry no identifier")]
    MissingIdentifier,
    #[error("provider has shut down; no further operations are valid")]
    ShutDown,
}

/// Facade over the kv engine for chunk, entity, and player persistence.
pub struct WorldStore {
    kv: Box<dyn KvStore>,
}

impl WorldStore {
    pub fn new(kv: Box<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Memory-backed store for tests and ephemeral worlds.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryKvStore::new()))
    }

    pub(crate) fn kv(&self) -> &dyn KvStore {
        self.kv.as_ref()
    }

    pub(crate) fn kv_mut(&mut self) -> &mut dyn KvStore {
        self.kv.as_mut()
    }

    /// Flush pending writes to durable storage without closing.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.kv.flush()?;
        Ok(())
    }

    /// Close the underlying engine. Every later operation fails.
    pub fn close(&mut self) -> Result<(), StoreError> {
        self.kv.close()?;
        Ok(())
    }
}
