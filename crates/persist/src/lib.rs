//! Persistence and caching engine: maps in-memory world state onto an
//! ordered byte-key/byte-value store and reconstructs it on demand.
//!
//! # Invariants
//! - Key encodings are byte-exact and little-endian; dimension index 0
//!   omits its field (legacy format compatibility).
//! - Absence is an expected result, not an error; corruption is a distinct,
//!   logged condition.
//! - Empty subchunks are never persisted; their absence on load means
//!   "no data", not "deleted".
//! - All store operations run on the single world-tick thread; I/O blocks
//!   the caller.

pub mod cache;
pub mod chunk_store;
pub mod codec;
pub mod entity_store;
pub mod keys;
pub mod kv;
pub mod provider;
pub mod store;

pub use cache::ChunkCache;
pub use codec::{CodecError, EntityRecord, PlayerRecord};
pub use kv::{FileKvStore, KvError, KvStore, MemoryKvStore};
pub use provider::{WorldProperties, WorldProvider};
pub use store::{StoreError, WorldStore};

pub fn crate_info() -> &'static str {
    "worldvault-persist v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("persist"));
    }
}
