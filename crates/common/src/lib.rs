//! Shared leaf types for the worldvault persistence engine.
//!
//! # Invariants
//! - All map-shaped data uses BTreeMap for deterministic iteration order.
//! - Identifiers (`ChunkPos`, `DimensionId`, `UniqueId`) are plain values;
//!   nothing in the engine keys on object identity.

pub mod id;
pub mod types;
pub mod value;

pub use id::UniqueIdAllocator;
pub use types::{ChunkPos, DimensionId, Rotation, UniqueId};
pub use value::Value;

pub fn crate_info() -> &'static str {
    "worldvault-common v0.1.0"
}
