//! World model: chunks, dimensions, live entities, and the collaborator
//! contracts the persistence engine consumes.
//!
//! # Invariants
//! - A chunk's dirty flag is set by every mutation and cleared only by a
//!   successful store write.
//! - Entity storage iterates deterministically (BTreeMap keyed by UniqueId).
//! - Terrain generation is deterministic for the same (coords, kind) inputs.

pub mod chunk;
pub mod dimension;
pub mod entity;
pub mod generator;

pub use chunk::{Chunk, SubChunk, SUBCHUNK_MIN_Y, SUBCHUNK_SLOTS};
pub use dimension::{Dimension, DimensionKind, World, WorldError};
pub use entity::{Entity, EntityLifecycle, SpawnLifecycle, StaticTraitRegistry, TraitDescriptor, TraitRegistry};
pub use generator::{FlatGenerator, TerrainGenerator};

pub fn crate_info() -> &'static str {
    "worldvault-kernel v0.1.0"
}
