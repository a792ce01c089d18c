//! In-memory chunk cache: the single source of truth for resident chunks.
//!
//! Keyed by stable dimension id and chunk coordinate, never by object
//! identity. Chunks stay resident for the process lifetime; the cache hands
//! out mutable references to the one instance per coordinate.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;
use worldvault_common::{ChunkPos, DimensionId};
use worldvault_kernel::{Chunk, Dimension, TerrainGenerator};

use crate::store::{StoreError, WorldStore};

#[derive(Default)]
pub struct ChunkCache {
    dimensions: HashMap<DimensionId, HashMap<ChunkPos, Chunk>>,
}

impl ChunkCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load-or-generate read path.
    ///
    /// Cached chunks return as-is. Otherwise the store is consulted for a
    /// persisted version; on a miss the generator produces the chunk, which
    /// is marked dirty so the first save sweep persists it. Either way the
    /// chunk is inserted and the resident instance returned.
    pub fn read_chunk<'a>(
        &'a mut self,
        pos: ChunkPos,
        dimension: &Dimension,
        store: &WorldStore,
        generator: &dyn TerrainGenerator,
    ) -> Result<&'a mut Chunk, StoreError> {
        let chunks = self.dimensions.entry(dimension.id()).or_default();
        match chunks.entry(pos) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let chunk = match store.load_chunk(pos, dimension.id())? {
                    Some(chunk) => chunk,
                    None => {
                        debug!(cx = pos.cx, cz = pos.cz, dim = dimension.id().0, "generating chunk");
                        let mut chunk = generator.generate(pos, dimension.kind());
                        chunk.mark_dirty();
                        chunk
                    }
                };
                Ok(entry.insert(chunk))
            }
        }
    }

    pub fn get(&self, dim: DimensionId, pos: ChunkPos) -> Option<&Chunk> {
        self.dimensions.get(&dim)?.get(&pos)
    }

    pub fn get_mut(&mut self, dim: DimensionId, pos: ChunkPos) -> Option<&mut Chunk> {
        self.dimensions.get_mut(&dim)?.get_mut(&pos)
    }

    pub fn contains(&self, dim: DimensionId, pos: ChunkPos) -> bool {
        self.get(dim, pos).is_some()
    }

    /// Remove a chunk from the cache, returning it. The next read for this
    /// coordinate goes back to the store.
    pub fn evict(&mut self, dim: DimensionId, pos: ChunkPos) -> Option<Chunk> {
        self.dimensions.get_mut(&dim)?.remove(&pos)
    }

    /// Mutable sweep over one dimension's resident chunks (save path).
    pub fn chunks_mut(&mut self, dim: DimensionId) -> impl Iterator<Item = &mut Chunk> {
        self.dimensions
            .get_mut(&dim)
            .into_iter()
            .flat_map(|m| m.values_mut())
    }

    /// Number of resident chunks in a dimension.
    pub fn resident(&self, dim: DimensionId) -> usize {
        self.dimensions.get(&dim).map_or(0, |m| m.len())
    }
}
