use worldvault_common::ChunkPos;

use crate::chunk::{Chunk, SubChunk, SUBCHUNK_MIN_Y};
use crate::dimension::DimensionKind;

/// Terrain generator collaborator contract.
///
/// Implementations must be deterministic: the same (coords, kind) inputs
/// always produce the same chunk, so a chunk lost before its first save is
/// regenerated identically.
pub trait TerrainGenerator {
    fn generate(&self, pos: ChunkPos, kind: DimensionKind) -> Chunk;
}

/// Flat terrain: fills the bottommost subchunk with a single block type
/// per dimension kind. Enough surface area for persistence tests and the
/// CLI demo; real generation lives outside this repository.
#[derive(Debug, Clone)]
pub struct FlatGenerator {
    /// Blocks per subchunk payload (16^3 block ids).
    volume: usize,
}

impl FlatGenerator {
    pub fn new() -> Self {
        Self { volume: 16 * 16 * 16 }
    }

    fn surface_block(kind: DimensionKind) -> u8 {
        match kind {
            DimensionKind::Overworld => 1,
            DimensionKind::Nether => 7,
            DimensionKind::End => 13,
        }
    }
}

impl Default for FlatGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TerrainGenerator for FlatGenerator {
    fn generate(&self, pos: ChunkPos, kind: DimensionKind) -> Chunk {
        let mut chunk = Chunk::empty(pos);
        let data = vec![Self::surface_block(kind); self.volume];
        chunk.set_sub_chunk(SubChunk::new(SUBCHUNK_MIN_Y, data));
        // from_slots-style assembly would leave the chunk clean; the cache
        // marks freshly generated chunks dirty so the first save persists
        // them. Keep the generator itself side-effect free.
        chunk.clear_dirty();
        chunk
    }
}
