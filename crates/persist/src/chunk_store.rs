//! Chunk persistence: version markers and per-subchunk payloads.
//!
//! A chunk exists on disk iff its version marker key is present. Subchunk
//! payloads are `[wire version][cy][zstd(block data)]`; empty subchunks are
//! never written, so their absence on load means "no data", not "deleted".

use tracing::warn;
use worldvault_common::{ChunkPos, DimensionId};
use worldvault_kernel::{Chunk, SubChunk, SUBCHUNK_MIN_Y, SUBCHUNK_SLOTS};

use crate::keys;
use crate::store::{StoreError, WorldStore};

/// Value of the chunk version marker byte.
pub const CHUNK_VERSION: u8 = 40;
/// Version byte leading every subchunk payload.
pub const SUBCHUNK_WIRE_VERSION: u8 = 9;

const ZSTD_LEVEL: i32 = 3;

fn encode_subchunk(sub: &SubChunk) -> Result<Vec<u8>, StoreError> {
    let mut payload = vec![SUBCHUNK_WIRE_VERSION, sub.index() as u8];
    payload.extend_from_slice(&zstd::stream::encode_all(sub.data(), ZSTD_LEVEL)?);
    Ok(payload)
}

fn decode_subchunk(pos: ChunkPos, cy: i8, payload: &[u8]) -> Result<SubChunk, StoreError> {
    let corrupt = |reason: String| StoreError::CorruptRecord {
        what: format!("subchunk ({}, {}) cy {cy}", pos.cx, pos.cz),
        reason,
    };
    if payload.len() < 2 {
        return Err(corrupt(format!("payload too short: {} bytes", payload.len())));
    }
    if payload[0] != SUBCHUNK_WIRE_VERSION {
        return Err(corrupt(format!("unknown wire version {}", payload[0])));
    }
    if payload[1] as i8 != cy {
        return Err(corrupt(format!(
            "stored index {} does not match key index {cy}",
            payload[1] as i8
        )));
    }
    let data = zstd::stream::decode_all(&payload[2..])
        .map_err(|e| corrupt(format!("decompression failed: {e}")))?;
    Ok(SubChunk::new(cy, data))
}

impl WorldStore {
    /// Whether a persisted version marker exists for this chunk.
    pub fn has_chunk(&self, pos: ChunkPos, dim: DimensionId) -> Result<bool, StoreError> {
        Ok(self.kv().get(&keys::chunk_version_key(pos, dim))?.is_some())
    }

    /// Read one subchunk slot. `Ok(None)` when the key is absent; decode
    /// failures surface as [`StoreError::CorruptRecord`].
    pub fn read_subchunk(
        &self,
        pos: ChunkPos,
        cy: i8,
        dim: DimensionId,
    ) -> Result<Option<SubChunk>, StoreError> {
        match self.kv().get(&keys::subchunk_key(pos, cy, dim))? {
            Some(payload) => decode_subchunk(pos, cy, &payload).map(Some),
            None => Ok(None),
        }
    }

    /// Assemble a persisted chunk, or `None` when no version marker exists
    /// and the caller should fall back to generation.
    ///
    /// Absent slots reconstruct as empty. Corrupt slots are logged and also
    /// reconstruct as empty, so one damaged record does not take down the
    /// whole column.
    pub fn load_chunk(&self, pos: ChunkPos, dim: DimensionId) -> Result<Option<Chunk>, StoreError> {
        if !self.has_chunk(pos, dim)? {
            return Ok(None);
        }
        let mut slots = Vec::with_capacity(SUBCHUNK_SLOTS);
        for i in 0..SUBCHUNK_SLOTS {
            let cy = SUBCHUNK_MIN_Y + i as i8;
            let slot = match self.read_subchunk(pos, cy, dim) {
                Ok(Some(sub)) => sub,
                Ok(None) => SubChunk::empty(cy),
                Err(StoreError::CorruptRecord { what, reason }) => {
                    warn!(%what, %reason, "corrupt subchunk record, substituting empty slot");
                    SubChunk::empty(cy)
                }
                Err(e) => return Err(e),
            };
            slots.push(slot);
        }
        Ok(Some(Chunk::from_slots(pos, slots)))
    }

    /// Write a dirty, non-empty chunk: the version marker unconditionally,
    /// then every non-empty slot. Empty slots are skipped. Clears the dirty
    /// flag and returns true when a write happened.
    pub fn write_chunk(&mut self, chunk: &mut Chunk, dim: DimensionId) -> Result<bool, StoreError> {
        if !chunk.is_dirty() || chunk.is_empty() {
            return Ok(false);
        }
        let pos = chunk.pos();
        self.kv_mut()
            .put(&keys::chunk_version_key(pos, dim), &[CHUNK_VERSION])?;
        for sub in chunk.sub_chunks() {
            if sub.is_empty() {
                continue;
            }
            let payload = encode_subchunk(sub)?;
            self.kv_mut()
                .put(&keys::subchunk_key(pos, sub.index(), dim), &payload)?;
        }
        chunk.clear_dirty();
        Ok(true)
    }
}
