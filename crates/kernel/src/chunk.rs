use serde::{Deserialize, Serialize};
use worldvault_common::ChunkPos;

/// Lowest subchunk index in the vertical range.
pub const SUBCHUNK_MIN_Y: i8 = -4;
/// Number of subchunk slots per chunk.
pub const SUBCHUNK_SLOTS: usize = 16;

/// One vertical slice of a chunk.
///
/// `index` is the signed Y slot (`cy`), persisted directly as a signed byte
/// in subchunk keys. `data` is the opaque block-palette payload; a slice
/// with no non-air (non-zero) bytes is empty and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubChunk {
    index: i8,
    data: Vec<u8>,
}

impl SubChunk {
    pub fn new(index: i8, data: Vec<u8>) -> Self {
        Self { index, data }
    }

    pub fn empty(index: i8) -> Self {
        Self {
            index,
            data: Vec::new(),
        }
    }

    pub fn index(&self) -> i8 {
        self.index
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }
}

/// A fixed horizontal column of world data, subdivided vertically into
/// [`SUBCHUNK_SLOTS`] subchunks starting at [`SUBCHUNK_MIN_Y`].
///
/// The dirty flag is set on every mutation and cleared by the store after
/// a successful write.
#[derive(Debug, Clone)]
pub struct Chunk {
    pos: ChunkPos,
    slots: Vec<SubChunk>,
    dirty: bool,
}

impl Chunk {
    /// A chunk with all slots empty, not dirty.
    pub fn empty(pos: ChunkPos) -> Self {
        let slots = (0..SUBCHUNK_SLOTS)
            .map(|i| SubChunk::empty(SUBCHUNK_MIN_Y + i as i8))
            .collect();
        Self {
            pos,
            slots,
            dirty: false,
        }
    }

    /// Assemble a chunk from already-deserialized slots. The slots must be
    /// exactly [`SUBCHUNK_SLOTS`] entries in ascending index order.
    pub fn from_slots(pos: ChunkPos, slots: Vec<SubChunk>) -> Self {
        debug_assert_eq!(slots.len(), SUBCHUNK_SLOTS);
        Self {
            pos,
            slots,
            dirty: false,
        }
    }

    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    pub fn sub_chunks(&self) -> &[SubChunk] {
        &self.slots
    }

    fn slot_of(cy: i8) -> Option<usize> {
        let offset = cy as i32 - SUBCHUNK_MIN_Y as i32;
        if (0..SUBCHUNK_SLOTS as i32).contains(&offset) {
            Some(offset as usize)
        } else {
            None
        }
    }

    pub fn sub_chunk(&self, cy: i8) -> Option<&SubChunk> {
        Self::slot_of(cy).map(|i| &self.slots[i])
    }

    /// Replace the slot matching the subchunk's index. Marks the chunk
    /// dirty. Returns false if the index is outside the vertical range.
    pub fn set_sub_chunk(&mut self, sub: SubChunk) -> bool {
        match Self::slot_of(sub.index()) {
            Some(i) => {
                self.slots[i] = sub;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Replace the block data of one slot. Marks the chunk dirty.
    pub fn set_sub_chunk_data(&mut self, cy: i8, data: Vec<u8>) -> bool {
        self.set_sub_chunk(SubChunk::new(cy, data))
    }

    /// True when every slot is empty. Empty chunks are never persisted.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(SubChunk::is_empty)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Called by the store after all slots reached the kv engine.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}
