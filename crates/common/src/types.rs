use serde::{Deserialize, Serialize};

/// Chunk coordinate within a dimension (XZ plane, chunk granularity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkPos {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkPos {
    pub fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }
}

/// Stable small integer index of a dimension. Index 0 is the primary
/// dimension and is omitted from persisted key encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DimensionId(pub i32);

impl DimensionId {
    pub const PRIMARY: DimensionId = DimensionId(0);

    pub fn is_primary(self) -> bool {
        self.0 == 0
    }
}

/// Process-scoped 64-bit entity identity, distinct from any short-lived
/// runtime id. Persisted keys embed it little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UniqueId(pub i64);

/// Entity orientation: yaw, pitch, and head yaw in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    pub yaw: f32,
    pub pitch: f32,
    pub head_yaw: f32,
}

impl Rotation {
    pub fn new(yaw: f32, pitch: f32, head_yaw: f32) -> Self {
        Self {
            yaw,
            pitch,
            head_yaw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_dimension_is_index_zero() {
        assert!(DimensionId::PRIMARY.is_primary());
        assert!(!DimensionId(1).is_primary());
        assert!(!DimensionId(-1).is_primary());
    }

    #[test]
    fn chunk_pos_equality_and_ordering() {
        let a = ChunkPos::new(1, -2);
        let b = ChunkPos::new(1, -2);
        assert_eq!(a, b);
        assert!(ChunkPos::new(0, 0) < ChunkPos::new(1, 0));
    }

    #[test]
    fn rotation_default_is_zeroed() {
        let r = Rotation::default();
        assert_eq!(r.yaw, 0.0);
        assert_eq!(r.pitch, 0.0);
        assert_eq!(r.head_yaw, 0.0);
    }
}
