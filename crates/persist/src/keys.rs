//! Deterministic, fixed-layout byte keys for the ordered kv store.
//!
//! All multi-byte integers are little-endian. Keys for dimension index 0
//! omit the index field entirely; pre-existing worlds were written that
//! way and the format family requires byte-exact compatibility. Callers
//! must not assume a fixed key length.

use uuid::Uuid;
use worldvault_common::{ChunkPos, DimensionId, UniqueId};

/// Record tag terminating a chunk version key.
pub const TAG_CHUNK_VERSION: u8 = 0x2c;
/// Record tag preceding the signed subchunk index byte.
pub const TAG_SUBCHUNK: u8 = 0x2f;
/// Leading tag of the per-dimension actor-id list key.
pub const ACTOR_LIST_TAG: &[u8; 4] = b"digp";
/// ASCII prefix of per-entity data keys.
pub const ACTOR_DATA_PREFIX: &[u8] = b"actorprefix";
/// ASCII prefix of per-player record keys.
pub const PLAYER_KEY_PREFIX: &str = "player_server_";

fn push_chunk_prefix(key: &mut Vec<u8>, pos: ChunkPos, dim: DimensionId) {
    key.extend_from_slice(&pos.cx.to_le_bytes());
    key.extend_from_slice(&pos.cz.to_le_bytes());
    if !dim.is_primary() {
        key.extend_from_slice(&dim.0.to_le_bytes());
    }
}

/// Key of one subchunk payload: cx, cz, [dim], 0x2F, signed cy byte.
pub fn subchunk_key(pos: ChunkPos, cy: i8, dim: DimensionId) -> Vec<u8> {
    let mut key = Vec::with_capacity(14);
    push_chunk_prefix(&mut key, pos, dim);
    key.push(TAG_SUBCHUNK);
    key.push(cy as u8);
    key
}

/// Key of the chunk existence/version marker: cx, cz, [dim], 0x2C.
pub fn chunk_version_key(pos: ChunkPos, dim: DimensionId) -> Vec<u8> {
    let mut key = Vec::with_capacity(13);
    push_chunk_prefix(&mut key, pos, dim);
    key.push(TAG_CHUNK_VERSION);
    key
}

/// Key of the per-dimension list of persisted non-player entity ids.
pub fn actor_list_key(dim: DimensionId) -> Vec<u8> {
    let mut key = Vec::with_capacity(8);
    key.extend_from_slice(ACTOR_LIST_TAG);
    if !dim.is_primary() {
        key.extend_from_slice(&dim.0.to_le_bytes());
    }
    key
}

/// Key of one entity's record: `actorprefix` + unique id (i64 LE).
pub fn actor_data_key(unique_id: UniqueId) -> Vec<u8> {
    let mut key = Vec::with_capacity(ACTOR_DATA_PREFIX.len() + 8);
    key.extend_from_slice(ACTOR_DATA_PREFIX);
    key.extend_from_slice(&unique_id.0.to_le_bytes());
    key
}

/// Key of one player's record, scoped to a dimension by identifier.
pub fn player_key(uuid: &Uuid, dim_identifier: &str) -> Vec<u8> {
    format!("{PLAYER_KEY_PREFIX}{uuid}_{dim_identifier}").into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subchunk_key_is_byte_exact() {
        let key = subchunk_key(ChunkPos::new(1, -2), 0, DimensionId::PRIMARY);
        assert_eq!(
            key,
            vec![0x01, 0x00, 0x00, 0x00, 0xfe, 0xff, 0xff, 0xff, 0x2f, 0x00]
        );
    }

    #[test]
    fn subchunk_key_negative_cy_is_signed_byte() {
        let key = subchunk_key(ChunkPos::new(0, 0), -4, DimensionId::PRIMARY);
        assert_eq!(*key.last().unwrap(), 0xfc);
    }

    #[test]
    fn key_building_is_deterministic() {
        let a = subchunk_key(ChunkPos::new(1, -2), 0, DimensionId::PRIMARY);
        let b = subchunk_key(ChunkPos::new(1, -2), 0, DimensionId::PRIMARY);
        assert_eq!(a, b);
    }

    #[test]
    fn primary_dimension_omits_index_field() {
        let primary = chunk_version_key(ChunkPos::new(5, 5), DimensionId::PRIMARY);
        let nether = chunk_version_key(ChunkPos::new(5, 5), DimensionId(1));
        assert_eq!(primary.len(), 9);
        assert_eq!(nether.len(), 13);
        assert_eq!(&nether[8..12], &1i32.to_le_bytes());
        assert_eq!(*primary.last().unwrap(), TAG_CHUNK_VERSION);
    }

    #[test]
    fn actor_list_key_layout() {
        assert_eq!(actor_list_key(DimensionId::PRIMARY), b"digp");
        let with_dim = actor_list_key(DimensionId(2));
        assert_eq!(&with_dim[..4], b"digp");
        assert_eq!(&with_dim[4..], &2i32.to_le_bytes());
    }

    #[test]
    fn actor_data_key_embeds_le_id() {
        let key = actor_data_key(UniqueId(0x0102_0304_0506_0708));
        assert_eq!(&key[..11], b"actorprefix");
        assert_eq!(
            &key[11..],
            &[0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]
        );
    }

    #[test]
    fn player_key_is_ascii_composite() {
        let uuid = Uuid::nil();
        let key = player_key(&uuid, "overworld");
        assert_eq!(
            key,
            b"player_server_00000000-0000-0000-0000-000000000000_overworld".to_vec()
        );
    }

    #[test]
    fn distinct_coordinates_never_collide() {
        let a = subchunk_key(ChunkPos::new(1, 2), 3, DimensionId::PRIMARY);
        let b = subchunk_key(ChunkPos::new(2, 1), 3, DimensionId::PRIMARY);
        let c = subchunk_key(ChunkPos::new(1, 2), 4, DimensionId::PRIMARY);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
