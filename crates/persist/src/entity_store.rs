//! Entity and player persistence.
//!
//! Non-player entities are reachable through a per-dimension list of unique
//! ids (the actor list); the list is the authority for what exists. Players
//! are keyed independently per (uuid, dimension identifier) and never enter
//! the list.

use tracing::warn;
use uuid::Uuid;
use worldvault_common::{DimensionId, UniqueId};

use crate::codec::{self, EntityRecord, PlayerRecord};
use crate::keys;
use crate::store::{StoreError, WorldStore};

impl WorldStore {
    /// Unique ids of the persisted non-player entities in a dimension.
    /// An absent or malformed list reads as empty, not as an error.
    pub fn list_entity_ids(&self, dim: DimensionId) -> Result<Vec<UniqueId>, StoreError> {
        let Some(bytes) = self.kv().get(&keys::actor_list_key(dim))? else {
            return Ok(Vec::new());
        };
        if bytes.len() % 8 != 0 {
            warn!(
                dim = dim.0,
                len = bytes.len(),
                "actor list length is not a multiple of 8, treating as empty"
            );
            return Ok(Vec::new());
        }
        Ok(bytes
            .chunks_exact(8)
            .map(|c| {
                UniqueId(i64::from_le_bytes([
                    c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7],
                ]))
            })
            .collect())
    }

    /// Overwrite the actor list with exactly `ids`. Always a full replace.
    pub fn write_entity_ids(&mut self, dim: DimensionId, ids: &[UniqueId]) -> Result<(), StoreError> {
        let mut bytes = Vec::with_capacity(ids.len() * 8);
        for id in ids {
            bytes.extend_from_slice(&id.0.to_le_bytes());
        }
        self.kv_mut().put(&keys::actor_list_key(dim), &bytes)?;
        Ok(())
    }

    /// Read one entity record. Fails with [`StoreError::EntityNotFound`]
    /// when the id is not in the dimension's actor list, or when the list
    /// names an id whose record bytes are gone.
    pub fn read_entity(&self, unique_id: UniqueId, dim: DimensionId) -> Result<EntityRecord, StoreError> {
        if !self.list_entity_ids(dim)?.contains(&unique_id) {
            return Err(StoreError::EntityNotFound { unique_id });
        }
        match self.kv().get(&keys::actor_data_key(unique_id))? {
            Some(bytes) => Ok(codec::decode(&bytes)?),
            None => {
                warn!(unique_id = unique_id.0, "actor list names an id with no record");
                Err(StoreError::EntityNotFound { unique_id })
            }
        }
    }

    /// Write one entity record, appending its id to the actor list if
    /// missing. The list update and the record write are two separate puts;
    /// the save sweep's full-list replace heals any torn pair.
    pub fn write_entity(&mut self, record: &EntityRecord, dim: DimensionId) -> Result<(), StoreError> {
        let mut ids = self.list_entity_ids(dim)?;
        if !ids.contains(&record.unique_id) {
            ids.push(record.unique_id);
            self.write_entity_ids(dim, &ids)?;
        }
        let bytes = codec::encode(record)?;
        self.kv_mut().put(&keys::actor_data_key(record.unique_id), &bytes)?;
        Ok(())
    }

    /// Read one player record. Absent or corrupt reads as `None`.
    pub fn read_player(
        &self,
        uuid: &Uuid,
        dim_identifier: &str,
    ) -> Result<Option<PlayerRecord>, StoreError> {
        let Some(bytes) = self.kv().get(&keys::player_key(uuid, dim_identifier))? else {
            return Ok(None);
        };
        match codec::decode(&bytes) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(%uuid, dim_identifier, error = %e, "corrupt player record, ignoring");
                Ok(None)
            }
        }
    }

    pub fn write_player(&mut self, record: &PlayerRecord, dim_identifier: &str) -> Result<(), StoreError> {
        let bytes = codec::encode(record)?;
        self.kv_mut()
            .put(&keys::player_key(&record.uuid, dim_identifier), &bytes)?;
        Ok(())
    }
}
