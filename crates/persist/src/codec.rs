//! Record codec for entity and player payloads.
//!
//! Records are CBOR (ciborium): self-describing, and carries 64-bit
//! integers, infinities and NaN natively, so no value needs a sentinel
//! string and `decode(encode(x)) == x` holds for the full [`Value`] range.

use glam::Vec3;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use worldvault_common::{Rotation, UniqueId, Value};
use worldvault_kernel::Entity;

/// Errors from record encoding, decoding, and application.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("CBOR encode error: {0}")]
    Encode(String),
    #[error("CBOR decode error: {0}")]
    Decode(String),
    #[error("record identity mismatch: expected {expected}, found {found}")]
    IdentityMismatch { expected: String, found: String },
}

/// Persisted projection of a live non-player entity. Transient DTO: never
/// aliased by the live entity, which is re-hydrated into a fresh object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub unique_id: UniqueId,
    pub identifier: String,
    pub position: Vec3,
    pub rotation: Rotation,
    pub components: BTreeMap<String, Value>,
    pub traits: Vec<String>,
    pub metadata: BTreeMap<String, Value>,
    pub flags: BTreeMap<String, Value>,
    pub attributes: BTreeMap<String, Value>,
}

impl EntityRecord {
    /// Snapshot a live entity into a record.
    pub fn capture(entity: &Entity) -> Self {
        Self {
            unique_id: entity.unique_id,
            identifier: entity.identifier.clone(),
            position: entity.position,
            rotation: entity.rotation,
            components: entity.components.clone(),
            traits: entity.traits.clone(),
            metadata: entity.metadata.clone(),
            flags: entity.flags.clone(),
            attributes: entity.attributes.clone(),
        }
    }

    /// Apply this record to a live entity.
    ///
    /// `unique_id` and `identifier` are identity-defining: a mismatch means
    /// the caller handed the wrong record to the wrong entity, and the load
    /// is rejected rather than silently re-identifying the instance.
    ///
    /// The trait list is NOT applied here. Traits attach through the
    /// registry on the hydration path, one at a time, so an unresolvable
    /// trait can be skipped instead of riding in unchecked.
    pub fn apply_to(&self, entity: &mut Entity) -> Result<(), CodecError> {
        if self.unique_id != entity.unique_id || self.identifier != entity.identifier {
            return Err(CodecError::IdentityMismatch {
                expected: format!("{}#{}", entity.identifier, entity.unique_id.0),
                found: format!("{}#{}", self.identifier, self.unique_id.0),
            });
        }
        entity.position = self.position;
        entity.rotation = self.rotation;
        entity.components = self.components.clone();
        entity.metadata = self.metadata.clone();
        entity.flags = self.flags.clone();
        entity.attributes = self.attributes.clone();
        Ok(())
    }
}

/// Player record: an entity record plus the stable player uuid. Keyed per
/// (uuid, dimension identifier) instead of the shared actor-id list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub uuid: Uuid,
    pub record: EntityRecord,
}

impl PlayerRecord {
    /// Snapshot a live player entity; `None` for non-players.
    pub fn capture(entity: &Entity) -> Option<Self> {
        entity.player_uuid.map(|uuid| Self {
            uuid,
            record: EntityRecord::capture(entity),
        })
    }
}

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(buf)
}

pub fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<T, CodecError> {
    ciborium::from_reader(data).map_err(|e| CodecError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use worldvault_common::DimensionId;

    fn sample_entity() -> Entity {
        let mut e = Entity::new(UniqueId(0x1_0000_0001), "world:creeper", DimensionId::PRIMARY);
        e.position = Vec3::new(1.5, 64.0, -7.25);
        e.rotation = Rotation::new(90.0, -10.0, 85.0);
        e.attach_trait("world:explosive");
        e.attach_trait("world:hostile");
        e.attributes
            .insert("world:follow_range".to_string(), Value::Float(f64::INFINITY));
        e.components
            .insert("world:home".to_string(), Value::List(vec![Value::Int(3), Value::Int(-9)]));
        e.metadata
            .insert("name".to_string(), Value::from("Jeb"));
        e.flags.insert("on_fire".to_string(), Value::Bool(false));
        e
    }

    #[test]
    fn entity_record_round_trips_field_for_field() {
        let record = EntityRecord::capture(&sample_entity());
        let bytes = encode(&record).unwrap();
        let back: EntityRecord = decode(&bytes).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.unique_id, UniqueId(0x1_0000_0001));
        assert_eq!(back.traits, vec!["world:explosive", "world:hostile"]);
        assert_eq!(
            back.attributes["world:follow_range"],
            Value::Float(f64::INFINITY)
        );
    }

    #[test]
    fn non_finite_floats_survive_encoding() {
        let mut record = EntityRecord::capture(&sample_entity());
        record
            .attributes
            .insert("nan".to_string(), Value::Float(f64::NAN));
        record
            .attributes
            .insert("neg_inf".to_string(), Value::Float(f64::NEG_INFINITY));
        let back: EntityRecord = decode(&encode(&record).unwrap()).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn full_i64_range_survives_encoding() {
        let mut record = EntityRecord::capture(&sample_entity());
        record
            .components
            .insert("min".to_string(), Value::Int(i64::MIN));
        record
            .components
            .insert("max".to_string(), Value::Int(i64::MAX));
        let back: EntityRecord = decode(&encode(&record).unwrap()).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn strings_need_no_sentinel_escaping() {
        // A string that would have collided with a legacy suffix tag is
        // just a string in the tagged encoding.
        let mut record = EntityRecord::capture(&sample_entity());
        record
            .metadata
            .insert("odd".to_string(), Value::from("12345BigInt_t"));
        let back: EntityRecord = decode(&encode(&record).unwrap()).unwrap();
        assert_eq!(back.metadata["odd"], Value::from("12345BigInt_t"));
    }

    #[test]
    fn apply_rejects_identity_mismatch() {
        let entity = sample_entity();
        let record = EntityRecord::capture(&entity);

        let mut wrong_id = Entity::new(UniqueId(999), "world:creeper", DimensionId::PRIMARY);
        assert!(matches!(
            record.apply_to(&mut wrong_id),
            Err(CodecError::IdentityMismatch { .. })
        ));

        let mut wrong_type = Entity::new(entity.unique_id, "world:pig", DimensionId::PRIMARY);
        assert!(record.apply_to(&mut wrong_type).is_err());
    }

    #[test]
    fn apply_restores_state_but_leaves_traits_to_the_caller() {
        let original = sample_entity();
        let record = EntityRecord::capture(&original);
        let mut fresh = Entity::new(original.unique_id, original.identifier.clone(), original.dimension);
        record.apply_to(&mut fresh).unwrap();
        assert_eq!(fresh.position, original.position);
        assert_eq!(fresh.rotation, original.rotation);
        assert_eq!(fresh.components, original.components);
        assert_eq!(fresh.metadata, original.metadata);
        assert_eq!(fresh.flags, original.flags);
        assert_eq!(fresh.attributes, original.attributes);
        // traits go through the registry on hydration, never through apply
        assert!(fresh.traits.is_empty());
    }

    #[test]
    fn player_record_round_trips() {
        let uuid = Uuid::new_v4();
        let mut entity = sample_entity();
        entity.player_uuid = Some(uuid);
        let record = PlayerRecord::capture(&entity).unwrap();
        let back: PlayerRecord = decode(&encode(&record).unwrap()).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.uuid, uuid);
    }

    #[test]
    fn capture_player_of_non_player_is_none() {
        assert!(PlayerRecord::capture(&sample_entity()).is_none());
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode::<EntityRecord>(&[0xff, 0x00, 0x13]).is_err());
    }
}
