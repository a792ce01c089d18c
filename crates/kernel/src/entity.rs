use glam::Vec3;
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;
use worldvault_common::{DimensionId, Rotation, UniqueId, Value};

use crate::dimension::Dimension;

/// A live entity resident in a dimension.
///
/// Persistence captures entities into transient records and re-hydrates
/// fresh instances on load; a record is never aliased by a live entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub unique_id: UniqueId,
    /// Type identifier, e.g. `world:creeper`.
    pub identifier: String,
    pub dimension: DimensionId,
    pub position: Vec3,
    pub rotation: Rotation,
    pub components: BTreeMap<String, Value>,
    /// Identifiers of traits attached to this entity, in attach order.
    pub traits: Vec<String>,
    pub metadata: BTreeMap<String, Value>,
    pub flags: BTreeMap<String, Value>,
    pub attributes: BTreeMap<String, Value>,
    /// Present for player entities; players are persisted per (uuid,
    /// dimension identifier) instead of the shared actor-id list.
    pub player_uuid: Option<Uuid>,
}

impl Entity {
    pub fn new(unique_id: UniqueId, identifier: impl Into<String>, dimension: DimensionId) -> Self {
        Self {
            unique_id,
            identifier: identifier.into(),
            dimension,
            position: Vec3::ZERO,
            rotation: Rotation::default(),
            components: BTreeMap::new(),
            traits: Vec::new(),
            metadata: BTreeMap::new(),
            flags: BTreeMap::new(),
            attributes: BTreeMap::new(),
            player_uuid: None,
        }
    }

    pub fn player(
        unique_id: UniqueId,
        identifier: impl Into<String>,
        dimension: DimensionId,
        uuid: Uuid,
    ) -> Self {
        let mut entity = Self::new(unique_id, identifier, dimension);
        entity.player_uuid = Some(uuid);
        entity
    }

    pub fn is_player(&self) -> bool {
        self.player_uuid.is_some()
    }

    /// Attach a trait by identifier. Duplicate attaches are ignored.
    pub fn attach_trait(&mut self, identifier: impl Into<String>) {
        let identifier = identifier.into();
        if !self.traits.contains(&identifier) {
            self.traits.push(identifier);
        }
    }

    /// Attach the registry's default traits for this entity's type.
    ///
    /// For freshly spawned entities only: re-hydrated entities carry their
    /// persisted trait list, which is authoritative (a default trait may
    /// have been detached at runtime).
    pub fn attach_type_traits(&mut self, registry: &dyn TraitRegistry) {
        for descriptor in registry.traits_for(&self.identifier) {
            self.attach_trait(descriptor.identifier);
        }
    }
}

/// Descriptor of an entity trait known to the (external) behavior system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitDescriptor {
    pub identifier: String,
}

/// Trait registry collaborator contract. The behavior logic itself lives
/// outside the persistence engine; hydration only needs lookups.
pub trait TraitRegistry {
    /// Traits that apply to a freshly constructed entity of the given type.
    fn traits_for(&self, type_identifier: &str) -> Vec<TraitDescriptor>;
    /// Resolve a single trait identifier.
    fn lookup_trait(&self, identifier: &str) -> Option<TraitDescriptor>;
}

/// Table-driven registry for tests and the CLI demo.
#[derive(Debug, Default)]
pub struct StaticTraitRegistry {
    by_type: BTreeMap<String, Vec<String>>,
    known: BTreeSet<String>,
}

impl StaticTraitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_trait(&mut self, identifier: impl Into<String>) {
        self.known.insert(identifier.into());
    }

    pub fn register_type(&mut self, type_identifier: impl Into<String>, traits: &[&str]) {
        let traits: Vec<String> = traits.iter().map(|s| s.to_string()).collect();
        for t in &traits {
            self.known.insert(t.clone());
        }
        self.by_type.insert(type_identifier.into(), traits);
    }
}

impl TraitRegistry for StaticTraitRegistry {
    fn traits_for(&self, type_identifier: &str) -> Vec<TraitDescriptor> {
        self.by_type
            .get(type_identifier)
            .map(|traits| {
                traits
                    .iter()
                    .map(|t| TraitDescriptor {
                        identifier: t.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn lookup_trait(&self, identifier: &str) -> Option<TraitDescriptor> {
        self.known.contains(identifier).then(|| TraitDescriptor {
            identifier: identifier.to_string(),
        })
    }
}

/// Entity lifecycle collaborator: receives re-hydrated entities at startup
/// and is responsible for activating them in the world.
pub trait EntityLifecycle {
    fn activate(&mut self, dimension: &mut Dimension, entity: Entity);
}

/// Minimal lifecycle that spawns the entity straight into the dimension.
#[derive(Debug, Default)]
pub struct SpawnLifecycle;

impl EntityLifecycle for SpawnLifecycle {
    fn activate(&mut self, dimension: &mut Dimension, entity: Entity) {
        dimension.spawn(entity);
    }
}
