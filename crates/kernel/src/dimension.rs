use std::collections::BTreeMap;
use worldvault_common::{DimensionId, UniqueId};

use crate::entity::Entity;

/// Dimension archetype handed to the terrain generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimensionKind {
    Overworld,
    Nether,
    End,
}

/// A logical world partition. Owns the live entities resident in it;
/// chunks are owned by the chunk cache, keyed by this dimension's id.
#[derive(Debug)]
pub struct Dimension {
    id: DimensionId,
    identifier: String,
    kind: DimensionKind,
    entities: BTreeMap<UniqueId, Entity>,
}

impl Dimension {
    pub fn new(id: DimensionId, identifier: impl Into<String>, kind: DimensionKind) -> Self {
        Self {
            id,
            identifier: identifier.into(),
            kind,
            entities: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> DimensionId {
        self.id
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn kind(&self) -> DimensionKind {
        self.kind
    }

    /// Deterministic iteration: BTreeMap keyed by unique id.
    pub fn entities(&self) -> &BTreeMap<UniqueId, Entity> {
        &self.entities
    }

    pub fn entity(&self, id: UniqueId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: UniqueId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Insert a live entity, replacing any previous instance with the same
    /// unique id.
    pub fn spawn(&mut self, entity: Entity) {
        self.entities.insert(entity.unique_id, entity);
    }

    pub fn despawn(&mut self, id: UniqueId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("dimension index {0:?} already registered")]
    DuplicateDimension(DimensionId),
}

/// The set of dimensions making up one world. The world owns dimensions;
/// chunks and entities reference them by stable id only.
#[derive(Debug)]
pub struct World {
    identifier: String,
    dimensions: Vec<Dimension>,
}

impl World {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            dimensions: Vec::new(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn add_dimension(&mut self, dimension: Dimension) -> Result<(), WorldError> {
        if self.dimensions.iter().any(|d| d.id() == dimension.id()) {
            return Err(WorldError::DuplicateDimension(dimension.id()));
        }
        self.dimensions.push(dimension);
        Ok(())
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn dimensions_mut(&mut self) -> &mut [Dimension] {
        &mut self.dimensions
    }

    pub fn dimension(&self, id: DimensionId) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.id() == id)
    }

    pub fn dimension_mut(&mut self, id: DimensionId) -> Option<&mut Dimension> {
        self.dimensions.iter_mut().find(|d| d.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_and_despawn() {
        let mut dim = Dimension::new(DimensionId::PRIMARY, "overworld", DimensionKind::Overworld);
        dim.spawn(Entity::new(UniqueId(10), "world:pig", dim.id()));
        assert_eq!(dim.entity_count(), 1);
        assert!(dim.entity(UniqueId(10)).is_some());

        let removed = dim.despawn(UniqueId(10));
        assert!(removed.is_some());
        assert_eq!(dim.entity_count(), 0);
    }

    #[test]
    fn duplicate_dimension_index_rejected() {
        let mut world = World::new("test");
        world
            .add_dimension(Dimension::new(
                DimensionId::PRIMARY,
                "overworld",
                DimensionKind::Overworld,
            ))
            .unwrap();
        let dup = Dimension::new(DimensionId::PRIMARY, "other", DimensionKind::Nether);
        assert!(world.add_dimension(dup).is_err());
    }

    #[test]
    fn dimension_lookup_by_id() {
        let mut world = World::new("test");
        world
            .add_dimension(Dimension::new(
                DimensionId(1),
                "nether",
                DimensionKind::Nether,
            ))
            .unwrap();
        assert_eq!(world.dimension(DimensionId(1)).map(|d| d.identifier()), Some("nether"));
        assert!(world.dimension(DimensionId(2)).is_none());
    }
}
