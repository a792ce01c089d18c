//! World provider: lifecycle orchestration over the store and cache.
//!
//! States: Created -> Started -> (saving)* -> Shutdown. Startup rehydrates
//! persisted entities per dimension; the save sweep flushes dirty chunks and
//! rewrites entity state; shutdown saves, then closes the store. Everything
//! runs on the world-tick thread and blocks it for its duration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use worldvault_common::{ChunkPos, UniqueId, UniqueIdAllocator};
use worldvault_kernel::{Chunk, Dimension, Entity, EntityLifecycle, TerrainGenerator, TraitRegistry, World};

use crate::cache::ChunkCache;
use crate::codec::{EntityRecord, PlayerRecord};
use crate::kv::FileKvStore;
use crate::store::{StoreError, WorldStore};

/// Name of the metadata file written next to the `db` directory.
pub const PROPERTIES_FILE: &str = "properties.json";
/// Name of the kv store directory inside a world directory.
pub const DB_DIR: &str = "db";

/// World metadata persisted as `properties.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldProperties {
    pub identifier: String,
    pub name: String,
}

impl WorldProperties {
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProviderState {
    Created,
    Started,
    Shutdown,
}

/// Orchestrates persistence lifecycle for one world.
pub struct WorldProvider {
    root: Option<PathBuf>,
    properties: WorldProperties,
    store: WorldStore,
    cache: ChunkCache,
    allocator: UniqueIdAllocator,
    state: ProviderState,
}

impl WorldProvider {
    /// Register a new world at `root`: validates the identifier, writes
    /// `properties.json`, and opens the kv store under `root/db`.
    ///
    /// Registering over an existing world is a configuration error.
    pub fn create(root: impl AsRef<Path>, properties: WorldProperties) -> Result<Self, StoreError> {
        if properties.identifier.is_empty() {
            return Err(StoreError::MissingIdentifier);
        }
        let root = root.as_ref().to_path_buf();
        let props_path = root.join(PROPERTIES_FILE);
        if props_path.exists() {
            return Err(StoreError::WorldExists {
                identifier: properties.identifier,
            });
        }
        std::fs::create_dir_all(&root)?;
        serde_json::to_writer_pretty(std::fs::File::create(&props_path)?, &properties)?;
        let kv = FileKvStore::open(root.join(DB_DIR))?;
        info!(identifier = %properties.identifier, root = %root.display(), "world registered");
        Ok(Self {
            root: Some(root),
            properties,
            store: WorldStore::new(Box::new(kv)),
            cache: ChunkCache::new(),
            allocator: UniqueIdAllocator::new(),
            state: ProviderState::Created,
        })
    }

    /// Open a previously registered world.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        let properties: WorldProperties =
            serde_json::from_reader(std::fs::File::open(root.join(PROPERTIES_FILE))?)?;
        if properties.identifier.is_empty() {
            return Err(StoreError::MissingIdentifier);
        }
        let kv = FileKvStore::open(root.join(DB_DIR))?;
        Ok(Self {
            root: Some(root),
            properties,
            store: WorldStore::new(Box::new(kv)),
            cache: ChunkCache::new(),
            allocator: UniqueIdAllocator::new(),
            state: ProviderState::Created,
        })
    }

    /// Memory-backed provider for tests and ephemeral worlds.
    pub fn in_memory(properties: WorldProperties) -> Result<Self, StoreError> {
        if properties.identifier.is_empty() {
            return Err(StoreError::MissingIdentifier);
        }
        Ok(Self {
            root: None,
            properties,
            store: WorldStore::in_memory(),
            cache: ChunkCache::new(),
            allocator: UniqueIdAllocator::new(),
            state: ProviderState::Created,
        })
    }

    pub fn properties(&self) -> &WorldProperties {
        &self.properties
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn store(&self) -> &WorldStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut WorldStore {
        &mut self.store
    }

    pub fn cache(&self) -> &ChunkCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ChunkCache {
        &mut self.cache
    }

    /// Allocate a unique id for a new entity of the given network type.
    pub fn create_unique_id(&mut self, network_type_id: u32) -> UniqueId {
        self.allocator.allocate(network_type_id)
    }

    /// Load-or-generate read path, guarded by the lifecycle state.
    pub fn read_chunk<'a>(
        &'a mut self,
        pos: ChunkPos,
        dimension: &Dimension,
        generator: &dyn TerrainGenerator,
    ) -> Result<&'a mut Chunk, StoreError> {
        self.ensure_open()?;
        self.cache.read_chunk(pos, dimension, &self.store, generator)
    }

    /// Rehydrate persisted entities for every dimension in the world.
    ///
    /// Per id: read the record, build a fresh entity, apply the record,
    /// attach its traits, hand it to the lifecycle for activation. A failed
    /// id is logged and skipped; the dimension's remaining ids still load.
    ///
    /// Traits reattach one at a time from the persisted list, each resolved
    /// through the registry; an unresolvable trait is logged and left off.
    /// Type-default traits are not consulted here: the persisted list is
    /// authoritative, and a default may have been detached at runtime.
    pub fn on_startup(
        &mut self,
        world: &mut World,
        traits: &dyn TraitRegistry,
        lifecycle: &mut dyn EntityLifecycle,
    ) -> Result<(), StoreError> {
        self.ensure_open()?;
        for dimension in world.dimensions_mut() {
            let ids = self.store.list_entity_ids(dimension.id())?;
            debug!(dim = dimension.id().0, count = ids.len(), "rehydrating entities");
            for id in ids {
                let record = match self.store.read_entity(id, dimension.id()) {
                    Ok(record) => record,
                    Err(e) => {
                        warn!(unique_id = id.0, error = %e, "skipping unloadable entity");
                        continue;
                    }
                };
                let mut entity = Entity::new(record.unique_id, record.identifier.clone(), dimension.id());
                if let Err(e) = record.apply_to(&mut entity) {
                    warn!(unique_id = id.0, error = %e, "skipping entity with bad record");
                    continue;
                }
                for trait_id in &record.traits {
                    match traits.lookup_trait(trait_id) {
                        Some(descriptor) => entity.attach_trait(descriptor.identifier),
                        None => {
                            warn!(unique_id = id.0, %trait_id, "unknown trait, not attached")
                        }
                    }
                }
                lifecycle.activate(dimension, entity);
            }
        }
        self.state = ProviderState::Started;
        Ok(())
    }

    /// Flush dirty chunks and persist all live entities and players.
    ///
    /// The per-dimension actor list is rewritten to exactly the non-player
    /// entities alive at save time: entities removed from the world drop
    /// out of persistence here.
    pub fn on_save(&mut self, world: &mut World) -> Result<(), StoreError> {
        self.ensure_open()?;
        for dimension in world.dimensions_mut() {
            let mut chunks_written = 0usize;
            for chunk in self.cache.chunks_mut(dimension.id()) {
                if self.store.write_chunk(chunk, dimension.id())? {
                    chunks_written += 1;
                }
            }

            let mut ids = Vec::new();
            for entity in dimension.entities().values() {
                if entity.is_player() {
                    // capture is Some by the is_player check
                    if let Some(record) = PlayerRecord::capture(entity) {
                        self.store.write_player(&record, dimension.identifier())?;
                    }
                } else {
                    self.store
                        .write_entity(&EntityRecord::capture(entity), dimension.id())?;
                    ids.push(entity.unique_id);
                }
            }
            self.store.write_entity_ids(dimension.id(), &ids)?;
            debug!(
                dim = dimension.id().0,
                chunks_written,
                entities = ids.len(),
                "dimension saved"
            );
        }
        // everything written above becomes durable here
        self.store.flush()?;
        Ok(())
    }

    /// Final save, then close the store. No operation is valid afterwards.
    pub fn on_shutdown(&mut self, world: &mut World) -> Result<(), StoreError> {
        self.on_save(world)?;
        self.store.close()?;
        self.state = ProviderState::Shutdown;
        info!(identifier = %self.properties.identifier, "world provider shut down");
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.state == ProviderState::Shutdown {
            return Err(StoreError::ShutDown);
        }
        Ok(())
    }
}
