use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use worldvault_common::{ChunkPos, DimensionId};
use worldvault_kernel::{
    Dimension, DimensionKind, Entity, FlatGenerator, SpawnLifecycle, StaticTraitRegistry, World,
};
use worldvault_persist::{WorldProperties, WorldProvider};

#[derive(Parser)]
#[command(name = "worldvault-cli", about = "CLI tool for worldvault worlds")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Create a world on disk, populate it, save, shut down, reopen, and
    /// rehydrate
    Demo {
        /// World directory to create
        #[arg(long, default_value = "demo_world")]
        root: PathBuf,
        /// Side length of the square of chunks to generate
        #[arg(long, default_value = "4")]
        radius: i32,
        /// Number of entities to spawn
        #[arg(long, default_value = "8")]
        entities: u32,
    },
    /// Open an existing world and report its persisted contents
    Inspect {
        /// World directory to open
        root: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("worldvault-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", worldvault_common::crate_info());
            println!("kernel: {}", worldvault_kernel::crate_info());
            println!("persist: {}", worldvault_persist::crate_info());
        }
        Commands::Demo {
            root,
            radius,
            entities,
        } => demo(&root, radius, entities)?,
        Commands::Inspect { root } => inspect(&root)?,
    }
    Ok(())
}

fn demo_world() -> anyhow::Result<World> {
    let mut world = World::new("demo");
    world.add_dimension(Dimension::new(
        DimensionId::PRIMARY,
        "overworld",
        DimensionKind::Overworld,
    ))?;
    Ok(world)
}

fn demo_registry() -> StaticTraitRegistry {
    let mut registry = StaticTraitRegistry::new();
    registry.register_type("world:wanderer", &["world:pushable", "world:ageable"]);
    registry
}

fn demo(root: &PathBuf, radius: i32, entities: u32) -> anyhow::Result<()> {
    let generator = FlatGenerator::new();
    let registry = demo_registry();
    let dim_id = DimensionId::PRIMARY;

    info!(root = %root.display(), "creating world");
    let mut provider = WorldProvider::create(root, WorldProperties::new("demo", "Demo World"))?;
    let mut world = demo_world()?;

    for cx in 0..radius {
        for cz in 0..radius {
            let dimension = world.dimension(dim_id).context("primary dimension")?;
            provider.read_chunk(ChunkPos::new(cx, cz), dimension, &generator)?;
        }
    }
    info!(chunks = provider.cache().resident(dim_id), "generated chunks");

    for i in 0..entities {
        let id = provider.create_unique_id(40);
        let mut entity = Entity::new(id, "world:wanderer", dim_id);
        entity.position = glam::Vec3::new(i as f32 * 4.0, 65.0, 0.0);
        entity.attach_type_traits(&registry);
        world
            .dimension_mut(dim_id)
            .context("primary dimension")?
            .spawn(entity);
    }
    let player_uuid = Uuid::new_v4();
    let player_id = provider.create_unique_id(63);
    world
        .dimension_mut(dim_id)
        .context("primary dimension")?
        .spawn(Entity::player(player_id, "world:player", dim_id, player_uuid));
    info!(entities, players = 1, "spawned");

    provider.on_shutdown(&mut world)?;
    info!("saved and shut down");

    // Reopen as a fresh process would
    let mut provider = WorldProvider::open(root)?;
    let mut fresh = demo_world()?;
    provider.on_startup(&mut fresh, &registry, &mut SpawnLifecycle)?;
    let dimension = fresh.dimension(dim_id).context("primary dimension")?;
    info!(rehydrated = dimension.entity_count(), "entities after reopen");
    let player = provider
        .store()
        .read_player(&player_uuid, dimension.identifier())?;
    info!(present = player.is_some(), "player record");
    let chunk = provider.read_chunk(ChunkPos::new(0, 0), dimension, &generator)?;
    info!(dirty = chunk.is_dirty(), "chunk (0,0) reloaded from store");
    Ok(())
}

fn inspect(root: &PathBuf) -> anyhow::Result<()> {
    let provider = WorldProvider::open(root)?;
    let props = provider.properties();
    println!("identifier: {}", props.identifier);
    println!("name:       {}", props.name);
    for dim in [DimensionId::PRIMARY, DimensionId(1), DimensionId(2)] {
        let ids = provider.store().list_entity_ids(dim)?;
        if !ids.is_empty() {
            println!("dimension {}: {} persisted entities", dim.0, ids.len());
        }
    }
    Ok(())
}
