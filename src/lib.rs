#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Mesher
//!
//! Greedy meshing for chunked voxel worlds.
//!
//! This crate turns 16x16x16 chunks of blocks into compact face lists ready
//! for a renderer: hidden faces are culled (including across chunk borders),
//! coplanar faces of one block type are merged into rectangles, and the output
//! is split into an opaque batch and a transparent batch.
//!
//! ## Key Modules
//!
//! * `voxels` - Block types and properties, chunk storage, the chunk map
//! * `meshing` - The greedy mesher, its output types and the `MeshManager`
//! * `task_management` - Worker pool that runs mesh builds in the background
//! * `core` - Shared-state primitives used by the worker pool
//! * `config` - JSON configuration
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Point3;
//! use voxel_mesher::{BlockType, Chunk, ChunkMesher, World};
//!
//! let mut world = World::new();
//! let mut chunk = Chunk::new(Point3::new(0, 0, 0));
//! chunk.set_block(0, 0, 0, BlockType::STONE);
//! chunk.set_block(1, 0, 0, BlockType::GLASS);
//! world.insert_chunk(chunk.clone());
//!
//! let mesh = ChunkMesher::build(&chunk, &world);
//! assert_eq!(mesh.opaque_faces().len(), 6);
//! assert_eq!(mesh.transparent_faces().len(), 5);
//! ```
//!
//! ## Performance Considerations
//!
//! * Chunk storage keeps an occupancy bit mask so empty chunks cost nothing
//! * Greedy meshing keeps face counts proportional to surface complexity
//! * Independent chunks are meshed in parallel on a worker pool

use cgmath::Point3;
use log::{info, warn};
use web_time::Instant;

pub mod config;
pub mod core;
pub mod error;
pub mod meshing;
pub mod task_management;
pub mod voxels;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use meshing::{ChunkMesher, Face, MeshData, MeshManager, StoreOutcome, Vertex};
pub use task_management::TaskManager;
pub use voxels::{
    block::{
        block_side::{Axis, BlockSide, Sign},
        block_type::BlockType,
        registry::BlockRegistry,
        shape_kind::ShapeKind,
    },
    chunk::{Chunk, CHUNK_DIMENSION},
    world::{ChunkGenerationMethod, ChunkGenerator, VoxelQuery, World},
};

use crate::core::MtResource;

/// Builds a world from the configuration and meshes it on the worker pool.
///
/// Configuration comes from the file named by `VOXEL_MESHER_CONFIG`, or the
/// defaults. Logging goes to stdout, filtered by `RUST_LOG`.
pub fn run() -> EngineResult<()> {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = EngineConfig::from_env()?;
    let generator = config.world.generator()?;
    let radius = config.world.radius as i32;

    let start = Instant::now();
    let mut world = World::new();
    for z in -radius..=radius {
        for y in -radius..=radius {
            for x in -radius..=radius {
                world.add_chunk_at(Point3::new(x, y, z), &generator);
            }
        }
    }
    info!(
        "Generated {} {:?} chunks in {:?}",
        world.len(),
        generator.method,
        start.elapsed()
    );

    let mut mesh_manager = MeshManager::new(config.mesh_cache_capacity)?;
    let mut task_manager = TaskManager::new(config.num_workers)?;
    mesh_manager.mark_block_changed(&world.chunk_positions());
    let world = MtResource::new(world);

    let start = Instant::now();
    let scheduled = mesh_manager.schedule_dirty(&mut task_manager, &world);
    task_manager.wait_for_idle(&mut mesh_manager)?;
    log_mesh_stats(&mesh_manager, scheduled, start);
    unload_evicted(&mut mesh_manager, &world);

    // Carve out the block at the origin and remesh what it touched.
    let affected = world.get_mut().set_block_at(0, 0, 0, BlockType::AIR);
    mesh_manager.mark_block_changed(&affected);

    let start = Instant::now();
    let scheduled = mesh_manager.schedule_dirty(&mut task_manager, &world);
    task_manager.wait_for_idle(&mut mesh_manager)?;
    info!("Remeshed {} chunks after an edit in {:?}", scheduled, start.elapsed());
    unload_evicted(&mut mesh_manager, &world);

    Ok(())
}

/// Drops chunks whose mesh fell out of the cache, and dirties their neighbors.
fn unload_evicted(mesh_manager: &mut MeshManager, world: &MtResource<World>) {
    let evicted = mesh_manager.take_evicted();
    if evicted.is_empty() {
        return;
    }

    warn!("Unloading {} chunks evicted from the mesh cache", evicted.len());
    let mut world = world.get_mut();
    for position in evicted {
        world.remove_chunk(position);
        mesh_manager.unload(position);
        for neighbor in world.loaded_neighbors(position) {
            mesh_manager.mark_dirty(neighbor);
        }
    }
}

fn log_mesh_stats(mesh_manager: &MeshManager, scheduled: usize, start: Instant) {
    let (opaque, transparent) = mesh_manager
        .meshes()
        .fold((0, 0), |(opaque, transparent), (_, mesh)| {
            (
                opaque + mesh.opaque_faces().len(),
                transparent + mesh.transparent_faces().len(),
            )
        });

    info!(
        "Meshed {} chunks in {:?} ({} retained): {} opaque faces, {} transparent faces",
        scheduled,
        start.elapsed(),
        mesh_manager.len(),
        opaque,
        transparent
    );
}
