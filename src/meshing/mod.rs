//! Mesh generation and management for voxel rendering.
//!
//! This module owns the caller side of meshing: which chunks need a new mesh,
//! which builds are still current, and where finished meshes are kept.
//!
//! # Architecture
//! - `MeshManager`: Dirty tracking, build generations and mesh retention
//! - `mesh/`: The greedy mesher and its output types
//! - `tasks/`: Background task that runs one chunk build on a worker
//!
//! # Generations
//! Every time a chunk's mesh becomes stale (block edit, neighbor load) the
//! chunk is stamped with a fresh value from one manager-wide counter. A build
//! is tagged with the stamp it was scheduled at, and [`MeshManager::store`]
//! throws the result away if the chunk carries a different stamp by then.
//! Builds can therefore finish in any order without an older mesh overwriting
//! a newer one. Unloading a chunk forgets its stamp entirely; because the
//! counter never repeats, builds still in flight for it can never match again.
//!
//! # Eviction
//! When the cache is full, storing a mesh pushes out the least recently used
//! one. The evicted position is reported through [`StoreOutcome::Evicted`] and
//! queued for [`MeshManager::take_evicted`], so the owner of the world can
//! unload that chunk or mark it dirty again.
//!
//! # Performance Considerations
//! - Meshes are retained in an LRU cache, so memory stays bounded when many chunks are loaded
//! - Rebuilds only touch chunks that were marked dirty

use std::{
    collections::{HashMap, HashSet},
    num::NonZeroUsize,
};

use cgmath::Point3;
use log::{debug, info};
use lru::LruCache;
use web_time::Instant;

mod mesh;
pub mod tasks;

pub use mesh::*;

use crate::{
    core::MtResource,
    error::{EngineError, EngineResult},
    task_management::TaskManager,
    voxels::world::World,
};
use tasks::chunk_mesh_generation_task::ChunkMeshGenerationTask;

/// Number of chunk meshes retained when no capacity is configured.
pub const DEFAULT_MESH_CACHE_CAPACITY: usize = 10000;

/// What [`MeshManager::store`] did with a finished mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The mesh was kept
    Stored,
    /// The mesh was kept and pushed out the mesh of another chunk
    Evicted(Point3<i32>),
    /// A newer build superseded this one; the mesh was dropped
    Superseded,
}

impl StoreOutcome {
    /// Whether the mesh ended up in the cache.
    pub fn is_stored(self) -> bool {
        !matches!(self, StoreOutcome::Superseded)
    }
}

/// Central manager for chunk meshes.
///
/// The `MeshManager` is responsible for:
/// - Tracking which chunks need their mesh rebuilt
/// - Handing out build generations and rejecting superseded results
/// - Keeping the most recently used meshes within a fixed capacity
/// - Handling chunk loading and unloading
pub struct MeshManager {
    /// Latest mesh per chunk position, least recently used evicted first
    meshes: LruCache<Point3<i32>, MeshData>,
    /// Chunks whose mesh is missing or stale
    dirty: HashSet<Point3<i32>>,
    /// Build generation per tracked chunk position
    generations: HashMap<Point3<i32>, u64>,
    /// Last value handed out by `bump_generation`
    last_generation: u64,
    /// Chunks whose mesh was pushed out of the cache since the last `take_evicted`
    evicted: Vec<Point3<i32>>,
}

impl MeshManager {
    /// Creates a mesh manager that retains at most `capacity` meshes.
    ///
    /// # Errors
    /// [`EngineError::InvalidConfig`] if `capacity` is zero
    pub fn new(capacity: usize) -> EngineResult<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            EngineError::InvalidConfig("mesh cache capacity must be at least 1".to_string())
        })?;

        Ok(MeshManager {
            meshes: LruCache::new(capacity),
            dirty: HashSet::new(),
            generations: HashMap::new(),
            last_generation: 0,
            evicted: Vec::new(),
        })
    }

    /// Current build generation of a chunk position, 0 if it is not tracked.
    pub fn generation(&self, position: Point3<i32>) -> u64 {
        self.generations.get(&position).copied().unwrap_or(0)
    }

    fn bump_generation(&mut self, position: Point3<i32>) -> u64 {
        self.last_generation += 1;
        self.generations.insert(position, self.last_generation);
        self.last_generation
    }

    /// Number of chunk positions with a live generation.
    pub fn tracked_count(&self) -> usize {
        self.generations.len()
    }

    /// Marks a chunk's mesh as stale.
    ///
    /// Any build of this chunk still in flight will be discarded when it lands.
    ///
    /// # Returns
    /// The new generation of the chunk
    pub fn mark_dirty(&mut self, position: Point3<i32>) -> u64 {
        self.dirty.insert(position);
        self.bump_generation(position)
    }

    /// Marks every chunk touched by a block edit as stale.
    ///
    /// Takes the list returned by [`World::set_block_at`].
    pub fn mark_block_changed(&mut self, positions: &[Point3<i32>]) {
        for &position in positions {
            self.mark_dirty(position);
        }
    }

    /// Marks a newly loaded chunk and its loaded neighbors as stale.
    ///
    /// The neighbors' boundary faces may now be hidden by the new chunk.
    pub fn mark_chunk_loaded(&mut self, world: &World, position: Point3<i32>) {
        self.mark_dirty(position);
        for neighbor in world.loaded_neighbors(position) {
            self.mark_dirty(neighbor);
        }
    }

    /// Whether a chunk is waiting for a rebuild.
    pub fn is_dirty(&self, position: Point3<i32>) -> bool {
        self.dirty.contains(&position)
    }

    /// Number of chunks waiting for a rebuild.
    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Clears the dirty set, returning each chunk with the generation to build it at.
    ///
    /// Positions are sorted so scheduling order is deterministic.
    pub fn take_dirty(&mut self) -> Vec<(Point3<i32>, u64)> {
        let mut positions: Vec<_> = self.dirty.drain().collect();
        positions.sort_by_key(|p| (p.x, p.y, p.z));
        positions
            .into_iter()
            .map(|position| (position, self.generation(position)))
            .collect()
    }

    /// Stores a finished mesh if it was built at the chunk's current generation.
    ///
    /// A full cache evicts its least recently used mesh. The evicted chunk is
    /// also queued for [`MeshManager::take_evicted`].
    pub fn store(&mut self, position: Point3<i32>, generation: u64, mesh: MeshData) -> StoreOutcome {
        let current = self.generation(position);
        if generation == 0 || generation != current {
            debug!(
                "Discarding stale mesh for chunk {:?} (generation {}, current {})",
                position, generation, current
            );
            return StoreOutcome::Superseded;
        }

        match self.meshes.push(position, mesh) {
            Some((evicted, _)) if evicted != position => {
                debug!("Evicted mesh for chunk {:?}", evicted);
                self.evicted.push(evicted);
                StoreOutcome::Evicted(evicted)
            }
            _ => StoreOutcome::Stored,
        }
    }

    /// Chunks whose mesh was evicted since the last call, oldest first.
    ///
    /// They are still tracked: unload them, or mark them dirty to mesh them again.
    pub fn take_evicted(&mut self) -> Vec<Point3<i32>> {
        std::mem::take(&mut self.evicted)
    }

    /// Handles a build that produced no mesh because the chunk was gone.
    pub fn discard(&mut self, position: Point3<i32>, generation: u64) {
        if generation != 0 && generation == self.generation(position) {
            self.meshes.pop(&position);
            self.generations.remove(&position);
        }
    }

    /// The mesh of a chunk, marking it as recently used.
    pub fn get_mesh(&mut self, position: Point3<i32>) -> Option<&MeshData> {
        self.meshes.get(&position)
    }

    /// The mesh of a chunk, without touching the usage order.
    pub fn peek_mesh(&self, position: Point3<i32>) -> Option<&MeshData> {
        self.meshes.peek(&position)
    }

    /// Checks if a chunk has a mesh, marking it as recently used if so.
    pub fn is_chunk_meshed(&mut self, position: Point3<i32>) -> bool {
        self.meshes.promote(&position);
        self.meshes.contains(&position)
    }

    /// Forgets a chunk: drops its mesh, dirty flag and generation.
    ///
    /// Builds still in flight for it are rejected when they land.
    pub fn unload(&mut self, position: Point3<i32>) -> Option<MeshData> {
        self.dirty.remove(&position);
        self.generations.remove(&position);
        self.evicted.retain(|&evicted| evicted != position);
        self.meshes.pop(&position)
    }

    /// Every retained mesh, most recently used first.
    pub fn meshes(&self) -> impl Iterator<Item = (&Point3<i32>, &MeshData)> {
        self.meshes.iter()
    }

    /// Number of retained meshes.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Whether no meshes are retained.
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Rebuilds every dirty chunk on the calling thread.
    ///
    /// # Returns
    /// The number of meshes stored
    pub fn rebuild_dirty(&mut self, world: &World) -> usize {
        let start = Instant::now();
        let mut stored = 0;

        for (position, generation) in self.take_dirty() {
            match world.get_chunk_at(position) {
                Some(chunk) => {
                    let outcome = self.store(position, generation, ChunkMesher::build(chunk, world));
                    if outcome.is_stored() {
                        stored += 1;
                    }
                }
                None => self.discard(position, generation),
            }
        }

        info!("Rebuilt {} chunk meshes in {:?}", stored, start.elapsed());
        stored
    }

    /// Publishes a background build for every dirty chunk.
    ///
    /// # Returns
    /// The number of tasks published
    pub fn schedule_dirty(&mut self, task_manager: &mut TaskManager, world: &MtResource<World>) -> usize {
        let dirty = self.take_dirty();
        let count = dirty.len();

        for (position, generation) in dirty {
            task_manager.publish_task(Box::new(ChunkMeshGenerationTask::new(
                world.clone(),
                position,
                generation,
            )));
        }

        debug!("Scheduled {} chunk mesh builds", count);
        count
    }
}
