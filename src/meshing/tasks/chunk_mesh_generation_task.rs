//! Task for generating mesh data for chunks in a background thread.
//!
//! The task read-locks the shared world for the duration of one build, so
//! neighbor lookups see a consistent snapshot. The finished mesh travels back
//! tagged with the generation it was scheduled at and is applied through
//! [`MeshManager::store`], which drops it if the chunk changed in the meantime.

use cgmath::Point3;
use log::warn;

use crate::{
    core::MtResource,
    meshing::{ChunkMesher, MeshData, MeshManager},
    task_management::task::{Task, TaskResult},
    voxels::world::World,
};

/// A task that builds the mesh of one chunk in a background thread.
pub struct ChunkMeshGenerationTask {
    /// Shared handle to the world the chunk lives in
    world: MtResource<World>,
    /// Chunk coordinate to mesh
    position: Point3<i32>,
    /// Generation the build was scheduled at
    generation: u64,
}

impl ChunkMeshGenerationTask {
    /// Creates a new chunk mesh generation task.
    ///
    /// # Arguments
    /// * `world` - Shared handle to the world
    /// * `position` - Chunk coordinate to mesh
    /// * `generation` - Generation from [`MeshManager::take_dirty`]
    pub fn new(world: MtResource<World>, position: Point3<i32>, generation: u64) -> Self {
        ChunkMeshGenerationTask {
            world,
            position,
            generation,
        }
    }
}

impl Task for ChunkMeshGenerationTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let world = self.world.get();
        let mesh = world
            .get_chunk_at(self.position)
            .map(|chunk| ChunkMesher::build(chunk, &world));

        Box::new(ChunkMeshGenerationTaskResult {
            position: self.position,
            generation: self.generation,
            mesh,
        })
    }
}

/// The result of a chunk mesh generation task.
pub struct ChunkMeshGenerationTaskResult {
    position: Point3<i32>,
    generation: u64,
    /// `None` when the chunk was no longer loaded
    mesh: Option<MeshData>,
}

impl TaskResult for ChunkMeshGenerationTaskResult {
    fn handle_result(self: Box<Self>, mesh_manager: &mut MeshManager) -> Vec<Box<dyn Task + Send>> {
        match self.mesh {
            Some(mesh) => {
                mesh_manager.store(self.position, self.generation, mesh);
            }
            None => {
                warn!("Chunk {:?} was unloaded before it could be meshed", self.position);
                mesh_manager.discard(self.position, self.generation);
            }
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::{block::block_type::BlockType, chunk::Chunk};

    #[test]
    fn superseded_result_is_not_stored() {
        let mut world = World::new();
        world.insert_chunk(Chunk::filled(&Point3::new(0, 0, 0), BlockType::GLASS));
        let world = MtResource::new(world);
        let mut mesh_manager = MeshManager::new(4).unwrap();

        let position = Point3::new(0, 0, 0);
        let generation = mesh_manager.mark_dirty(position);
        let result = ChunkMeshGenerationTask::new(world.clone(), position, generation).process();

        // An edit lands while the build was in flight.
        mesh_manager.mark_dirty(position);
        assert!(result.handle_result(&mut mesh_manager).is_empty());
        assert!(mesh_manager.peek_mesh(position).is_none());

        let generation = mesh_manager.generation(position);
        let result = ChunkMeshGenerationTask::new(world, position, generation).process();
        result.handle_result(&mut mesh_manager);
        let mesh = mesh_manager.peek_mesh(position).unwrap();
        assert_eq!(mesh.transparent_faces().len(), 6);
    }

    #[test]
    fn missing_chunk_yields_no_mesh() {
        let world = MtResource::new(World::new());
        let mut mesh_manager = MeshManager::new(4).unwrap();
        let position = Point3::new(9, 9, 9);
        let generation = mesh_manager.mark_dirty(position);

        let result = ChunkMeshGenerationTask::new(world, position, generation).process();
        result.handle_result(&mut mesh_manager);
        assert!(!mesh_manager.is_chunk_meshed(position));
    }
}
