//! Background tasks for mesh generation.
//!
//! # Available Tasks
//! - `ChunkMeshGenerationTask`: Builds the mesh of one chunk on a worker thread

pub mod chunk_mesh_generation_task;
