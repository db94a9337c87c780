//! Mesh generation for voxel rendering.
//!
//! This module converts chunk data into face lists. Greedy meshing combines
//! coplanar faces of the same block type, so the face count tracks the surface
//! complexity of a chunk rather than its block count.
//!
//! # Architecture
//! - [`ChunkMesher`]: The greedy meshing pass over one chunk
//! - [`Face`]: One merged axis-aligned rectangle
//! - [`MeshData`]: A chunk's faces, split into opaque and transparent batches
//! - [`Vertex`]: Expanded per-corner data for renderers that want triangles
//!
//! # Usage
//! ```
//! use cgmath::Point3;
//! use voxel_mesher::{BlockType, Chunk, ChunkMesher, World};
//!
//! let mut chunk = Chunk::new(Point3::new(0, 0, 0));
//! chunk.set_block(1, 1, 1, BlockType::STONE);
//!
//! let mesh = ChunkMesher::build(&chunk, &World::new());
//! assert_eq!(mesh.opaque_faces().len(), 6);
//! ```

mod face;
mod greedy;
mod mesh;
mod vertex;

pub use face::Face;
pub use greedy::{is_face_visible, occludes, ChunkMesher};
pub use mesh::MeshData;
pub use vertex::Vertex;
