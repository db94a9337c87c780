//! # Voxel Core
//!
//! This module contains the voxel data model: what a block is, how chunks store
//! blocks, and how the world resolves absolute coordinates across chunks.
//!
//! ## Architecture
//!
//! * **Block**: Block types, their static properties, and face directions
//! * **Chunk**: Fixed-size 3D arrays of blocks, the unit of loading and meshing
//! * **World**: Sparse map of loaded chunks with cross-chunk block lookup
//!
//! ## Data Flow
//!
//! 1. World generation fills chunks and inserts them into the world
//! 2. Gameplay edits go through `World::set_block_at`, which reports the chunks
//!    whose meshes went stale
//! 3. The mesher reads one chunk plus neighbor lookups through the world and
//!    never mutates either
//!
//! ## Thread Safety
//!
//! * Chunks and the world are plain data; shared read access is `Sync`
//! * Mutation requires `&mut`, so a reader holding `&World` always sees a
//!   consistent snapshot

pub mod block;
pub mod chunk;
pub mod world;
