//! # World Module
//!
//! This module provides the `World` struct which owns the collection of loaded
//! chunks and answers block queries in absolute (world) coordinates.
//!
//! ## Architecture
//!
//! The world uses a sparse storage approach: only loaded chunks are kept, keyed
//! by chunk coordinate. Chunks never point back at the world or at each other;
//! anything that needs to look across a chunk boundary goes through
//! [`World::block_at`], which is the single source of truth for "what occupies
//! this voxel". Coordinates inside unloaded chunks read as air.
//!
//! ## Chunk Generation
//!
//! Multiple terrain generation strategies are supported:
//! - Perlin noise for natural-looking terrain
//! - Checkerboard pattern for testing
//! - Solid chunks (all blocks filled)
//! - Random sparse chunks
//! - Empty chunks (all blocks air)

use cgmath::Point3;
use serde::Deserialize;
use std::collections::HashMap;

use crate::voxels::block::{
    block_side::{BlockSide, Sign},
    block_type::BlockType,
};
use crate::voxels::chunk::{Chunk, CHUNK_DIMENSION};

/// Read-only access to voxels by absolute coordinate.
///
/// This is the neighbor-query capability the mesher is given. Implementations
/// must be total: every coordinate answers with some block type, never a panic.
pub trait VoxelQuery {
    /// The block occupying the given world coordinate.
    fn block_at(&self, x: i64, y: i64, z: i64) -> BlockType;
}

/// The method used to generate new chunks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkGenerationMethod {
    /// Perlin noise terrain
    #[default]
    Perlin,
    /// Alternating filled and air cells
    Checkerboard,
    /// Every cell filled
    Solid,
    /// Sparse random cubes
    Random,
    /// Every cell air
    Empty,
}

/// Parameters for [`World::add_chunk_at`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChunkGenerator {
    /// Which generator to run
    pub method: ChunkGenerationMethod,
    /// Seed for the noise and random generators
    pub seed: u32,
    /// Block used by the solid and checkerboard generators
    pub fill_block: BlockType,
}

/// Probability of a cell being air in randomly generated chunks.
const RANDOM_CHUNK_SPARSENESS: f64 = 0.9;

impl ChunkGenerator {
    /// Runs the generator for one chunk position.
    pub fn generate(&self, position: Point3<i32>) -> Chunk {
        match self.method {
            ChunkGenerationMethod::Perlin => Chunk::perlin(&position, self.seed),
            ChunkGenerationMethod::Checkerboard => Chunk::checkerboard(&position, self.fill_block),
            ChunkGenerationMethod::Solid => Chunk::filled(&position, self.fill_block),
            ChunkGenerationMethod::Random => {
                Chunk::random(&position, RANDOM_CHUNK_SPARSENESS, self.position_seed(position))
            }
            ChunkGenerationMethod::Empty => Chunk::empty(&position),
        }
    }

    /// Mixes the world seed with the chunk position so neighbors differ.
    fn position_seed(&self, position: Point3<i32>) -> u64 {
        let mut seed = self.seed as u64;
        for component in [position.x, position.y, position.z] {
            seed = seed
                .wrapping_mul(0x9E37_79B9_7F4A_7C15)
                .wrapping_add(component as u32 as u64);
        }
        seed
    }
}

/// Splits a world coordinate into its chunk coordinate and chunk-local offset.
///
/// Returns `None` when the chunk coordinate does not fit in an `i32`.
pub fn world_to_chunk(x: i64, y: i64, z: i64) -> Option<(Point3<i32>, Point3<usize>)> {
    let dimension = CHUNK_DIMENSION as i64;
    let chunk = Point3::new(
        i32::try_from(x.div_euclid(dimension)).ok()?,
        i32::try_from(y.div_euclid(dimension)).ok()?,
        i32::try_from(z.div_euclid(dimension)).ok()?,
    );
    let local = Point3::new(
        x.rem_euclid(dimension) as usize,
        y.rem_euclid(dimension) as usize,
        z.rem_euclid(dimension) as usize,
    );
    Some((chunk, local))
}

/// Represents a voxel world composed of multiple chunks.
///
/// The world is stored as a sparse 3D grid of chunks, where each chunk is a 16x16x16
/// collection of blocks.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_mesher::{BlockType, Chunk, World};
///
/// let mut world = World::new();
/// let mut chunk = Chunk::new(Point3::new(0, 0, 0));
/// chunk.set_block(1, 2, 3, BlockType::STONE);
/// world.insert_chunk(chunk);
///
/// assert_eq!(world.block_at(1, 2, 3), BlockType::STONE);
/// // Unloaded space reads as air.
/// assert_eq!(world.block_at(-1, 2, 3), BlockType::AIR);
/// ```
#[derive(Default, Debug, Clone)]
pub struct World {
    /// A mapping from chunk coordinates to chunk data.
    chunks: HashMap<Point3<i32>, Chunk>,
}

impl World {
    /// Creates a new, empty world.
    pub fn new() -> Self {
        World {
            chunks: HashMap::new(),
        }
    }

    /// Inserts a chunk at its own position, returning any chunk it replaced.
    pub fn insert_chunk(&mut self, chunk: Chunk) -> Option<Chunk> {
        self.chunks.insert(chunk.position, chunk)
    }

    /// Adds a new chunk at the specified chunk coordinates if one doesn't already exist.
    ///
    /// Returns `true` if a chunk was generated.
    ///
    /// # Performance
    ///
    /// Chunk generation can be computationally expensive, especially with Perlin noise.
    pub fn add_chunk_at(&mut self, position: Point3<i32>, generator: &ChunkGenerator) -> bool {
        if self.chunks.contains_key(&position) {
            return false;
        }

        self.chunks.insert(position, generator.generate(position));
        true
    }

    /// Retrieves a reference to the chunk at the specified chunk coordinates.
    pub fn get_chunk_at(&self, pos: Point3<i32>) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    /// Retrieves a mutable reference to the chunk at the specified chunk coordinates.
    ///
    /// Edits made through this reference do not report which meshes went stale;
    /// prefer [`World::set_block_at`] for single-block edits.
    pub fn get_chunk_mut(&mut self, pos: Point3<i32>) -> Option<&mut Chunk> {
        self.chunks.get_mut(&pos)
    }

    /// Unloads a chunk.
    pub fn remove_chunk(&mut self, pos: Point3<i32>) -> Option<Chunk> {
        self.chunks.remove(&pos)
    }

    /// Positions of every loaded chunk, sorted.
    pub fn chunk_positions(&self) -> Vec<Point3<i32>> {
        let mut positions: Vec<_> = self.chunks.keys().copied().collect();
        positions.sort_by_key(|p| (p.x, p.y, p.z));
        positions
    }

    /// Number of loaded chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunks are loaded.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The block at the given world coordinate.
    ///
    /// Coordinates in unloaded chunks (or beyond the addressable chunk range)
    /// are air. Never panics.
    pub fn block_at(&self, x: i64, y: i64, z: i64) -> BlockType {
        match world_to_chunk(x, y, z) {
            Some((chunk_position, local)) => match self.chunks.get(&chunk_position) {
                Some(chunk) => chunk.get_block(local.x, local.y, local.z),
                None => BlockType::AIR,
            },
            None => BlockType::AIR,
        }
    }

    /// Sets the block at a world coordinate.
    ///
    /// Returns every loaded chunk whose mesh may have changed: the edited chunk
    /// and, when the edit touches a chunk face, the loaded neighbor across that
    /// face. Editing inside an unloaded chunk does nothing and returns an empty list.
    pub fn set_block_at(&mut self, x: i64, y: i64, z: i64, block_type: BlockType) -> Vec<Point3<i32>> {
        let Some((chunk_position, local)) = world_to_chunk(x, y, z) else {
            return Vec::new();
        };
        let Some(chunk) = self.chunks.get_mut(&chunk_position) else {
            return Vec::new();
        };

        chunk.set_block(local.x, local.y, local.z, block_type);

        let mut affected = vec![chunk_position];
        let local = [local.x, local.y, local.z];
        for side in BlockSide::all() {
            let axis = side.axis().index();
            let on_boundary = match side.sign() {
                Sign::Positive => local[axis] == CHUNK_DIMENSION - 1,
                Sign::Negative => local[axis] == 0,
            };
            if !on_boundary {
                continue;
            }
            let Some(neighbor) = offset_chunk(chunk_position, side) else {
                continue;
            };
            if self.chunks.contains_key(&neighbor) {
                affected.push(neighbor);
            }
        }

        affected
    }

    /// The loaded face-neighbors of a chunk, in [`BlockSide::all`] order.
    pub fn loaded_neighbors(&self, position: Point3<i32>) -> Vec<Point3<i32>> {
        BlockSide::all()
            .into_iter()
            .filter_map(|side| offset_chunk(position, side))
            .filter(|neighbor| self.chunks.contains_key(neighbor))
            .collect()
    }
}

/// The chunk coordinate one step across `side`, if representable.
fn offset_chunk(position: Point3<i32>, side: BlockSide) -> Option<Point3<i32>> {
    let normal = side.normal();
    Some(Point3::new(
        position.x.checked_add(normal.x)?,
        position.y.checked_add(normal.y)?,
        position.z.checked_add(normal.z)?,
    ))
}

impl VoxelQuery for World {
    fn block_at(&self, x: i64, y: i64, z: i64) -> BlockType {
        World::block_at(self, x, y, z)
    }
}
