//! # Chunk Module
//!
//! This module provides the `Chunk` struct and related functionality for managing
//! 16x16x16 blocks of voxel data, including the chunk generation algorithms.
//!
//! ## Storage
//!
//! Chunks keep two views of their contents:
//! - `blocks`: a dense array with one `Block` per cell (zeroed = air)
//! - `occupancy`: a bit vector (1 bit per cell) marking the non-air cells
//!
//! The dense array gives O(1) `get_block`/`set_block`; the bit vector lets
//! iteration and emptiness checks skip air without decoding block ids.
//! Cells are laid out x fastest, then y, then z.
//!
//! A chunk is passive data: it holds no reference to the world or its
//! neighbors, and editing it never touches any mesh built from it.

use bitvec::prelude::BitVec;
use cgmath::Point3;
use chunk_creation::ChunkCreationIterator;
use chunk_iteration::ChunkBlockIterator;
use noise::NoiseFn;
use noise::Perlin;

use super::block::block_type::BlockType;
use super::block::Block;

pub mod chunk_creation;
pub mod chunk_iteration;

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: usize = 16;
/// The number of blocks in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: usize = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: usize = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;

/// Threshold above which Perlin noise is considered solid for terrain generation.
pub const PERLIN_POSITIVE_THRESHOLD: f64 = 0.2;
/// Threshold below which Perlin noise is considered solid for terrain generation.
pub const PERLIN_NEGATIVE_THRESHOLD: f64 = -0.2;
/// Scaling factor applied to world coordinates when sampling Perlin noise.
pub const PERLIN_SCALE_FACTOR: f64 = 0.02;
/// World height at and below which empty Perlin cells are flooded with water.
pub const PERLIN_WATER_LEVEL: i64 = -8;

/// Represents a 16x16x16 collection of voxel blocks in the world.
#[derive(Clone, Debug)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: Point3<i32>,

    /// One bit per cell, set where the cell is not air.
    occupancy: BitVec,

    /// Dense block storage, one entry per cell.
    blocks: Vec<Block>,

    /// Number of set bits in `occupancy`.
    non_air_count: usize,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are air).
    pub fn new(position: Point3<i32>) -> Self {
        Chunk {
            position,
            occupancy: BitVec::repeat(false, CHUNK_SIZE),
            blocks: vec![bytemuck::Zeroable::zeroed(); CHUNK_SIZE],
            non_air_count: 0,
        }
    }

    /// Alias of [`Chunk::new`] matching the other generators.
    pub fn empty(position: &Point3<i32>) -> Self {
        Self::new(*position)
    }

    /// Creates a chunk with every cell set to `block_type`.
    pub fn filled(position: &Point3<i32>, block_type: BlockType) -> Self {
        let mut cci = ChunkCreationIterator::new(*position);

        for _ in 0..CHUNK_SIZE {
            cci.push_block_type(block_type);
        }

        cci.return_chunk()
    }

    /// Creates a chunk with a 3D checkerboard pattern.
    ///
    /// Cells whose coordinate sum is even hold `block_type`, the rest are air,
    /// so no two blocks share a face.
    pub fn checkerboard(position: &Point3<i32>, block_type: BlockType) -> Self {
        let mut cci = ChunkCreationIterator::new(*position);

        for k in 0..CHUNK_DIMENSION {
            for j in 0..CHUNK_DIMENSION {
                for i in 0..CHUNK_DIMENSION {
                    if (i + j + k) % 2 == 0 {
                        cci.push_block_type(block_type);
                    } else {
                        cci.push_block_type(BlockType::AIR);
                    }
                }
            }
        }

        cci.return_chunk()
    }

    /// Creates a new chunk with random cube blocks.
    ///
    /// `sparseness` is the probability of a cell being air. The same seed always
    /// produces the same chunk.
    pub fn random(position: &Point3<i32>, sparseness: f64, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut cci = ChunkCreationIterator::new(*position);

        for _ in 0..CHUNK_SIZE {
            if rng.f64() < sparseness {
                cci.push_block_type(BlockType::AIR);
            } else {
                cci.push_block_type(BlockType::get_random_type_with(&mut rng));
            }
        }

        cci.return_chunk()
    }

    /// Generates a chunk using Perlin noise for natural-looking terrain.
    ///
    /// The terrain is generated by sampling 3D Perlin noise and applying thresholds
    /// to determine which blocks are solid. The result resembles natural terrain
    /// with caves and overhangs. Low empty cells are filled with water so the
    /// terrain exercises the transparent path as well.
    pub fn perlin(position: &Point3<i32>, seed: u32) -> Self {
        let perlin = Perlin::new(seed);
        let mut cci = ChunkCreationIterator::new(*position);
        let origin = Self::origin_of(*position);
        let dimension = CHUNK_DIMENSION as i64;

        for k in 0..dimension {
            for j in 0..dimension {
                for i in 0..dimension {
                    let bposition = Point3::new(origin.x + i, origin.y + j, origin.z + k);
                    let perlin_sample =
                        perlin.get(Self::to_perlin_pos(bposition, PERLIN_SCALE_FACTOR));
                    let block_type = if perlin_sample > PERLIN_POSITIVE_THRESHOLD {
                        BlockType::STONE
                    } else if perlin_sample < PERLIN_NEGATIVE_THRESHOLD {
                        BlockType::DIRT
                    } else if bposition.y <= PERLIN_WATER_LEVEL {
                        BlockType::WATER
                    } else {
                        BlockType::AIR
                    };
                    cci.push_block_type(block_type);
                }
            }
        }

        cci.return_chunk()
    }

    /// Converts world-space block coordinates to Perlin noise sample coordinates.
    fn to_perlin_pos(pos: Point3<i64>, scale_factor: f64) -> [f64; 3] {
        [
            (pos.x as f64 * scale_factor),
            (pos.y as f64 * scale_factor),
            (pos.z as f64 * scale_factor),
        ]
    }

    /// Flat storage index of a chunk-local coordinate.
    ///
    /// # Panics
    /// Panics if any coordinate is `>= CHUNK_DIMENSION`. Callers with world
    /// coordinates must normalize through `World` first.
    #[inline]
    fn index_of(cx: usize, cy: usize, cz: usize) -> usize {
        assert!(
            cx < CHUNK_DIMENSION && cy < CHUNK_DIMENSION && cz < CHUNK_DIMENSION,
            "local block coordinate ({cx}, {cy}, {cz}) is outside the chunk"
        );
        cx + CHUNK_DIMENSION * cy + CHUNK_PLANE_SIZE * cz
    }

    /// Inverse of the flat storage index.
    #[inline]
    fn position_of_index(index: usize) -> Point3<usize> {
        Point3::new(
            index % CHUNK_DIMENSION,
            (index / CHUNK_DIMENSION) % CHUNK_DIMENSION,
            index / CHUNK_PLANE_SIZE,
        )
    }

    /// Gets the block type at the specified chunk-relative coordinates.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn get_block(&self, cx: usize, cy: usize, cz: usize) -> BlockType {
        self.blocks[Self::index_of(cx, cy, cz)].get_type()
    }

    /// Replaces the block at the specified chunk-relative coordinates.
    ///
    /// Only the cell changes; any mesh built from this chunk is now stale and
    /// it is up to the caller to rebuild it.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn set_block(&mut self, cx: usize, cy: usize, cz: usize, block_type: BlockType) {
        let index = Self::index_of(cx, cy, cz);
        let was_occupied = self.occupancy[index];
        let is_occupied = !block_type.is_air();

        self.blocks[index] = Block::new(block_type);
        self.occupancy.set(index, is_occupied);

        match (was_occupied, is_occupied) {
            (false, true) => self.non_air_count += 1,
            (true, false) => self.non_air_count -= 1,
            _ => {}
        }
    }

    /// Checks if the block at the specified chunk-relative coordinates is not air.
    #[inline]
    pub fn is_block_occupied(&self, cx: usize, cy: usize, cz: usize) -> bool {
        self.occupancy[Self::index_of(cx, cy, cz)]
    }

    /// Whether every cell is air.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.non_air_count == 0
    }

    /// Number of non-air cells.
    #[inline]
    pub fn non_air_count(&self) -> usize {
        self.non_air_count
    }

    /// Iterates the non-air blocks with their chunk-local positions.
    pub fn iter_blocks(&self) -> ChunkBlockIterator<'_> {
        ChunkBlockIterator::new(self)
    }

    /// World-space coordinate of this chunk's (0, 0, 0) cell.
    pub fn world_origin(&self) -> Point3<i64> {
        Self::origin_of(self.position)
    }

    /// World-space block coordinate of the minimum corner of the chunk at `position`.
    pub fn origin_of(position: Point3<i32>) -> Point3<i64> {
        let dimension = CHUNK_DIMENSION as i64;
        Point3::new(
            position.x as i64 * dimension,
            position.y as i64 * dimension,
            position.z as i64 * dimension,
        )
    }
}
