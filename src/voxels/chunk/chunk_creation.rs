//! # Chunk Creation Module
//!
//! This module provides a sequential builder for populating chunks. Generators
//! push one block type per cell in storage order (x fastest, then y, then z) and
//! the builder keeps the dense block array, the occupancy mask and the non-air
//! counter consistent with each other.

use bitvec::vec::BitVec;
use cgmath::Point3;

use crate::voxels::block::{block_type::BlockType, Block};

use super::{Chunk, CHUNK_SIZE};

/// A builder for creating and populating chunks cell by cell.
///
/// This struct maintains the relationship between:
/// 1. The dense `blocks` vector (one entry per cell)
/// 2. The `occupancy` bit vector tracking non-air cells
/// 3. The running count of non-air cells
pub struct ChunkCreationIterator {
    /// The chunk coordinate of the chunk being created
    position: Point3<i32>,
    /// One bit per cell, set for non-air cells
    occupancy: BitVec,
    /// Block data in storage order
    blocks: Vec<Block>,
    /// Number of non-air blocks pushed so far
    non_air_count: usize,
}

impl ChunkCreationIterator {
    /// Creates a new `ChunkCreationIterator` for building a chunk at the given position.
    pub fn new(position: Point3<i32>) -> Self {
        ChunkCreationIterator {
            position,
            occupancy: BitVec::with_capacity(CHUNK_SIZE),
            blocks: Vec::with_capacity(CHUNK_SIZE),
            non_air_count: 0,
        }
    }

    /// Number of cells pushed so far.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether no cells have been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Finalizes the chunk creation and returns the constructed `Chunk`.
    ///
    /// Cells that were never pushed are filled with air.
    pub fn return_chunk(mut self) -> Chunk {
        while self.blocks.len() < CHUNK_SIZE {
            self.push_block_type(BlockType::AIR);
        }

        Chunk {
            position: self.position,
            occupancy: self.occupancy,
            blocks: self.blocks,
            non_air_count: self.non_air_count,
        }
    }

    /// Adds a block to the chunk at the current position and advances the position.
    ///
    /// # Panics
    /// Panics if more than `CHUNK_SIZE` cells are pushed.
    pub fn push_block_type(&mut self, block_type: BlockType) {
        assert!(
            self.blocks.len() < CHUNK_SIZE,
            "chunk {:?} already holds {} cells",
            self.position,
            CHUNK_SIZE
        );

        let is_occupied = !block_type.is_air();
        self.occupancy.push(is_occupied);
        self.blocks.push(Block::new(block_type));

        if is_occupied {
            self.non_air_count += 1;
        }
    }
}
