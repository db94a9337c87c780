//! # Chunk Iteration Module
//!
//! Iterates the non-air cells of a chunk by walking the set bits of its
//! occupancy mask, so air cells are skipped without touching block storage.

use bitvec::slice::IterOnes;
use cgmath::Point3;

use crate::voxels::block::block_type::BlockType;

use super::Chunk;

/// An iterator over all non-air blocks in a chunk, in storage order.
///
/// Yields the chunk-local position of each block together with its type.
pub struct ChunkBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Set bits of the chunk's occupancy mask
    ones: IterOnes<'a, usize, bitvec::order::Lsb0>,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates a new `ChunkBlockIterator` for the given chunk.
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            ones: chunk_ref.occupancy.iter_ones(),
        }
    }
}

impl Iterator for ChunkBlockIterator<'_> {
    type Item = (Point3<usize>, BlockType);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.ones.next()?;
        let position = Chunk::position_of_index(index);
        Some((position, self.chunk_ref.blocks[index].get_type()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ones.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_only_non_air_blocks_in_storage_order() {
        let mut chunk = Chunk::new(Point3::new(0, 0, 0));
        chunk.set_block(3, 0, 0, BlockType::STONE);
        chunk.set_block(0, 2, 0, BlockType::GLASS);
        chunk.set_block(1, 1, 5, BlockType::FENCE_POST);

        let blocks: Vec<_> = ChunkBlockIterator::new(&chunk).collect();
        assert_eq!(
            blocks,
            vec![
                (Point3::new(3, 0, 0), BlockType::STONE),
                (Point3::new(0, 2, 0), BlockType::GLASS),
                (Point3::new(1, 1, 5), BlockType::FENCE_POST),
            ]
        );
    }
}
