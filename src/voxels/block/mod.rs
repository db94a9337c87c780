//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, the static property registry, block face
//! handling, and the compact storage cell chunks are built from.

use block_type::BlockType;

pub mod block_side;
pub mod block_type;
pub mod registry;
pub mod shape_kind;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Represents a single voxel block in chunk storage.
///
/// This is a lightweight structure that stores only the block's type id.
/// The actual block properties are looked up from the block type.
///
/// # Memory Layout
/// `#[repr(C)]` plus `Pod`/`Zeroable` means a zeroed buffer is a valid chunk
/// full of `AIR` (id 0).
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq, Eq, Default)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    pub block_type: BlockTypeSize,
}

impl Block {
    /// Creates a new block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
        }
    }

    /// Decodes the stored id.
    #[inline]
    pub fn get_type(&self) -> BlockType {
        BlockType::from_int(self.block_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_block_is_air() {
        let block: Block = bytemuck::Zeroable::zeroed();
        assert_eq!(block.get_type(), BlockType::AIR);
        assert_eq!(Block::new(BlockType::GLASS).get_type(), BlockType::GLASS);
    }
}
