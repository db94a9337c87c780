//! # Block Registry
//!
//! Static per-type property table. Every query is a single array index into
//! [`BLOCK_PROPERTIES`], so lookups are total, allocation-free and cheap enough
//! for the mesher's per-face loops.

use super::{
    block_type::{BlockType, BLOCK_TYPE_COUNT},
    shape_kind::ShapeKind,
};

/// Rendering and collision properties shared by every block of one type.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BlockProperties {
    /// Blocks movement (collision).
    pub solid: bool,
    /// Hides whatever is behind it (rendering occlusion).
    pub opaque: bool,
    /// Silhouette used for merging decisions.
    pub shape: ShapeKind,
    /// Display color, RGBA in `0.0..=1.0`.
    pub color: [f32; 4],
}

impl BlockProperties {
    const fn new(solid: bool, opaque: bool, shape: ShapeKind, color: [f32; 4]) -> Self {
        BlockProperties {
            solid,
            opaque,
            shape,
            color,
        }
    }
}

/// Properties indexed by `BlockType as usize`.
pub static BLOCK_PROPERTIES: [BlockProperties; BLOCK_TYPE_COUNT] = [
    // AIR
    BlockProperties::new(false, false, ShapeKind::Cube, [0.0, 0.0, 0.0, 0.0]),
    // DIRT
    BlockProperties::new(true, true, ShapeKind::Cube, [0.45, 0.31, 0.18, 1.0]),
    // GRASS
    BlockProperties::new(true, true, ShapeKind::Cube, [0.30, 0.62, 0.20, 1.0]),
    // STONE
    BlockProperties::new(true, true, ShapeKind::Cube, [0.50, 0.50, 0.52, 1.0]),
    // WOOD
    BlockProperties::new(true, true, ShapeKind::Cube, [0.55, 0.40, 0.22, 1.0]),
    // WHITE
    BlockProperties::new(true, true, ShapeKind::Cube, [1.0, 1.0, 1.0, 1.0]),
    // GLASS
    BlockProperties::new(true, false, ShapeKind::Cube, [0.80, 0.92, 0.95, 0.25]),
    // WATER
    BlockProperties::new(false, false, ShapeKind::Cube, [0.15, 0.35, 0.80, 0.55]),
    // ICE
    BlockProperties::new(true, false, ShapeKind::Cube, [0.65, 0.85, 1.0, 0.70]),
    // LEAVES
    BlockProperties::new(true, false, ShapeKind::Cube, [0.18, 0.50, 0.15, 0.85]),
    // FENCE_POST
    BlockProperties::new(true, false, ShapeKind::FencePost, [0.55, 0.40, 0.22, 1.0]),
    // DOOR_LOWER
    BlockProperties::new(true, false, ShapeKind::DoorLower, [0.48, 0.33, 0.20, 1.0]),
    // DOOR_UPPER
    BlockProperties::new(true, false, ShapeKind::DoorUpper, [0.48, 0.33, 0.20, 1.0]),
];

/// Static lookup of block properties.
pub struct BlockRegistry;

impl BlockRegistry {
    /// The full property record for a block type.
    #[inline]
    pub fn properties(block_type: BlockType) -> &'static BlockProperties {
        &BLOCK_PROPERTIES[block_type as usize]
    }

    /// Whether the block blocks movement.
    #[inline]
    pub fn is_solid(block_type: BlockType) -> bool {
        Self::properties(block_type).solid
    }

    /// Whether the block hides faces behind it.
    #[inline]
    pub fn is_opaque(block_type: BlockType) -> bool {
        Self::properties(block_type).opaque
    }

    /// The block's silhouette.
    #[inline]
    pub fn shape(block_type: BlockType) -> ShapeKind {
        Self::properties(block_type).shape
    }

    /// The block's display color.
    #[inline]
    pub fn color(block_type: BlockType) -> [f32; 4] {
        Self::properties(block_type).color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_is_empty_cube() {
        assert!(!BlockRegistry::is_solid(BlockType::AIR));
        assert!(!BlockRegistry::is_opaque(BlockType::AIR));
        assert_eq!(BlockRegistry::shape(BlockType::AIR), ShapeKind::Cube);
        assert_eq!(BlockType::default(), BlockType::AIR);
    }

    #[test]
    fn transparent_types_have_translucent_colors() {
        for block_type in BlockType::ALL.into_iter().skip(1) {
            let properties = BlockRegistry::properties(block_type);
            if properties.opaque {
                assert_eq!(properties.color[3], 1.0, "{block_type:?}");
            }
        }
        assert!(BlockRegistry::color(BlockType::GLASS)[3] < 1.0);
    }

    #[test]
    fn opaque_types_are_solid_cubes() {
        for block_type in BlockType::ALL {
            if BlockRegistry::is_opaque(block_type) {
                assert!(BlockRegistry::is_solid(block_type), "{block_type:?}");
                assert_eq!(BlockRegistry::shape(block_type), ShapeKind::Cube, "{block_type:?}");
            }
        }
    }

    #[test]
    fn shaped_blocks_are_not_cubes() {
        assert_eq!(BlockRegistry::shape(BlockType::FENCE_POST), ShapeKind::FencePost);
        assert_eq!(BlockRegistry::shape(BlockType::DOOR_LOWER), ShapeKind::DoorLower);
        assert_eq!(BlockRegistry::shape(BlockType::DOOR_UPPER), ShapeKind::DoorUpper);
    }
}
