//! # Block Type Module
//!
//! This module defines the closed set of block types in the voxel world.
//! It provides functionality for block type identification, conversion from
//! storage ids and names, and random generation.

use num_derive::FromPrimitive;
use phf::phf_map;

use super::{registry::BlockRegistry, shape_kind::ShapeKind, BlockTypeSize};

/// Enumerates all possible block types in the voxel world.
///
/// Each variant represents a distinct type of block. Its properties live in the
/// static table behind [`BlockRegistry`]; the enum itself carries no behavior.
/// The `FromPrimitive` derive allows conversion from storage integers.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Non-solid, transparent, never emits geometry.
    #[default]
    AIR,

    /// A basic dirt block.
    DIRT,

    /// A grass block.
    GRASS,

    /// Plain stone.
    STONE,

    /// A wooden block with a bark texture on all sides.
    WOOD,

    /// A plain white block, often used for testing.
    WHITE,

    /// Clear glass. Solid but see-through.
    GLASS,

    /// Still water. Neither solid nor opaque.
    WATER,

    /// Translucent ice.
    ICE,

    /// Foliage, drawn alpha-blended.
    LEAVES,

    /// A thin vertical fence post.
    FENCE_POST,

    /// The bottom half of a door panel.
    DOOR_LOWER,

    /// The top half of a door panel.
    DOOR_UPPER,
}

/// Number of variants in [`BlockType`].
pub const BLOCK_TYPE_COUNT: usize = 13;

/// Lookup from lowercase block names to types, used by configuration.
static BLOCK_NAMES: phf::Map<&'static str, BlockType> = phf_map! {
    "air" => BlockType::AIR,
    "dirt" => BlockType::DIRT,
    "grass" => BlockType::GRASS,
    "stone" => BlockType::STONE,
    "wood" => BlockType::WOOD,
    "white" => BlockType::WHITE,
    "glass" => BlockType::GLASS,
    "water" => BlockType::WATER,
    "ice" => BlockType::ICE,
    "leaves" => BlockType::LEAVES,
    "fence_post" => BlockType::FENCE_POST,
    "door_lower" => BlockType::DOOR_LOWER,
    "door_upper" => BlockType::DOOR_UPPER,
};

/// Cube types handed out by [`BlockType::get_random_type`].
const RANDOM_CUBE_TYPES: [BlockType; 5] = [
    BlockType::DIRT,
    BlockType::GRASS,
    BlockType::STONE,
    BlockType::WOOD,
    BlockType::WHITE,
];

impl BlockType {
    /// Every block type, in id order.
    pub const ALL: [BlockType; BLOCK_TYPE_COUNT] = [
        BlockType::AIR,
        BlockType::DIRT,
        BlockType::GRASS,
        BlockType::STONE,
        BlockType::WOOD,
        BlockType::WHITE,
        BlockType::GLASS,
        BlockType::WATER,
        BlockType::ICE,
        BlockType::LEAVES,
        BlockType::FENCE_POST,
        BlockType::DOOR_LOWER,
        BlockType::DOOR_UPPER,
    ];

    /// Converts a `BlockTypeSize` storage id to a `BlockType`.
    ///
    /// Ids that don't correspond to a variant decode as `AIR`.
    pub fn from_int(btype: BlockTypeSize) -> Self {
        num::FromPrimitive::from_u8(btype).unwrap_or(BlockType::AIR)
    }

    /// Looks up a block type by its lowercase name (e.g. `"fence_post"`).
    pub fn from_name(name: &str) -> Option<Self> {
        BLOCK_NAMES.get(name).copied()
    }

    /// Generates a random full-cube opaque block type (never `AIR`).
    pub fn get_random_type() -> Self {
        RANDOM_CUBE_TYPES[fastrand::usize(..RANDOM_CUBE_TYPES.len())]
    }

    /// Same as [`BlockType::get_random_type`] but drawing from a caller-owned generator.
    pub fn get_random_type_with(rng: &mut fastrand::Rng) -> Self {
        RANDOM_CUBE_TYPES[rng.usize(..RANDOM_CUBE_TYPES.len())]
    }

    /// Whether this is the empty block.
    #[inline]
    pub fn is_air(self) -> bool {
        self == BlockType::AIR
    }

    /// See [`BlockRegistry::is_solid`].
    #[inline]
    pub fn is_solid(self) -> bool {
        BlockRegistry::is_solid(self)
    }

    /// See [`BlockRegistry::is_opaque`].
    #[inline]
    pub fn is_opaque(self) -> bool {
        BlockRegistry::is_opaque(self)
    }

    /// See [`BlockRegistry::shape`].
    #[inline]
    pub fn shape(self) -> ShapeKind {
        BlockRegistry::shape(self)
    }
}
