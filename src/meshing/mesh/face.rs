use cgmath::{Point3, Vector3};

use crate::voxels::block::{
    block_side::{Axis, BlockSide, Sign},
    block_type::BlockType,
};

/// Represents a single axis-aligned quad in a chunk mesh.
///
/// A face is a `width × height` rectangle of block faces lying on one plane of
/// the chunk grid. `origin` is its minimum corner in chunk-local block units,
/// already on the face plane: for a positive-facing quad covering blocks at
/// depth `d` the plane sits at `d + 1`, for a negative-facing one at `d`.
///
/// `width` runs along the first tangent axis of `axis` and `height` along the
/// second (see [`Axis::tangents`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face {
    /// Minimum corner of the quad in chunk coordinates
    pub origin: Point3<i32>,
    /// Extent along the first tangent axis, in blocks
    pub width: u32,
    /// Extent along the second tangent axis, in blocks
    pub height: u32,
    /// Axis the face normal lies on
    pub axis: Axis,
    /// Direction the face points along `axis`
    pub sign: Sign,
    /// Block type this face draws
    pub block_type: BlockType,
}

impl Face {
    /// Creates a face for the given side.
    ///
    /// # Panics
    /// Panics in debug builds if `width` or `height` is zero.
    pub fn new(
        origin: Point3<i32>,
        width: u32,
        height: u32,
        side: BlockSide,
        block_type: BlockType,
    ) -> Self {
        debug_assert!(width > 0 && height > 0, "zero-area face");
        Face {
            origin,
            width,
            height,
            axis: side.axis(),
            sign: side.sign(),
            block_type,
        }
    }

    /// The block side this face represents.
    pub fn side(&self) -> BlockSide {
        BlockSide::from_axis_sign(self.axis, self.sign)
    }

    /// Number of unit block faces covered.
    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    /// Unit vectors along the width and height directions.
    fn tangent_vectors(&self) -> (Vector3<i32>, Vector3<i32>) {
        let (u_axis, v_axis) = self.axis.tangents();
        let unit = |axis: Axis| {
            let mut v = Vector3::new(0, 0, 0);
            v[axis.index()] = 1;
            v
        };
        (unit(u_axis), unit(v_axis))
    }

    /// The four corners in chunk coordinates, ordered
    /// (lower-left, lower-right, upper-left, upper-right).
    ///
    /// "Right" is `origin + width` along the first tangent, "upper" is
    /// `origin + height` along the second.
    pub fn corners(&self) -> [Point3<i32>; 4] {
        let (u, v) = self.tangent_vectors();
        let du = u * self.width as i32;
        let dv = v * self.height as i32;
        [
            self.origin,
            self.origin + du,
            self.origin + dv,
            self.origin + du + dv,
        ]
    }

    /// Center of the quad in chunk coordinates.
    pub fn center(&self) -> Point3<f32> {
        let (u, v) = self.tangent_vectors();
        let half_w = self.width as f32 / 2.0;
        let half_h = self.height as f32 / 2.0;
        Point3::new(
            self.origin.x as f32 + u.x as f32 * half_w + v.x as f32 * half_h,
            self.origin.y as f32 + u.y as f32 * half_w + v.y as f32 * half_h,
            self.origin.z as f32 + u.z as f32 * half_w + v.z as f32 * half_h,
        )
    }

    /// Whether lower-left → lower-right → upper-right is counter-clockwise when
    /// seen from outside the block.
    ///
    /// Holds when the tangent basis (u, v) crosses to the outward normal:
    /// +X, -Y and +Z faces.
    pub fn winds_outward(&self) -> bool {
        matches!(
            (self.axis, self.sign),
            (Axis::X, Sign::Positive) | (Axis::Y, Sign::Negative) | (Axis::Z, Sign::Positive)
        )
    }
}
