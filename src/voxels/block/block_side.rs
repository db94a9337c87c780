//! # Block Side Module
//!
//! This module defines the six faces of a voxel block together with the
//! axis/sign decomposition the mesher sweeps over.

use cgmath::Vector3;

/// One of the three world axes.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum Axis {
    /// The X axis
    X = 0,
    /// The Y axis (up)
    Y = 1,
    /// The Z axis
    Z = 2,
}

impl Axis {
    /// Returns all three axes in X, Y, Z order.
    pub fn all() -> [Axis; 3] {
        [Axis::X, Axis::Y, Axis::Z]
    }

    /// Index of this axis into an `[x, y, z]` triple.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The two axes spanning a face perpendicular to this axis.
    ///
    /// The first is the axis a face's `width` runs along, the second the axis its
    /// `height` runs along: X → (Y, Z), Y → (X, Z), Z → (X, Y).
    #[inline]
    pub fn tangents(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }

    /// Builds an `[x, y, z]` triple from a depth along this axis and the two
    /// tangent coordinates.
    #[inline]
    pub fn compose<T: Copy + Default>(self, depth: T, u: T, v: T) -> [T; 3] {
        let (u_axis, v_axis) = self.tangents();
        let mut out = [T::default(); 3];
        out[self.index()] = depth;
        out[u_axis.index()] = u;
        out[v_axis.index()] = v;
        out
    }
}

/// Direction along an axis.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum Sign {
    /// Towards increasing coordinates
    Positive,
    /// Towards decreasing coordinates
    Negative,
}

impl Sign {
    /// Unit step along the axis in this direction.
    #[inline]
    pub fn offset(self) -> i32 {
        match self {
            Sign::Positive => 1,
            Sign::Negative => -1,
        }
    }
}

/// Represents the six possible faces of a voxel block.
///
/// Each variant is assigned a unique integer value so per-side data can live
/// in plain arrays indexed by `side as usize`.
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// The axis this side's normal lies on.
    #[inline]
    pub fn axis(self) -> Axis {
        match self {
            BlockSide::FRONT | BlockSide::BACK => Axis::Z,
            BlockSide::BOTTOM | BlockSide::TOP => Axis::Y,
            BlockSide::LEFT | BlockSide::RIGHT => Axis::X,
        }
    }

    /// Whether this side faces towards increasing or decreasing coordinates.
    #[inline]
    pub fn sign(self) -> Sign {
        match self {
            BlockSide::FRONT | BlockSide::TOP | BlockSide::RIGHT => Sign::Positive,
            BlockSide::BACK | BlockSide::BOTTOM | BlockSide::LEFT => Sign::Negative,
        }
    }

    /// Inverse of [`BlockSide::axis`] and [`BlockSide::sign`].
    pub fn from_axis_sign(axis: Axis, sign: Sign) -> Self {
        match (axis, sign) {
            (Axis::X, Sign::Positive) => BlockSide::RIGHT,
            (Axis::X, Sign::Negative) => BlockSide::LEFT,
            (Axis::Y, Sign::Positive) => BlockSide::TOP,
            (Axis::Y, Sign::Negative) => BlockSide::BOTTOM,
            (Axis::Z, Sign::Positive) => BlockSide::FRONT,
            (Axis::Z, Sign::Negative) => BlockSide::BACK,
        }
    }

    /// The side facing the opposite way.
    pub fn opposite(self) -> Self {
        match self {
            BlockSide::FRONT => BlockSide::BACK,
            BlockSide::BACK => BlockSide::FRONT,
            BlockSide::BOTTOM => BlockSide::TOP,
            BlockSide::TOP => BlockSide::BOTTOM,
            BlockSide::LEFT => BlockSide::RIGHT,
            BlockSide::RIGHT => BlockSide::LEFT,
        }
    }

    /// Outward unit normal of this side.
    pub fn normal(self) -> Vector3<i32> {
        let mut n = [0; 3];
        n[self.axis().index()] = self.sign().offset();
        Vector3::new(n[0], n[1], n[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_sign_round_trips_for_every_side() {
        for side in BlockSide::all() {
            assert_eq!(BlockSide::from_axis_sign(side.axis(), side.sign()), side);
            assert_eq!(side.opposite().opposite(), side);
            assert_eq!(side.normal() + side.opposite().normal(), Vector3::new(0, 0, 0));
        }
    }

    #[test]
    fn compose_places_depth_on_the_normal_axis() {
        assert_eq!(Axis::X.compose(7, 1, 2), [7, 1, 2]);
        assert_eq!(Axis::Y.compose(7, 1, 2), [1, 7, 2]);
        assert_eq!(Axis::Z.compose(7, 1, 2), [1, 2, 7]);
    }
}
