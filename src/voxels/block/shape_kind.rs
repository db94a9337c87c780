//! Silhouette tags for block types.

/// The silhouette a block is drawn with.
///
/// Only `Cube` faces take part in greedy merging and same-type face
/// cancellation; every other shape emits its own per-block faces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ShapeKind {
    /// A full 1×1×1 cube.
    #[default]
    Cube,
    /// A thin post centered in the cell.
    FencePost,
    /// Lower half of a door panel.
    DoorLower,
    /// Upper half of a door panel.
    DoorUpper,
}

impl ShapeKind {
    /// Whether this shape fills its whole cell.
    #[inline]
    pub fn is_cube(self) -> bool {
        self == ShapeKind::Cube
    }
}
