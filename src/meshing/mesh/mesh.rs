//! Mesh data structures for voxel rendering.
//!
//! [`MeshData`] is the mesher's output for one chunk: two face lists split by
//! how they must be drawn. Opaque faces can go out in any order with depth
//! testing. Transparent faces are alpha-blended, so they are drawn after all
//! opaque geometry and back to front.

use cgmath::{MetricSpace, Point3, Vector3};

use crate::voxels::chunk::CHUNK_DIMENSION;

use super::{face::Face, vertex::Vertex};

/// The geometry of one chunk, split into opaque and transparent batches.
///
/// A `MeshData` is built once and never modified; when the chunk changes a
/// new one replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    /// Chunk coordinate the faces belong to
    chunk_position: Point3<i32>,
    /// Faces of opaque block types
    opaque_faces: Vec<Face>,
    /// Faces of non-opaque block types
    transparent_faces: Vec<Face>,
}

impl MeshData {
    /// Routes faces into the opaque or transparent batch by their block type.
    pub fn from_faces(chunk_position: Point3<i32>, faces: impl IntoIterator<Item = Face>) -> Self {
        let (opaque_faces, transparent_faces) = faces
            .into_iter()
            .partition(|face: &Face| face.block_type.is_opaque());

        MeshData {
            chunk_position,
            opaque_faces,
            transparent_faces,
        }
    }

    /// A mesh with no faces.
    pub fn empty(chunk_position: Point3<i32>) -> Self {
        MeshData {
            chunk_position,
            opaque_faces: Vec::new(),
            transparent_faces: Vec::new(),
        }
    }

    /// Chunk coordinate this mesh was built for.
    pub fn chunk_position(&self) -> Point3<i32> {
        self.chunk_position
    }

    /// Faces drawn with depth testing in any order.
    pub fn opaque_faces(&self) -> &[Face] {
        &self.opaque_faces
    }

    /// Faces drawn after all opaque geometry, blended.
    pub fn transparent_faces(&self) -> &[Face] {
        &self.transparent_faces
    }

    /// Every face, opaque first.
    pub fn faces(&self) -> impl Iterator<Item = &Face> {
        self.opaque_faces.iter().chain(self.transparent_faces.iter())
    }

    /// Total number of faces in both batches.
    pub fn face_count(&self) -> usize {
        self.opaque_faces.len() + self.transparent_faces.len()
    }

    /// Whether the mesh has no faces at all.
    pub fn is_empty(&self) -> bool {
        self.face_count() == 0
    }

    /// Translation from chunk-local face coordinates to world space.
    pub fn world_offset(&self) -> Vector3<f32> {
        let dimension = CHUNK_DIMENSION as f32;
        Vector3::new(
            self.chunk_position.x as f32 * dimension,
            self.chunk_position.y as f32 * dimension,
            self.chunk_position.z as f32 * dimension,
        )
    }

    /// Transparent faces sorted farthest-first from a world-space eye position.
    ///
    /// Distance is measured to each face's center. Ties keep mesh order.
    pub fn transparent_faces_back_to_front(&self, eye: Point3<f32>) -> Vec<Face> {
        let offset = self.world_offset();
        let mut keyed: Vec<(f32, Face)> = self
            .transparent_faces
            .iter()
            .map(|face| (eye.distance2(face.center() + offset), *face))
            .collect();
        keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
        keyed.into_iter().map(|(_, face)| face).collect()
    }

    /// World-space vertices and triangle indices for the opaque batch.
    pub fn opaque_vertices(&self) -> (Vec<Vertex>, Vec<u32>) {
        Self::expand(&self.opaque_faces, self.world_offset())
    }

    /// World-space vertices and triangle indices for the transparent batch.
    ///
    /// Faces keep mesh order; sort with
    /// [`MeshData::transparent_faces_back_to_front`] first if draw order matters.
    pub fn transparent_vertices(&self) -> (Vec<Vertex>, Vec<u32>) {
        Self::expand(&self.transparent_faces, self.world_offset())
    }

    fn expand(faces: &[Face], world_offset: Vector3<f32>) -> (Vec<Vertex>, Vec<u32>) {
        let mut vertices = Vec::with_capacity(faces.len() * 4);
        let mut indices = Vec::with_capacity(faces.len() * 6);

        for (num_faces_generated, face) in faces.iter().enumerate() {
            vertices.extend(Vertex::generate_face_vertices(face, world_offset));
            indices.extend(Vertex::generate_face_indices(face, num_faces_generated as u32));
        }

        (vertices, indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::block::{block_side::BlockSide, block_type::BlockType};

    fn unit(origin: (i32, i32, i32), side: BlockSide, block_type: BlockType) -> Face {
        Face::new(Point3::new(origin.0, origin.1, origin.2), 1, 1, side, block_type)
    }

    #[test]
    fn faces_are_routed_by_opacity() {
        let mesh = MeshData::from_faces(
            Point3::new(0, 0, 0),
            [
                unit((0, 0, 0), BlockSide::LEFT, BlockType::STONE),
                unit((0, 0, 0), BlockSide::BACK, BlockType::GLASS),
                unit((0, 0, 0), BlockSide::BOTTOM, BlockType::FENCE_POST),
            ],
        );
        assert_eq!(mesh.opaque_faces().len(), 1);
        assert_eq!(mesh.transparent_faces().len(), 2);
        assert_eq!(mesh.face_count(), 3);
        assert!(MeshData::empty(Point3::new(0, 0, 0)).is_empty());
    }

    #[test]
    fn back_to_front_orders_by_distance_in_world_space() {
        let near = unit((0, 0, 1), BlockSide::FRONT, BlockType::GLASS);
        let far = unit((0, 0, 10), BlockSide::FRONT, BlockType::GLASS);
        let mesh = MeshData::from_faces(Point3::new(1, 0, 0), [near, far]);

        let eye = Point3::new(16.5, 0.5, -5.0);
        assert_eq!(mesh.transparent_faces_back_to_front(eye), vec![far, near]);

        // From the other side the order flips.
        let eye = Point3::new(16.5, 0.5, 40.0);
        assert_eq!(mesh.transparent_faces_back_to_front(eye), vec![near, far]);
    }

    #[test]
    fn expanded_batches_have_four_vertices_and_six_indices_per_face() {
        let mesh = MeshData::from_faces(
            Point3::new(0, 0, 0),
            [
                unit((0, 0, 0), BlockSide::LEFT, BlockType::STONE),
                unit((1, 0, 0), BlockSide::RIGHT, BlockType::STONE),
            ],
        );
        let (vertices, indices) = mesh.opaque_vertices();
        assert_eq!(vertices.len(), 8);
        assert_eq!(indices.len(), 12);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
        assert_eq!(mesh.transparent_vertices(), (Vec::new(), Vec::new()));
    }
}
