//! Vertex data for expanded mesh output.
//!
//! Faces are the mesher's native output; this module turns them into the flat
//! vertex/index lists a renderer uploads.

use cgmath::Vector3;

use crate::voxels::block::registry::BlockRegistry;

use super::face::Face;

/// A vertex of an expanded face.
///
/// # Memory Layout
/// - Position: [f32; 3] world space (12 bytes)
/// - Normal: [f32; 3] (12 bytes)
/// - Color: [f32; 4] RGBA (16 bytes)
///
/// Total size: 40 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in world space
    pub position: [f32; 3],
    /// Outward unit normal
    pub normal: [f32; 3],
    /// Block display color
    pub color: [f32; 4],
}

impl Vertex {
    /// Generates the four vertices of a face, offset into world space.
    ///
    /// Vertices are in [`Face::corners`] order.
    pub fn generate_face_vertices(face: &Face, world_offset: Vector3<f32>) -> [Vertex; 4] {
        let normal = face.side().normal();
        let normal = [normal.x as f32, normal.y as f32, normal.z as f32];
        let color = BlockRegistry::color(face.block_type);

        face.corners().map(|corner| Vertex {
            position: [
                corner.x as f32 + world_offset.x,
                corner.y as f32 + world_offset.y,
                corner.z as f32 + world_offset.z,
            ],
            normal,
            color,
        })
    }

    /// Generates index data for a face, adjusted by the number of previously generated faces.
    ///
    /// Two triangles per quad, wound counter-clockwise as seen from outside.
    pub fn generate_face_indices(face: &Face, num_faces_generated: u32) -> [u32; 6] {
        let base = num_faces_generated * 4;
        if face.winds_outward() {
            [base, base + 1, base + 3, base, base + 3, base + 2]
        } else {
            [base, base + 3, base + 1, base, base + 2, base + 3]
        }
    }
}
