//! Greedy meshing implementation for voxel rendering.
//!
//! For each of the six face directions the chunk is swept one slice at a time.
//! Every slice produces a 2D mask holding the block type of each visible cube
//! face, and the mask is then covered with maximal same-type rectangles: grow a
//! run along the row, then grow that run downwards while every cell of the next
//! row matches. A solid region of one material therefore collapses to one quad
//! per outward side no matter how large it is.
//!
//! Blocks whose shape is not a full cube skip the masks and emit one unit face
//! per visible side.
//!
//! The build only reads the chunk and its neighbors, and returns a new
//! [`MeshData`]. Independent chunks can be meshed on separate threads as long
//! as nobody edits the chunk or its face-neighbors meanwhile.

use cgmath::Point3;
use log::debug;
use web_time::Instant;

use crate::voxels::{
    block::{
        block_side::{BlockSide, Sign},
        block_type::BlockType,
    },
    chunk::{Chunk, CHUNK_DIMENSION},
    world::{VoxelQuery, World},
};

use super::{face::Face, mesh::MeshData};

/// One slice's worth of visible cube faces.
type SliceMask = [[Option<BlockType>; CHUNK_DIMENSION]; CHUNK_DIMENSION];

/// Whether `neighbor` hides the face `block` shows towards it.
///
/// A neighbor hides the face when it is a solid, opaque full cube, or when it
/// is the same block type and that type is a full cube (shared interior faces
/// of glass, water and the like cancel). A non-opaque neighbor never hides a
/// different block type.
#[inline]
pub fn occludes(block: BlockType, neighbor: BlockType) -> bool {
    if neighbor.is_air() {
        return false;
    }

    let hides = neighbor.is_solid() && neighbor.is_opaque() && neighbor.shape().is_cube();
    let merges = neighbor == block && block.shape().is_cube();

    hides || merges
}

/// Whether the face of `block` pointing at `neighbor` is drawn.
#[inline]
pub fn is_face_visible(block: BlockType, neighbor: BlockType) -> bool {
    !block.is_air() && !occludes(block, neighbor)
}

/// Resolves neighbor blocks for one chunk, falling back to the world outside it.
struct NeighborLookup<'a, Q: VoxelQuery + ?Sized> {
    chunk: &'a Chunk,
    neighbors: &'a Q,
    origin: Point3<i64>,
}

impl<Q: VoxelQuery + ?Sized> NeighborLookup<'_, Q> {
    /// Block at a chunk-local coordinate that may lie one step outside the chunk.
    #[inline]
    fn block_at(&self, local: [i32; 3]) -> BlockType {
        let dimension = CHUNK_DIMENSION as i32;
        if local.iter().all(|c| (0..dimension).contains(c)) {
            return self
                .chunk
                .get_block(local[0] as usize, local[1] as usize, local[2] as usize);
        }

        self.neighbors.block_at(
            self.origin.x + local[0] as i64,
            self.origin.y + local[1] as i64,
            self.origin.z + local[2] as i64,
        )
    }

    /// Block one step across `side` from a chunk-local cell.
    #[inline]
    fn neighbor_of(&self, local: [usize; 3], side: BlockSide) -> BlockType {
        let normal = side.normal();
        self.block_at([
            local[0] as i32 + normal.x,
            local[1] as i32 + normal.y,
            local[2] as i32 + normal.z,
        ])
    }
}

/// Builds [`MeshData`] for one chunk.
pub struct ChunkMesher;

impl ChunkMesher {
    /// Meshes `chunk`, reading across its boundary through `world`.
    ///
    /// `chunk` does not have to be the world's copy: cells inside it are read
    /// from `chunk`, everything outside from `world`.
    pub fn build(chunk: &Chunk, world: &World) -> MeshData {
        Self::build_with(chunk, world)
    }

    /// Meshes `chunk` against any neighbor source.
    pub fn build_with<Q: VoxelQuery + ?Sized>(chunk: &Chunk, neighbors: &Q) -> MeshData {
        let start = Instant::now();

        if chunk.is_empty() {
            return MeshData::empty(chunk.position);
        }

        let lookup = NeighborLookup {
            chunk,
            neighbors,
            origin: chunk.world_origin(),
        };

        let mut faces = Vec::new();
        for side in BlockSide::all() {
            Self::greedy_side(&lookup, side, &mut faces);
        }
        Self::shaped_faces(&lookup, &mut faces);

        let mesh = MeshData::from_faces(chunk.position, faces);

        debug!(
            "Meshed chunk {:?} in {:?}: {} opaque, {} transparent faces",
            chunk.position,
            start.elapsed(),
            mesh.opaque_faces().len(),
            mesh.transparent_faces().len()
        );

        mesh
    }

    /// Sweeps every slice perpendicular to `side` and emits merged cube faces.
    fn greedy_side<Q: VoxelQuery + ?Sized>(
        lookup: &NeighborLookup<'_, Q>,
        side: BlockSide,
        faces: &mut Vec<Face>,
    ) {
        let axis = side.axis();
        let plane_offset = match side.sign() {
            Sign::Positive => 1,
            Sign::Negative => 0,
        };
        let mut mask: SliceMask = [[None; CHUNK_DIMENSION]; CHUNK_DIMENSION];

        for depth in 0..CHUNK_DIMENSION {
            let mut any_visible = false;

            for (v, row) in mask.iter_mut().enumerate() {
                for (u, cell) in row.iter_mut().enumerate() {
                    let local = axis.compose(depth, u, v);
                    let block = lookup.chunk.get_block(local[0], local[1], local[2]);

                    *cell = if block.is_air() || !block.shape().is_cube() {
                        None
                    } else if is_face_visible(block, lookup.neighbor_of(local, side)) {
                        any_visible = true;
                        Some(block)
                    } else {
                        None
                    };
                }
            }

            if any_visible {
                Self::merge_mask(&mut mask, depth + plane_offset, side, faces);
            }
        }
    }

    /// Covers the mask with maximal rectangles, clearing cells as they are used.
    fn merge_mask(mask: &mut SliceMask, plane: usize, side: BlockSide, faces: &mut Vec<Face>) {
        let axis = side.axis();

        for v in 0..CHUNK_DIMENSION {
            let mut u = 0;
            while u < CHUNK_DIMENSION {
                let Some(block_type) = mask[v][u] else {
                    u += 1;
                    continue;
                };

                let mut width = 1;
                while u + width < CHUNK_DIMENSION && mask[v][u + width] == Some(block_type) {
                    width += 1;
                }

                let mut height = 1;
                while v + height < CHUNK_DIMENSION
                    && mask[v + height][u..u + width]
                        .iter()
                        .all(|cell| *cell == Some(block_type))
                {
                    height += 1;
                }

                for row in mask.iter_mut().skip(v).take(height) {
                    row[u..u + width].fill(None);
                }

                let [x, y, z] = axis.compose(plane, u, v).map(|c| c as i32);
                faces.push(Face::new(
                    Point3::new(x, y, z),
                    width as u32,
                    height as u32,
                    side,
                    block_type,
                ));

                u += width;
            }
        }
    }

    /// Emits unit faces for blocks that are not full cubes.
    fn shaped_faces<Q: VoxelQuery + ?Sized>(lookup: &NeighborLookup<'_, Q>, faces: &mut Vec<Face>) {
        for (position, block_type) in lookup.chunk.iter_blocks() {
            if block_type.shape().is_cube() {
                continue;
            }

            let local = [position.x, position.y, position.z];
            for side in BlockSide::all() {
                if !is_face_visible(block_type, lookup.neighbor_of(local, side)) {
                    continue;
                }

                let mut origin = Point3::new(position.x as i32, position.y as i32, position.z as i32);
                if side.sign() == Sign::Positive {
                    origin[side.axis().index()] += 1;
                }
                faces.push(Face::new(origin, 1, 1, side, block_type));
            }
        }
    }
}
