//! Integration tests for meshing correctness
//! These tests check face culling, merging and batch routing through the public API

use std::collections::{HashMap, HashSet};

use cgmath::Point3;
use voxel_mesher::meshing::is_face_visible;
use voxel_mesher::*;

const ORIGIN: Point3<i32> = Point3 { x: 0, y: 0, z: 0 };

fn single_chunk_world(chunk: Chunk) -> World {
    let mut world = World::new();
    world.insert_chunk(chunk);
    world
}

fn mesh_of(world: &World, position: Point3<i32>) -> MeshData {
    let chunk = world.get_chunk_at(position).expect("chunk is loaded");
    ChunkMesher::build(chunk, world)
}

/// One entry per unit face: the side it faces and its minimum corner on the face plane.
type UnitFace = (BlockSide, [i32; 3]);

/// Expands every merged face into the unit faces it covers, failing on overlap.
fn covered_unit_faces(mesh: &MeshData) -> HashMap<UnitFace, BlockType> {
    let mut covered = HashMap::new();
    for face in mesh.faces() {
        assert!(face.width > 0 && face.height > 0, "zero-area face {face:?}");
        let (u, v) = face.axis.tangents();
        for i in 0..face.width as i32 {
            for j in 0..face.height as i32 {
                let mut corner = [face.origin.x, face.origin.y, face.origin.z];
                corner[u.index()] += i;
                corner[v.index()] += j;
                let previous = covered.insert((face.side(), corner), face.block_type);
                assert!(previous.is_none(), "overlapping faces at {corner:?} {:?}", face.side());
            }
        }
    }
    covered
}

/// Brute-force visible unit faces of a chunk, one neighbor lookup per block side.
fn naive_unit_faces(world: &World, position: Point3<i32>) -> HashMap<UnitFace, BlockType> {
    let chunk = world.get_chunk_at(position).expect("chunk is loaded");
    let origin = chunk.world_origin();
    let mut expected = HashMap::new();

    for (local, block_type) in chunk.iter_blocks() {
        for side in BlockSide::all() {
            let normal = side.normal();
            let neighbor = world.block_at(
                origin.x + local.x as i64 + normal.x as i64,
                origin.y + local.y as i64 + normal.y as i64,
                origin.z + local.z as i64 + normal.z as i64,
            );
            if !is_face_visible(block_type, neighbor) {
                continue;
            }
            let mut corner = [local.x as i32, local.y as i32, local.z as i32];
            if side.sign() == Sign::Positive {
                corner[side.axis().index()] += 1;
            }
            expected.insert((side, corner), block_type);
        }
    }
    expected
}

fn assert_batches_routed(mesh: &MeshData) {
    assert!(mesh.opaque_faces().iter().all(|f| f.block_type.is_opaque()));
    assert!(mesh.transparent_faces().iter().all(|f| !f.block_type.is_opaque()));
}

#[test]
fn test_single_cube_generates_six_faces() {
    let mut chunk = Chunk::new(ORIGIN);
    chunk.set_block(5, 6, 7, BlockType::STONE);
    let world = single_chunk_world(chunk);

    let mesh = mesh_of(&world, ORIGIN);
    assert_eq!(mesh.opaque_faces().len(), 6);
    assert!(mesh.transparent_faces().is_empty());

    let sides: HashSet<BlockSide> = mesh.faces().map(Face::side).collect();
    assert_eq!(sides.len(), 6);
    assert!(mesh.faces().all(|f| f.area() == 1));

    let top = mesh.faces().find(|f| f.side() == BlockSide::TOP).unwrap();
    assert_eq!(top.origin, Point3::new(5, 7, 7));
    let bottom = mesh.faces().find(|f| f.side() == BlockSide::BOTTOM).unwrap();
    assert_eq!(bottom.origin, Point3::new(5, 6, 7));
}

#[test]
fn test_adjacent_same_type_cubes_merge() {
    let mut chunk = Chunk::new(ORIGIN);
    chunk.set_block(3, 3, 3, BlockType::DIRT);
    chunk.set_block(4, 3, 3, BlockType::DIRT);
    let world = single_chunk_world(chunk);

    let mesh = mesh_of(&world, ORIGIN);
    assert_eq!(mesh.face_count(), 6);
    let total_area: u32 = mesh.faces().map(Face::area).sum();
    assert_eq!(total_area, 10);
}

#[test]
fn test_solid_boxes_collapse_to_six_faces() {
    for size in [1, 2, 5, CHUNK_DIMENSION] {
        let mut chunk = Chunk::new(ORIGIN);
        for z in 0..size {
            for y in 0..size {
                for x in 0..size {
                    chunk.set_block(x, y, z, BlockType::WOOD);
                }
            }
        }
        let world = single_chunk_world(chunk);

        let mesh = mesh_of(&world, ORIGIN);
        assert_eq!(mesh.face_count(), 6, "box of size {size}");
        assert!(
            mesh.faces().all(|f| f.width as usize == size && f.height as usize == size),
            "box of size {size}"
        );
    }
}

#[test]
fn test_different_cube_types_do_not_merge() {
    let mut chunk = Chunk::new(ORIGIN);
    chunk.set_block(0, 0, 0, BlockType::DIRT);
    chunk.set_block(1, 0, 0, BlockType::GRASS);
    let world = single_chunk_world(chunk);

    let mesh = mesh_of(&world, ORIGIN);
    // Shared face hidden on both sides, four sides per block stay separate.
    assert_eq!(mesh.face_count(), 10);
    assert!(mesh.faces().all(|f| f.area() == 1));
}

#[test]
fn test_glass_next_to_stone() {
    let mut chunk = Chunk::new(ORIGIN);
    chunk.set_block(2, 2, 2, BlockType::STONE);
    chunk.set_block(3, 2, 2, BlockType::GLASS);
    let world = single_chunk_world(chunk);

    let mesh = mesh_of(&world, ORIGIN);
    assert_eq!(mesh.opaque_faces().len(), 6);
    assert_eq!(mesh.transparent_faces().len(), 5);
    // The stone face behind the glass is still drawn.
    assert!(mesh
        .opaque_faces()
        .iter()
        .any(|f| f.side() == BlockSide::RIGHT && f.origin == Point3::new(3, 2, 2)));
    assert!(!mesh
        .transparent_faces()
        .iter()
        .any(|f| f.side() == BlockSide::LEFT));
}

#[test]
fn test_single_glass_block_is_fully_transparent() {
    let mut chunk = Chunk::new(ORIGIN);
    chunk.set_block(8, 8, 8, BlockType::GLASS);
    let world = single_chunk_world(chunk);

    let mesh = mesh_of(&world, ORIGIN);
    assert!(mesh.opaque_faces().is_empty());
    assert_eq!(mesh.transparent_faces().len(), 6);
}

#[test]
fn test_glass_pane_merges_but_keeps_outer_faces() {
    let mut chunk = Chunk::new(ORIGIN);
    for y in 0..4 {
        for x in 0..4 {
            chunk.set_block(x, y, 0, BlockType::GLASS);
        }
    }
    let world = single_chunk_world(chunk);

    let mesh = mesh_of(&world, ORIGIN);
    // Interior glass/glass faces cancel; the slab keeps one quad per side.
    assert_eq!(mesh.transparent_faces().len(), 6);
    let total_area: u32 = mesh.faces().map(Face::area).sum();
    assert_eq!(total_area, 16 * 2 + 4 * 4);
}

#[test]
fn test_two_transparent_types_both_draw_shared_faces() {
    let mut chunk = Chunk::new(ORIGIN);
    chunk.set_block(1, 1, 1, BlockType::GLASS);
    chunk.set_block(1, 2, 1, BlockType::WATER);
    let world = single_chunk_world(chunk);

    let mesh = mesh_of(&world, ORIGIN);
    assert_eq!(mesh.transparent_faces().len(), 12);
    assert!(mesh.opaque_faces().is_empty());
}

#[test]
fn test_cross_chunk_faces_are_culled() {
    let mut world = World::new();
    let mut left = Chunk::new(ORIGIN);
    left.set_block(15, 4, 4, BlockType::STONE);
    world.insert_chunk(left);

    assert_eq!(mesh_of(&world, ORIGIN).face_count(), 6);

    let right_position = Point3::new(1, 0, 0);
    let mut right = Chunk::new(right_position);
    right.set_block(0, 4, 4, BlockType::STONE);
    world.insert_chunk(right);

    let left_mesh = mesh_of(&world, ORIGIN);
    let right_mesh = mesh_of(&world, right_position);
    assert_eq!(left_mesh.face_count(), 5);
    assert_eq!(right_mesh.face_count(), 5);
    assert!(!left_mesh.faces().any(|f| f.side() == BlockSide::RIGHT));
    assert!(!right_mesh.faces().any(|f| f.side() == BlockSide::LEFT));
}

#[test]
fn test_cross_chunk_culling_at_negative_coordinates() {
    let mut world = World::new();
    let below_position = Point3::new(0, -1, 0);
    let mut below = Chunk::new(below_position);
    below.set_block(0, 15, 0, BlockType::GRASS);
    world.insert_chunk(below);

    let mut chunk = Chunk::new(ORIGIN);
    chunk.set_block(0, 0, 0, BlockType::GRASS);
    world.insert_chunk(chunk);

    // Same type across the boundary: the shared faces cancel.
    assert!(!mesh_of(&world, ORIGIN).faces().any(|f| f.side() == BlockSide::BOTTOM));
    assert!(!mesh_of(&world, below_position).faces().any(|f| f.side() == BlockSide::TOP));
}

#[test]
fn test_shaped_blocks_never_merge() {
    let mut chunk = Chunk::new(ORIGIN);
    chunk.set_block(4, 4, 4, BlockType::FENCE_POST);
    chunk.set_block(5, 4, 4, BlockType::FENCE_POST);
    chunk.set_block(8, 4, 8, BlockType::DOOR_LOWER);
    chunk.set_block(8, 5, 8, BlockType::DOOR_UPPER);
    let world = single_chunk_world(chunk);

    let mesh = mesh_of(&world, ORIGIN);
    assert_eq!(mesh.transparent_faces().len(), 24);
    assert!(mesh.faces().all(|f| f.area() == 1));
    for block_type in [
        BlockType::FENCE_POST,
        BlockType::DOOR_LOWER,
        BlockType::DOOR_UPPER,
    ] {
        let count = mesh.faces().filter(|f| f.block_type == block_type).count();
        let expected = if block_type == BlockType::FENCE_POST { 12 } else { 6 };
        assert_eq!(count, expected, "{block_type:?}");
    }
}

#[test]
fn test_shaped_block_against_stone() {
    let mut chunk = Chunk::new(ORIGIN);
    chunk.set_block(4, 4, 4, BlockType::FENCE_POST);
    chunk.set_block(4, 3, 4, BlockType::STONE);
    let world = single_chunk_world(chunk);

    let mesh = mesh_of(&world, ORIGIN);
    // The stone hides the post's bottom; the post hides nothing.
    assert_eq!(mesh.transparent_faces().len(), 5);
    assert_eq!(mesh.opaque_faces().len(), 6);
}

#[test]
fn test_checkerboard_has_no_merges() {
    let world = single_chunk_world(Chunk::checkerboard(&ORIGIN, BlockType::STONE));

    let mesh = mesh_of(&world, ORIGIN);
    assert_eq!(mesh.face_count(), 2048 * 6);
    assert!(mesh.faces().all(|f| f.area() == 1));
}

#[test]
fn test_empty_chunk_has_empty_mesh() {
    let world = single_chunk_world(Chunk::new(ORIGIN));
    assert!(mesh_of(&world, ORIGIN).is_empty());
}

#[test]
fn test_meshing_is_idempotent() {
    let world = single_chunk_world(Chunk::perlin(&ORIGIN, 11));
    assert_eq!(mesh_of(&world, ORIGIN), mesh_of(&world, ORIGIN));
}

#[test]
fn test_random_chunks_cover_exactly_the_visible_faces() {
    let mut world = World::new();
    for x in 0..2 {
        world.insert_chunk(Chunk::random(&Point3::new(x, 0, 0), 0.5, 1234 + x as u64));
    }

    for position in world.chunk_positions() {
        let mesh = mesh_of(&world, position);
        assert_batches_routed(&mesh);
        assert_eq!(covered_unit_faces(&mesh), naive_unit_faces(&world, position));
    }
}

#[test]
fn test_mixed_block_types_cover_exactly_the_visible_faces() {
    let mut rng = fastrand::Rng::with_seed(99);
    let mut world = World::new();
    for x in -1..=0 {
        let position = Point3::new(x, 0, 0);
        let mut chunk = Chunk::new(position);
        for z in 0..CHUNK_DIMENSION {
            for y in 0..CHUNK_DIMENSION {
                for x in 0..CHUNK_DIMENSION {
                    let block_type = BlockType::ALL[rng.usize(..BlockType::ALL.len())];
                    chunk.set_block(x, y, z, block_type);
                }
            }
        }
        world.insert_chunk(chunk);
    }

    for position in world.chunk_positions() {
        let mesh = mesh_of(&world, position);
        assert_batches_routed(&mesh);
        assert_eq!(covered_unit_faces(&mesh), naive_unit_faces(&world, position));
    }
}

#[test]
fn test_boundary_edit_changes_neighbor_mesh() {
    let mut world = World::new();
    world.insert_chunk(Chunk::filled(&ORIGIN, BlockType::STONE));
    world.insert_chunk(Chunk::filled(&Point3::new(0, 0, 1), BlockType::STONE));

    let before = mesh_of(&world, Point3::new(0, 0, 1));
    let affected = world.set_block_at(3, 3, 15, BlockType::AIR);
    assert_eq!(affected, vec![ORIGIN, Point3::new(0, 0, 1)]);

    let after = mesh_of(&world, Point3::new(0, 0, 1));
    assert_ne!(before, after);
    // The neighbor now shows one unit face into the hole.
    let back_area: u32 = after
        .faces()
        .filter(|f| f.side() == BlockSide::BACK)
        .map(Face::area)
        .sum();
    assert_eq!(back_area, 1);
}

#[test]
fn test_detached_chunk_reads_neighbors_from_world() {
    let mut world = World::new();
    world.insert_chunk(Chunk::filled(&Point3::new(-1, 0, 0), BlockType::STONE));

    // The chunk being meshed does not have to be in the world.
    let chunk = Chunk::filled(&ORIGIN, BlockType::STONE);
    let mesh = ChunkMesher::build(&chunk, &world);
    assert_eq!(mesh.face_count(), 5);
    assert!(!mesh.faces().any(|f| f.side() == BlockSide::LEFT));
}
