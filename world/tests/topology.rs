use floorgrid_core::{
    CoordSpace, CornerCoord, DiagonalKind, EdgeCoord, Extent, LatticeError, ObjectId, TileCoord,
};
use floorgrid_world::{GridCalculator, GridStore};
use glam::Vec3;
use proptest::prelude::*;

fn store(width: u32, height: u32) -> GridStore {
    let extent = Extent::new(width, height).expect("extent");
    let calculator = GridCalculator::new(extent, Vec3::ZERO, 0.0, 50.0).expect("calculator");
    GridStore::new(calculator, 0.0)
}

#[test]
fn every_tile_in_range_is_valid() {
    let store = store(5, 3);
    for y in 0..3 {
        for x in 0..5 {
            let coord = TileCoord::new(x, y);
            assert!(store.is_valid_tile(coord));
            assert!(store.tile(coord).is_ok());
        }
    }
}

#[test]
fn out_of_range_tiles_fail_without_panicking() {
    let mut store = store(5, 3);
    for coord in [
        TileCoord::new(5, 0),
        TileCoord::new(0, 3),
        TileCoord::new(-1, 1),
        TileCoord::new(i32::MIN, i32::MAX),
    ] {
        assert!(!store.is_valid_tile(coord));
        assert!(matches!(
            store.occupy_tile(coord),
            Err(LatticeError::InvalidCoordinate {
                space: CoordSpace::Tile,
                ..
            })
        ));
        assert!(store
            .set_diagonal_wall(coord, Some(DiagonalKind::BackSlash))
            .is_err());
    }
}

#[test]
fn out_of_range_edges_and_corners_fail() {
    let mut store = store(4, 4);
    assert!(store.set_edge_wall(EdgeCoord::horizontal(4, 0), true).is_err());
    assert!(store.set_edge_object(EdgeCoord::vertical(0, 4), true).is_err());
    assert!(store.corner(CornerCoord::new(5, 0)).is_err());
    assert!(!store.is_valid_corner(CornerCoord::new(-1, 0)));
    assert!(store.corner(CornerCoord::new(4, 4)).is_ok());
    assert!(store
        .edge_between(CornerCoord::new(4, 4), CornerCoord::new(5, 4))
        .is_err());
}

#[test]
fn occupying_twice_is_a_no_op() {
    let mut store = store(4, 4);
    let tile = TileCoord::new(2, 1);
    assert_eq!(store.occupy_tile(tile), Ok(()));
    assert_eq!(store.occupy_tile(tile), Ok(()));
    assert_eq!(store.is_tile_occupied(tile), Ok(true));
}

#[test]
fn edge_lookup_resolves_from_either_endpoint() {
    let mut store = store(4, 4);
    let a = CornerCoord::new(1, 2);
    let b = CornerCoord::new(1, 3);
    let edge = store.edge_between(b, a).expect("adjacent corners");
    store.set_edge_wall(edge, true).expect("wall");

    let same = store.edge_between(a, b).expect("adjacent corners");
    assert_eq!(store.edge_has_wall(same), Ok(true));
    assert_eq!(store.edge_corners(same), Ok([a, b]));
}

#[test]
fn line_wall_traces_scenario_a_run() {
    let mut store = store(4, 4);
    let run = [
        EdgeCoord::horizontal(0, 0),
        EdgeCoord::horizontal(1, 0),
        EdgeCoord::horizontal(2, 0),
    ];
    for edge in run {
        store.set_edge_wall(edge, true).expect("wall");
    }

    let traced = store.line_wall(EdgeCoord::horizontal(1, 0)).expect("trace");
    assert_eq!(traced, run.to_vec());
    assert_eq!(store.edge_has_wall(EdgeCoord::horizontal(3, 0)), Ok(false));
    assert!(!traced.contains(&EdgeCoord::horizontal(3, 0)));
}

#[test]
fn line_wall_stops_at_gaps_and_ignores_crossing_axis() {
    let mut store = store(6, 6);
    for edge in [
        EdgeCoord::vertical(2, 0),
        EdgeCoord::vertical(2, 1),
        EdgeCoord::vertical(2, 3),
        EdgeCoord::horizontal(2, 1),
    ] {
        store.set_edge_wall(edge, true).expect("wall");
    }

    assert_eq!(
        store.line_wall(EdgeCoord::vertical(2, 1)),
        Ok(vec![EdgeCoord::vertical(2, 0), EdgeCoord::vertical(2, 1)])
    );
    assert_eq!(
        store.line_wall(EdgeCoord::vertical(2, 3)),
        Ok(vec![EdgeCoord::vertical(2, 3)])
    );
}

#[test]
fn line_wall_of_unwalled_seed_is_the_seed() {
    let mut store = store(4, 4);
    store
        .set_edge_wall(EdgeCoord::horizontal(1, 2), true)
        .expect("wall");
    assert_eq!(
        store.line_wall(EdgeCoord::horizontal(0, 2)),
        Ok(vec![EdgeCoord::horizontal(0, 2)])
    );
}

#[test]
fn line_wall_spans_the_full_floor_without_leaving_it() {
    let mut store = store(3, 3);
    for x in 0..3 {
        store
            .set_edge_wall(EdgeCoord::horizontal(x, 3), true)
            .expect("wall");
    }
    let run = store.line_wall(EdgeCoord::horizontal(2, 3)).expect("trace");
    assert_eq!(run.len(), 3);
    assert_eq!(run.first(), Some(&EdgeCoord::horizontal(0, 3)));
}

#[test]
fn diagonal_runs_follow_their_own_diagonal() {
    let mut store = store(5, 5);
    for tile in [
        TileCoord::new(0, 0),
        TileCoord::new(1, 1),
        TileCoord::new(2, 2),
    ] {
        store
            .set_diagonal_wall(tile, Some(DiagonalKind::ForwardSlash))
            .expect("diagonal");
    }
    store
        .set_diagonal_wall(TileCoord::new(1, 3), Some(DiagonalKind::ForwardSlash))
        .expect("diagonal");

    assert_eq!(
        store.diagonal_line_wall(TileCoord::new(2, 2)),
        Ok(vec![
            TileCoord::new(0, 0),
            TileCoord::new(1, 1),
            TileCoord::new(2, 2),
        ])
    );
}

#[test]
fn diagonal_runs_never_mix_kinds() {
    let mut store = store(4, 4);
    store
        .set_diagonal_wall(TileCoord::new(1, 1), Some(DiagonalKind::ForwardSlash))
        .expect("diagonal");
    store
        .set_diagonal_wall(TileCoord::new(2, 2), Some(DiagonalKind::BackSlash))
        .expect("diagonal");
    store
        .set_diagonal_wall(TileCoord::new(2, 0), Some(DiagonalKind::BackSlash))
        .expect("diagonal");

    let forward = store.diagonal_line_wall(TileCoord::new(1, 1)).expect("trace");
    assert_eq!(forward, vec![TileCoord::new(1, 1)]);

    let back = store.diagonal_line_wall(TileCoord::new(2, 2)).expect("trace");
    assert_eq!(back, vec![TileCoord::new(2, 2)]);

    assert_eq!(
        store.diagonal_line_wall(TileCoord::new(3, 3)),
        Ok(vec![TileCoord::new(3, 3)])
    );
}

#[test]
fn backslash_runs_climb_toward_increasing_x() {
    let mut store = store(4, 4);
    for tile in [TileCoord::new(0, 3), TileCoord::new(1, 2), TileCoord::new(2, 1)] {
        store
            .set_diagonal_wall(tile, Some(DiagonalKind::BackSlash))
            .expect("diagonal");
    }
    assert_eq!(
        store.diagonal_line_wall(TileCoord::new(1, 2)),
        Ok(vec![
            TileCoord::new(0, 3),
            TileCoord::new(1, 2),
            TileCoord::new(2, 1),
        ])
    );
}

#[test]
fn vacating_clears_occupancy() {
    let mut store = store(4, 4);
    let tile = TileCoord::new(1, 3);
    store.occupy_tile(tile).expect("occupy");
    assert_eq!(store.vacate_tile(tile), Ok(()));
    assert_eq!(store.is_tile_occupied(tile), Ok(false));
    assert_eq!(store.vacate_tile(tile), Ok(()));
    assert!(store.vacate_tile(TileCoord::new(4, 0)).is_err());
}

#[test]
fn tile_object_is_recorded_and_cleared() {
    let mut store = store(4, 4);
    let tile = TileCoord::new(2, 2);
    assert_eq!(store.tile(tile).expect("tile").object(), None);

    store
        .set_tile_object(tile, Some(ObjectId::new(17)))
        .expect("object");
    assert_eq!(
        store.tile(tile).expect("tile").object(),
        Some(ObjectId::new(17))
    );
    assert_eq!(store.is_tile_occupied(tile), Ok(false));

    store.set_tile_object(tile, None).expect("clear");
    assert_eq!(store.tile(tile).expect("tile").object(), None);
    assert!(store
        .set_tile_object(TileCoord::new(0, -1), Some(ObjectId::new(1)))
        .is_err());
}

#[test]
fn tile_corners_are_the_corners_of_its_edges() {
    let store = store(3, 2);
    for y in 0..2 {
        for x in 0..3 {
            let tile = TileCoord::new(x, y);
            let corners = store.tile_corners(tile).expect("corners");
            let mut from_edges: Vec<CornerCoord> = store
                .tile_edges(tile)
                .expect("edges")
                .iter()
                .flat_map(|edge| store.edge_corners(*edge).expect("edge corners"))
                .collect();
            from_edges.sort_by_key(|corner| (corner.y(), corner.x()));
            from_edges.dedup();

            let mut sorted = corners.to_vec();
            sorted.sort_by_key(|corner| (corner.y(), corner.x()));
            assert_eq!(sorted, from_edges, "tile {tile}");
            assert_eq!(corners[0], CornerCoord::new(x, y));
            assert!(corners.iter().all(|corner| store.is_valid_corner(*corner)));
        }
    }
    assert!(store.tile_corners(TileCoord::new(3, 0)).is_err());
}

#[test]
fn edge_validity_tracks_the_extent() {
    let store = store(3, 2);
    assert!(store.is_valid_edge(EdgeCoord::horizontal(2, 2)));
    assert!(store.is_valid_edge(EdgeCoord::vertical(3, 1)));
    assert!(!store.is_valid_edge(EdgeCoord::horizontal(3, 0)));
    assert!(!store.is_valid_edge(EdgeCoord::vertical(0, 2)));
    assert!(!store.is_valid_edge(EdgeCoord::vertical(-1, 0)));
}

proptest! {
    #[test]
    fn line_wall_is_identical_for_every_member(
        walls in proptest::collection::vec(any::<bool>(), 6),
        seed in 0i32..6,
    ) {
        let mut store = store(6, 2);
        for (x, wall) in walls.iter().enumerate() {
            store.set_edge_wall(EdgeCoord::horizontal(x as i32, 1), *wall).expect("wall");
        }

        let start = EdgeCoord::horizontal(seed, 1);
        let run = store.line_wall(start).expect("trace");
        prop_assert!(run.contains(&start));
        if walls[seed as usize] {
            for member in &run {
                prop_assert_eq!(store.line_wall(*member).expect("trace"), run.clone());
                prop_assert_eq!(store.edge_has_wall(*member), Ok(true));
            }
        }
    }

    #[test]
    fn diagonal_runs_contain_only_the_seed_kind(
        kinds in proptest::collection::vec(0u8..3, 25),
        seed_x in 0i32..5,
        seed_y in 0i32..5,
    ) {
        let mut store = store(5, 5);
        for (index, kind) in kinds.iter().enumerate() {
            let tile = TileCoord::new(index as i32 % 5, index as i32 / 5);
            let kind = match kind {
                0 => None,
                1 => Some(DiagonalKind::ForwardSlash),
                _ => Some(DiagonalKind::BackSlash),
            };
            store.set_diagonal_wall(tile, kind).expect("diagonal");
        }

        let seed = TileCoord::new(seed_x, seed_y);
        let seed_kind = store.diagonal_wall_kind(seed).expect("kind");
        let run = store.diagonal_line_wall(seed).expect("trace");
        prop_assert!(run.contains(&seed));
        if seed_kind.is_some() {
            for tile in &run {
                prop_assert_eq!(store.diagonal_wall_kind(*tile).expect("kind"), seed_kind);
            }
        }
    }
}
