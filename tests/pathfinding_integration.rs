//! Pathfinding integration tests

use proptest::prelude::*;

use cinder_keep::grid::{find_path, path_cost, HexCoord, HexGrid, Terrain};

/// A corridor map with a rubble field and one walled-off chamber
fn keep_interior() -> HexGrid {
    let mut grid = HexGrid::new(20, 20);
    for r in 2..18 {
        grid.set_terrain(HexCoord::new(10, r), Terrain::Wall);
    }
    for q in 3..8 {
        for r in 3..6 {
            grid.set_terrain(HexCoord::new(q, r), Terrain::Rubble);
        }
    }
    grid.set_terrain(HexCoord::new(14, 9), Terrain::Mire);
    grid.set_terrain(HexCoord::new(15, 9), Terrain::Mire);
    grid
}

#[test]
fn test_route_around_wall() {
    let grid = keep_interior();
    let start = HexCoord::new(5, 10);
    let goal = HexCoord::new(15, 10);

    let path = find_path(&grid, start, goal, None).unwrap();
    assert_eq!(path.destination(), Some(goal));
    // The wall spans r = 2..18 at q = 10; the route must pass its ends
    for step in &path.steps {
        assert!(grid.get_cell(*step).unwrap().walkable);
    }
    assert!(path.len() as u32 >= start.distance(&goal));
}

#[test]
fn test_find_then_validate_budget_pattern() {
    let grid = keep_interior();
    let start = HexCoord::new(2, 10);
    let goal = HexCoord::new(17, 10);

    // Two-step usage: find a route, then validate its cost against the
    // movement budget before committing
    let Some(path) = find_path(&grid, start, goal, None) else {
        panic!("route must exist");
    };
    let cost = path_cost(&grid, &path.steps);
    assert_eq!(cost, path.cost);

    let budget = cost - 1;
    assert!(find_path(&grid, start, goal, Some(budget)).is_none());
    assert!(find_path(&grid, start, goal, Some(cost)).is_some());
}

#[test]
fn test_determinism_across_many_queries() {
    let grid = keep_interior();
    let pairs = [
        (HexCoord::new(0, 0), HexCoord::new(19, 19)),
        (HexCoord::new(5, 10), HexCoord::new(15, 10)),
        (HexCoord::new(2, 2), HexCoord::new(7, 4)),
    ];

    for (start, goal) in pairs {
        let first = find_path(&grid, start, goal, None);
        for _ in 0..5 {
            assert_eq!(find_path(&grid, start, goal, None), first);
        }
    }
}

proptest! {
    /// On an open uniform-cost grid, the route between two cells has
    /// length and cost exactly equal to their hex distance
    #[test]
    fn prop_uniform_grid_distance(q1 in 0i32..12, r1 in 0i32..12, q2 in 0i32..12, r2 in 0i32..12) {
        let start = HexCoord::new(q1, r1);
        let goal = HexCoord::new(q2, r2);
        prop_assume!(start != goal);

        let grid = HexGrid::new(12, 12);
        let path = find_path(&grid, start, goal, None).unwrap();

        // Bounded grids can force detours, but axial rectangles are
        // convex enough for straight metric routes
        prop_assert_eq!(path.cost, start.distance(&goal));
        prop_assert_eq!(path.len() as u32, start.distance(&goal));
        prop_assert_eq!(path.cost, path_cost(&grid, &path.steps));
    }

    /// The accumulated cost always matches the recomputed cost, terrain
    /// mix or not
    #[test]
    fn prop_cost_agreement(seed_cells in proptest::collection::vec((0i32..10, 0i32..10, 0u8..3), 0..20)) {
        let mut grid = HexGrid::new(10, 10);
        for (q, r, kind) in seed_cells {
            let terrain = match kind {
                0 => Terrain::Rubble,
                1 => Terrain::Mire,
                _ => Terrain::Wall,
            };
            // Keep the corners open so a route can exist
            if (q, r) != (0, 0) && (q, r) != (9, 9) {
                grid.set_terrain(HexCoord::new(q, r), terrain);
            }
        }

        if let Some(path) = find_path(&grid, HexCoord::new(0, 0), HexCoord::new(9, 9), None) {
            prop_assert_eq!(path.cost, path_cost(&grid, &path.steps));
        }
    }
}
