//! A* pathfinding over the hex grid
//!
//! Deterministic: identical grid state and arguments always yield the
//! identical path, not merely an equal-cost one. Frontier ties are broken
//! by discovery order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::grid::hex::HexCoord;
use crate::grid::map::HexGrid;
use crate::grid::terrain::IMPASSABLE_COST;

/// A computed route
///
/// Steps run from (but excluding) the origin to the destination. Produced
/// fresh per query and never mutated after return; callers may truncate a
/// prefix as steps complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub steps: Vec<HexCoord>,
    pub cost: u32,
}

impl Path {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn destination(&self) -> Option<HexCoord> {
        self.steps.last().copied()
    }
}

/// Node in the A* open set
#[derive(Debug, Clone, Copy)]
struct PathNode {
    coord: HexCoord,
    g_cost: u32,
    f_cost: u32,
    /// Discovery sequence number; earlier discovery wins f-cost ties
    seq: u64,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.f_cost == other.f_cost && self.seq == other.seq
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; earlier discovery first on equal f
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a minimum-cost route using A*
///
/// Edge cost is the destination cell's movement cost; cells that are
/// unwalkable or carry the impassable sentinel cost are excluded. The
/// heuristic is hex distance, admissible because every step costs at
/// least 1.
///
/// Returns None when no path exists, when `start == goal`, or when every
/// path would exceed `max_cost`. Budget validation stays with the caller:
/// re-check `path_cost` before committing action points.
pub fn find_path(
    grid: &HexGrid,
    start: HexCoord,
    goal: HexCoord,
    max_cost: Option<u32>,
) -> Option<Path> {
    if start == goal {
        tracing::debug!(?start, "path query with start == goal rejected");
        return None;
    }
    if !grid.in_bounds(start) {
        return None;
    }
    // Unreachable goal cell: skip the search entirely
    let reachable_goal = grid
        .get_cell(goal)
        .map(|info| info.walkable)
        .unwrap_or(false);
    if !reachable_goal {
        return None;
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<HexCoord, HexCoord> = AHashMap::new();
    let mut g_scores: AHashMap<HexCoord, u32> = AHashMap::new();
    let mut next_seq: u64 = 0;

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        coord: start,
        g_cost: 0,
        f_cost: start.distance(&goal),
        seq: next_seq,
    });

    while let Some(current) = open_set.pop() {
        // Stale entry: a cheaper route to this cell was already expanded
        if current.g_cost > *g_scores.get(&current.coord).unwrap_or(&u32::MAX) {
            continue;
        }

        if current.coord == goal {
            return Some(reconstruct_path(&came_from, start, goal, current.g_cost));
        }

        for neighbor in current.coord.neighbors() {
            let Some(info) = grid.get_cell(neighbor) else {
                continue;
            };
            if !info.walkable || info.movement_cost >= IMPASSABLE_COST {
                continue;
            }

            let tentative_g = current.g_cost + info.movement_cost;
            if let Some(budget) = max_cost {
                if tentative_g > budget {
                    continue;
                }
            }

            let neighbor_g = *g_scores.get(&neighbor).unwrap_or(&u32::MAX);
            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);

                next_seq += 1;
                open_set.push(PathNode {
                    coord: neighbor,
                    g_cost: tentative_g,
                    f_cost: tentative_g + neighbor.distance(&goal),
                    seq: next_seq,
                });
            }
        }
    }

    None
}

/// Reconstruct the route from the came_from map
fn reconstruct_path(
    came_from: &AHashMap<HexCoord, HexCoord>,
    start: HexCoord,
    goal: HexCoord,
    cost: u32,
) -> Path {
    let mut steps = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        if prev == start {
            break;
        }
        steps.push(prev);
        current = prev;
    }
    steps.reverse();
    Path { steps, cost }
}

/// Recompute a route's cost from cell data
///
/// Agrees exactly with the cost accumulated by `find_path` for the same
/// steps. Missing cells count as impassable.
pub fn path_cost(grid: &HexGrid, steps: &[HexCoord]) -> u32 {
    steps
        .iter()
        .map(|coord| {
            grid.get_cell(*coord)
                .map(|info| info.movement_cost)
                .unwrap_or(IMPASSABLE_COST)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::terrain::Terrain;

    #[test]
    fn test_straight_line_uniform_cost() {
        let grid = HexGrid::new(10, 10);
        let start = HexCoord::new(0, 0);
        let goal = HexCoord::new(5, 0);

        let path = find_path(&grid, start, goal, None).unwrap();
        // Uniform cost 1: path length and cost both equal hex distance
        assert_eq!(path.len(), start.distance(&goal) as usize);
        assert_eq!(path.cost, start.distance(&goal));
        assert_eq!(path.destination(), Some(goal));
        // Origin excluded
        assert!(!path.steps.contains(&start));
    }

    #[test]
    fn test_same_start_goal_rejected() {
        let grid = HexGrid::new(10, 10);
        let coord = HexCoord::new(5, 5);
        assert!(find_path(&grid, coord, coord, None).is_none());
    }

    #[test]
    fn test_path_avoids_walls() {
        let mut grid = HexGrid::new(10, 10);
        grid.set_terrain(HexCoord::new(2, 0), Terrain::Wall);
        grid.set_terrain(HexCoord::new(2, 1), Terrain::Wall);

        let start = HexCoord::new(0, 0);
        let goal = HexCoord::new(5, 0);

        let path = find_path(&grid, start, goal, None).unwrap();
        assert!(!path.steps.contains(&HexCoord::new(2, 0)));
        assert!(!path.steps.contains(&HexCoord::new(2, 1)));
        assert_eq!(path.destination(), Some(goal));
    }

    #[test]
    fn test_no_path_when_goal_sealed() {
        let mut grid = HexGrid::new(10, 10);
        let goal = HexCoord::new(5, 5);
        for neighbor in goal.neighbors() {
            grid.set_terrain(neighbor, Terrain::Wall);
        }

        let path = find_path(&grid, HexCoord::new(0, 0), goal, None);
        assert!(path.is_none());
    }

    #[test]
    fn test_unwalkable_goal_rejected() {
        let mut grid = HexGrid::new(10, 10);
        let goal = HexCoord::new(5, 5);
        grid.set_terrain(goal, Terrain::Chasm);
        assert!(find_path(&grid, HexCoord::new(0, 0), goal, None).is_none());
    }

    #[test]
    fn test_prefers_cheap_terrain() {
        let mut grid = HexGrid::new(10, 10);
        // Make the direct corridor expensive
        grid.set_terrain(HexCoord::new(1, 0), Terrain::Mire);
        grid.set_terrain(HexCoord::new(2, 0), Terrain::Mire);
        grid.set_terrain(HexCoord::new(3, 0), Terrain::Mire);

        let start = HexCoord::new(0, 0);
        let goal = HexCoord::new(4, 0);
        let path = find_path(&grid, start, goal, None).unwrap();

        // Detour over floor beats wading straight through
        assert!(path.cost < 3 * Terrain::Mire.movement_cost() + 1);
        assert_eq!(path.cost, path_cost(&grid, &path.steps));
    }

    #[test]
    fn test_max_cost_prunes_expensive_routes() {
        let mut grid = HexGrid::new(3, 1);
        // Single corridor, middle cell expensive
        grid.set_terrain(HexCoord::new(1, 0), Terrain::Mire);

        let start = HexCoord::new(0, 0);
        let goal = HexCoord::new(2, 0);

        assert!(find_path(&grid, start, goal, Some(3)).is_none());
        let path = find_path(&grid, start, goal, Some(5)).unwrap();
        assert_eq!(path.cost, Terrain::Mire.movement_cost() + 1);
    }

    #[test]
    fn test_path_cost_agrees_with_search() {
        let mut grid = HexGrid::new(12, 12);
        grid.set_terrain(HexCoord::new(4, 2), Terrain::Rubble);
        grid.set_terrain(HexCoord::new(5, 2), Terrain::Rubble);
        grid.set_terrain(HexCoord::new(6, 3), Terrain::Mire);

        let path = find_path(&grid, HexCoord::new(0, 0), HexCoord::new(9, 4), None).unwrap();
        assert_eq!(path.cost, path_cost(&grid, &path.steps));
    }

    #[test]
    fn test_determinism_repeated_queries() {
        let mut grid = HexGrid::new(15, 15);
        grid.set_terrain(HexCoord::new(7, 3), Terrain::Wall);
        grid.set_terrain(HexCoord::new(7, 4), Terrain::Wall);
        grid.set_terrain(HexCoord::new(3, 8), Terrain::Rubble);

        let start = HexCoord::new(0, 0);
        let goal = HexCoord::new(12, 6);

        let first = find_path(&grid, start, goal, None).unwrap();
        for _ in 0..10 {
            let again = find_path(&grid, start, goal, None).unwrap();
            // Identical steps, not merely equal cost
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_prefix_costs_monotone() {
        let mut grid = HexGrid::new(12, 12);
        grid.set_terrain(HexCoord::new(2, 1), Terrain::Mire);

        let path = find_path(&grid, HexCoord::new(0, 0), HexCoord::new(8, 3), None).unwrap();
        let mut previous = 0;
        for end in 1..=path.len() {
            let prefix_cost = path_cost(&grid, &path.steps[..end]);
            assert!(prefix_cost > previous);
            previous = prefix_cost;
        }
        assert_eq!(previous, path.cost);
    }
}
