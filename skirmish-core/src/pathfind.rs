//! A* pathfinding on the 4-connected grid
//!
//! Uniform step cost, Chebyshev heuristic. Used by the evaluator to measure
//! how far each footman has to walk to reach an archer.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::grid::Cell;

/// Path length reported when the goal cannot be reached.
///
/// Larger than any real distance; callers treat it as "infinitely far".
pub const UNREACHABLE: u32 = u32::MAX;

/// Find a shortest path from `start` to `goal`, both inclusive.
///
/// Cells in `blocked` and cells outside `[0, width) x [0, height)` are never
/// entered. The start cell itself is not checked against `blocked`.
/// Returns `None` if the frontier empties before reaching the goal.
pub fn find_path(
    start: Cell,
    goal: Cell,
    blocked: &FxHashSet<Cell>,
    width: i32,
    height: i32,
) -> Option<Vec<Cell>> {
    if start == goal {
        return Some(vec![start]);
    }

    let in_bounds = |c: Cell| c.x >= 0 && c.x < width && c.y >= 0 && c.y < height;

    // Min-heap on (f, insertion sequence); equal f pops in insertion order
    let mut open_set: BinaryHeap<Reverse<(u32, u64, Cell)>> = BinaryHeap::new();
    let mut came_from: FxHashMap<Cell, Cell> = FxHashMap::default();
    let mut g_scores: FxHashMap<Cell, u32> = FxHashMap::default();
    let mut closed: FxHashSet<Cell> = FxHashSet::default();
    let mut seq = 0u64;

    g_scores.insert(start, 0);
    open_set.push(Reverse((start.chebyshev_to(goal), seq, start)));

    while let Some(Reverse((_, _, current))) = open_set.pop() {
        if current == goal {
            return Some(reconstruct_path(&came_from, current));
        }

        // Stale heap entry for an already expanded cell
        if !closed.insert(current) {
            continue;
        }

        let current_g = g_scores[&current];

        for neighbor in current.neighbors() {
            if !in_bounds(neighbor) || blocked.contains(&neighbor) || closed.contains(&neighbor) {
                continue;
            }

            let tentative_g = current_g + 1;
            let better = g_scores
                .get(&neighbor)
                .map_or(true, |&known| tentative_g < known);

            if better {
                came_from.insert(neighbor, current);
                g_scores.insert(neighbor, tentative_g);
                seq += 1;
                let f = tentative_g + neighbor.chebyshev_to(goal);
                open_set.push(Reverse((f, seq, neighbor)));
            }
        }
    }

    None
}

/// Number of steps on a shortest path, or [`UNREACHABLE`]
pub fn shortest_path_length(
    start: Cell,
    goal: Cell,
    blocked: &FxHashSet<Cell>,
    width: i32,
    height: i32,
) -> u32 {
    match find_path(start, goal, blocked, width, height) {
        Some(path) => (path.len() - 1) as u32,
        None => UNREACHABLE,
    }
}

/// Walk the parent chain back to the start
fn reconstruct_path(came_from: &FxHashMap<Cell, Cell>, mut current: Cell) -> Vec<Cell> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
