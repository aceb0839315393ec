use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::grid::Grid;
use crate::types::Coord;

pub fn manhattan(a: Coord, b: Coord) -> i32 {
    (a.row - b.row).abs() + (a.col - b.col).abs()
}

/// A* over the maze's open passages with a Manhattan heuristic.
///
/// Returns the cells from `start` to `goal` inclusive, or an empty vector when
/// either end is off the grid or the goal is unreachable. Frontier entries with
/// equal `f` pop in insertion order, so results are reproducible.
pub fn find_path(grid: &Grid, start: Coord, goal: Coord) -> Vec<Coord> {
    let (Some(start_idx), Some(goal_idx)) = (
        grid.linear_index(start.row, start.col),
        grid.linear_index(goal.row, goal.col),
    ) else {
        return Vec::new();
    };

    let mut g_score = vec![u32::MAX; grid.len()];
    let mut came_from: Vec<Option<usize>> = vec![None; grid.len()];
    let mut closed = vec![false; grid.len()];
    let mut open = BinaryHeap::<(Reverse<u32>, Reverse<u64>, usize)>::new();
    let mut sequence = 0u64;

    g_score[start_idx] = 0;
    open.push((Reverse(manhattan(start, goal) as u32), Reverse(sequence), start_idx));

    while let Some((_, _, current_idx)) = open.pop() {
        if closed[current_idx] {
            continue;
        }
        if current_idx == goal_idx {
            return rebuild_path(grid, &came_from, current_idx);
        }
        closed[current_idx] = true;

        let Some(current) = grid.coord_of(current_idx) else {
            continue;
        };
        let tentative_g = g_score[current_idx].saturating_add(1);
        for neighbor in grid.open_neighbors(current) {
            let Some(neighbor_idx) = grid.linear_index(neighbor.row, neighbor.col) else {
                continue;
            };
            if closed[neighbor_idx] || tentative_g >= g_score[neighbor_idx] {
                continue;
            }
            came_from[neighbor_idx] = Some(current_idx);
            g_score[neighbor_idx] = tentative_g;
            sequence += 1;
            let f = tentative_g + manhattan(neighbor, goal) as u32;
            open.push((Reverse(f), Reverse(sequence), neighbor_idx));
        }
    }

    Vec::new()
}

fn rebuild_path(grid: &Grid, came_from: &[Option<usize>], goal_idx: usize) -> Vec<Coord> {
    let mut path = Vec::new();
    let mut cursor = Some(goal_idx);
    while let Some(idx) = cursor {
        if let Some(coord) = grid.coord_of(idx) {
            path.push(coord);
        }
        cursor = came_from[idx];
    }
    path.reverse();
    path
}
