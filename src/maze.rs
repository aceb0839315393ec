use crate::grid::Grid;
use crate::rng::Rng;
use crate::types::Coord;

/// Carves a perfect maze into `grid` with a randomized depth-first backtracker.
///
/// The grid is reset first, so the call can be repeated on the same grid.
/// Backtracking uses an explicit stack instead of recursion, which keeps large
/// grids off the call stack. Returns the number of walls removed, which is
/// `rows * cols - 1` whenever `start` lies on the grid.
pub fn generate_maze(grid: &mut Grid, rng: &mut Rng, start: Coord) -> usize {
    grid.reset_walls();
    if !grid.contains(start) {
        return 0;
    }

    let mut carved = 0;
    let mut stack = Vec::with_capacity(grid.len());
    grid.mark_visited(start);
    stack.push(start);

    while let Some(&current) = stack.last() {
        let candidates = grid.unvisited_neighbors(current);
        if candidates.is_empty() {
            stack.pop();
            continue;
        }
        let next = candidates[rng.pick_index(candidates.len())];
        grid.mark_visited(next);
        if grid.remove_wall_between(current, next) {
            carved += 1;
        }
        stack.push(next);
    }

    tracing::debug!(
        rows = grid.rows(),
        cols = grid.cols(),
        carved,
        "maze generated"
    );
    carved
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use super::*;
    use crate::types::Direction;

    fn reachable_from(grid: &Grid, start: Coord) -> HashSet<Coord> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        seen.insert(start);
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            for next in grid.open_neighbors(current) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    fn assert_walls_symmetric(grid: &Grid) {
        for cell in grid.cells() {
            let here = cell.coord();
            for dir in Direction::ALL {
                let Some(there) = grid.neighbor_at(here, dir) else {
                    assert!(grid.has_wall(here, dir), "border wall missing at {here:?}");
                    continue;
                };
                assert_eq!(
                    grid.has_wall(here, dir),
                    grid.has_wall(there, dir.opposite()),
                    "asymmetric wall between {here:?} and {there:?}"
                );
            }
        }
    }

    #[test]
    fn every_seed_carves_a_spanning_tree() {
        for seed in 0..200u32 {
            let mut grid = Grid::new(12, 9);
            let mut rng = Rng::new(seed);
            let carved = generate_maze(&mut grid, &mut rng, Coord::new(0, 0));

            assert_eq!(carved, 12 * 9 - 1, "seed={seed}");
            assert_eq!(grid.passage_count(), carved, "seed={seed}");
            assert_eq!(reachable_from(&grid, Coord::new(5, 5)).len(), grid.len());
            assert!(grid.cells().iter().all(|cell| cell.visited));
            assert_walls_symmetric(&grid);
        }
    }

    #[test]
    fn default_board_has_399_passages() {
        let mut grid = Grid::new(20, 20);
        let mut rng = Rng::new(2024);
        assert_eq!(generate_maze(&mut grid, &mut rng, Coord::new(0, 0)), 399);
        assert_eq!(reachable_from(&grid, Coord::new(19, 19)).len(), 400);
    }

    #[test]
    fn regeneration_on_a_used_grid_is_still_perfect() {
        let mut grid = Grid::new(10, 10);
        let mut rng = Rng::new(5);
        for _ in 0..20 {
            assert_eq!(generate_maze(&mut grid, &mut rng, Coord::new(0, 0)), 99);
            assert_eq!(grid.passage_count(), 99);
            assert_walls_symmetric(&grid);
        }
    }

    #[test]
    fn same_seed_carves_same_maze() {
        let mut a = Grid::new(15, 15);
        let mut b = Grid::new(15, 15);
        generate_maze(&mut a, &mut Rng::new(77), Coord::new(0, 0));
        generate_maze(&mut b, &mut Rng::new(77), Coord::new(0, 0));
        assert_eq!(a.wall_masks(), b.wall_masks());

        let mut c = Grid::new(15, 15);
        generate_maze(&mut c, &mut Rng::new(78), Coord::new(0, 0));
        assert_ne!(a.wall_masks(), c.wall_masks());
    }

    #[test]
    fn single_row_and_single_column_grids_become_corridors() {
        let mut row = Grid::new(1, 8);
        assert_eq!(generate_maze(&mut row, &mut Rng::new(1), Coord::new(0, 0)), 7);
        let mut col = Grid::new(8, 1);
        assert_eq!(generate_maze(&mut col, &mut Rng::new(1), Coord::new(0, 0)), 7);
    }

    #[test]
    fn off_grid_start_carves_nothing() {
        let mut grid = Grid::new(4, 4);
        assert_eq!(generate_maze(&mut grid, &mut Rng::new(1), Coord::new(4, 0)), 0);
        assert_eq!(grid.passage_count(), 0);
    }
}
