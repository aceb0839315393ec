use std::collections::HashSet;

use super::*;

const RANDOM_PLACEMENT_ATTEMPTS: usize = 64;

impl MazeGame {
    /// Scatters power-ups on distinct cells, never on the player start or the exit.
    pub(super) fn place_power_ups(&mut self) {
        self.power_ups.clear();
        let mut taken = HashSet::from([self.config.player_start(), self.config.exit()]);
        // built on the first crowded pick, then drawn down
        let mut free: Option<Vec<Coord>> = None;

        for _ in 0..self.config.power_up_count {
            let picked = match free.as_mut() {
                Some(cells) => self.draw_free_cell(cells),
                None => match self.pick_random_cell(&taken) {
                    Some(pos) => Some(pos),
                    None => {
                        let cells = free.insert(self.collect_free_cells(&taken));
                        self.draw_free_cell(cells)
                    }
                },
            };
            let Some(pos) = picked else {
                tracing::warn!(
                    placed = self.power_ups.len(),
                    requested = self.config.power_up_count,
                    "ran out of free cells for power-ups"
                );
                break;
            };
            taken.insert(pos);
            self.power_ups.push(pos);
        }
    }

    fn pick_random_cell(&mut self, taken: &HashSet<Coord>) -> Option<Coord> {
        (0..RANDOM_PLACEMENT_ATTEMPTS)
            .map(|_| self.rng.coord(self.config.rows, self.config.cols))
            .find(|candidate| !taken.contains(candidate))
    }

    fn collect_free_cells(&self, taken: &HashSet<Coord>) -> Vec<Coord> {
        (0..self.grid.len())
            .filter_map(|idx| self.grid.coord_of(idx))
            .filter(|pos| !taken.contains(pos))
            .collect()
    }

    fn draw_free_cell(&mut self, cells: &mut Vec<Coord>) -> Option<Coord> {
        if cells.is_empty() {
            return None;
        }
        let idx = self.rng.pick_index(cells.len());
        Some(cells.swap_remove(idx))
    }
}
