use super::*;

impl MazeGame {
    /// Snapshot path toward the player's start; not refreshed until the next reset.
    pub(super) fn compute_ai_path(&mut self) {
        let path = find_path(&self.grid, self.ai.pos, self.player.pos);
        if path.is_empty() {
            tracing::warn!(
                from = ?self.ai.pos,
                to = ?self.player.pos,
                "no pursuit path found; agent will hold position"
            );
        } else {
            tracing::debug!(len = path.len(), "pursuit path computed");
        }
        self.ai.path = path.into();
    }

    pub(super) fn advance_ai(&mut self) {
        if self.mode != GameMode::Pursuit || self.ai.path.is_empty() {
            return;
        }
        self.ai.move_counter += self.ai.speed;
        if self.ai.move_counter < 1.0 {
            return;
        }
        self.ai.move_counter = 0.0;
        self.ai.path.pop_front();
        if let Some(next) = self.ai.path.front() {
            self.ai.pos = *next;
        }
    }

    pub(super) fn ai_distance(&self) -> Option<i32> {
        self.ai_position().map(|ai| manhattan(ai, self.player.pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pursuit_game(seed: u32) -> MazeGame {
        MazeGame::new(GameConfig {
            mode: GameMode::Pursuit,
            seed,
            ..GameConfig::default()
        })
        .expect("default config is valid")
    }

    #[test]
    fn path_is_not_recomputed_when_player_moves() {
        let mut game = pursuit_game(61);
        let planned = game.ai_path();
        game.player.pos = Coord::new(3, 3);
        for _ in 0..4 {
            game.step();
        }
        assert_eq!(game.ai_path(), planned[1..].to_vec());
        assert_eq!(planned.last(), Some(&game.config.player_start()));
    }

    #[test]
    fn agent_halts_at_the_end_of_its_path() {
        let mut game = pursuit_game(67);
        let goal = *game.ai.path.back().expect("pursuit path exists");
        game.ai.speed = 1.0;
        for _ in 0..(game.grid.len() * 2) {
            game.advance_ai();
        }
        assert_eq!(game.ai.pos, goal);
        assert!(game.ai.path.is_empty());
    }

    #[test]
    fn ai_distance_is_manhattan_in_pursuit_only() {
        let mut game = pursuit_game(71);
        game.player.pos = Coord::new(10, 4);
        assert_eq!(game.ai_distance(), Some(9 + 4));
        game.set_mode(GameMode::Normal);
        assert_eq!(game.ai_distance(), None);
    }
}
