use std::collections::VecDeque;

use crate::config::GameConfig;
use crate::constants::{
    next_ai_speed, steps_for_boost, AI_BASE_SPEED, AI_MAX_SPEED, BOOST_DURATION_TICKS,
    BOOST_MAGNITUDE, DANGER_RADIUS, DIFFICULTY_INTERVAL_SECS, POWER_UP_REWARD, TICK_RATE,
};
use crate::error::ConfigError;
use crate::grid::{step, Grid};
use crate::maze::generate_maze;
use crate::pathfinding::{find_path, manhattan};
use crate::rng::Rng;
use crate::types::{
    AiView, Coord, Direction, GameMode, GameOverReason, PlayerView, RoundSummary, RuntimeEvent,
    Snapshot,
};

mod ai_system;
mod spawn_system;

#[derive(Clone, Debug)]
struct PlayerInternal {
    pos: Coord,
    speed_boost: u32,
    boost_ticks: u32,
}

impl PlayerInternal {
    fn at(pos: Coord) -> Self {
        Self {
            pos,
            speed_boost: 0,
            boost_ticks: 0,
        }
    }
}

#[derive(Clone, Debug)]
struct AiInternal {
    pos: Coord,
    /// Front is the cell the agent currently stands on.
    path: VecDeque<Coord>,
    speed: f32,
    move_counter: f32,
}

impl AiInternal {
    fn at(pos: Coord) -> Self {
        Self {
            pos,
            path: VecDeque::new(),
            speed: AI_BASE_SPEED,
            move_counter: 0.0,
        }
    }
}

/// Single-player maze round: timer, power-ups, optional pursuing agent.
///
/// All mutable game state lives here. Callers drive it with [`MazeGame::step`]
/// once per display frame and feed input through [`MazeGame::move_player`],
/// [`MazeGame::toggle_pause`], [`MazeGame::reset`] and [`MazeGame::set_mode`].
/// A finished round is reported by the call that ended it and the game is
/// reset before that call returns.
#[derive(Clone, Debug)]
pub struct MazeGame {
    pub config: GameConfig,

    grid: Grid,
    rng: Rng,
    mode: GameMode,
    player: PlayerInternal,
    ai: AiInternal,
    power_ups: Vec<Coord>,
    events: Vec<RuntimeEvent>,

    timer: u32,
    frame: u64,
    score: u32,
    paused: bool,
    round: u64,
    last_summary: Option<RoundSummary>,
}

impl MazeGame {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let rng = Rng::new(config.seed);
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: GameConfig, rng: Rng) -> Result<Self, ConfigError> {
        config.validate()?;
        let player_start = config.player_start();
        let ai_start = config.ai_start();
        let mut game = Self {
            grid: Grid::new(config.rows, config.cols),
            rng,
            mode: config.mode,
            player: PlayerInternal::at(player_start),
            ai: AiInternal::at(ai_start),
            power_ups: Vec::new(),
            events: Vec::new(),
            timer: config.time_limit_secs,
            frame: 0,
            score: 0,
            paused: false,
            round: 0,
            last_summary: None,
            config,
        };
        game.reset();
        Ok(game)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn exit(&self) -> Coord {
        self.config.exit()
    }

    pub fn player_position(&self) -> Coord {
        self.player.pos
    }

    pub fn boost_active(&self) -> bool {
        self.player.speed_boost > 0
    }

    pub fn ai_position(&self) -> Option<Coord> {
        (self.mode == GameMode::Pursuit).then_some(self.ai.pos)
    }

    pub fn ai_speed(&self) -> Option<f32> {
        (self.mode == GameMode::Pursuit).then_some(self.ai.speed)
    }

    /// Remaining pursuit path, current cell first.
    pub fn ai_path(&self) -> Vec<Coord> {
        self.ai.path.iter().copied().collect()
    }

    pub fn power_ups(&self) -> &[Coord] {
        &self.power_ups
    }

    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    pub fn last_summary(&self) -> Option<&RoundSummary> {
        self.last_summary.as_ref()
    }

    /// Advances one frame. Does nothing while paused.
    pub fn step(&mut self) -> Option<RoundSummary> {
        if self.paused {
            return None;
        }
        self.frame += 1;
        self.update_timer();
        self.update_boost();
        self.advance_ai();
        self.check_game_over()
    }

    /// Moves one cell, or two while boosted. Ignored while paused.
    pub fn move_player(&mut self, dir: Direction) -> Option<RoundSummary> {
        if self.paused {
            return None;
        }
        let steps = steps_for_boost(self.player.speed_boost);
        for _ in 0..steps {
            if !self.grid.can_move(self.player.pos, dir) {
                break;
            }
            self.player.pos = step(self.player.pos, dir);
        }
        self.apply_power_up_pickup();
        self.check_game_over()
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        tracing::debug!(paused = self.paused, "pause toggled");
        self.paused
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.config.mode = mode;
        self.reset();
    }

    /// Starts a fresh round: new maze, actors back at their starts, timer and
    /// score restored, power-ups re-placed, pursuit path recomputed.
    pub fn reset(&mut self) {
        let rng_state = self.rng.state();
        self.round += 1;
        self.player = PlayerInternal::at(self.config.player_start());
        self.ai = AiInternal::at(self.config.ai_start());
        self.timer = self.config.time_limit_secs;
        self.score = 0;
        self.frame = 0;
        self.paused = false;

        generate_maze(&mut self.grid, &mut self.rng, self.config.player_start());
        self.place_power_ups();
        if self.mode == GameMode::Pursuit {
            self.compute_ai_path();
        }

        self.events.push(RuntimeEvent::Reset {
            round: self.round,
            mode: self.mode,
            rng_state,
        });
        tracing::debug!(round = self.round, mode = ?self.mode, rng_state, "round reset");
    }

    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        let ai_distance = self.ai_distance();
        Snapshot {
            tick: self.frame,
            round: self.round,
            rows: self.grid.rows(),
            cols: self.grid.cols(),
            walls: self.grid.wall_masks(),
            mode: self.mode,
            mode_label: self.mode.label(),
            paused: self.paused,
            timer: self.timer,
            score: self.score,
            player: PlayerView {
                row: self.player.pos.row,
                col: self.player.pos.col,
                speed_boost: self.player.speed_boost,
                boost_ticks: self.player.boost_ticks,
            },
            boost_active: self.boost_active(),
            ai: (self.mode == GameMode::Pursuit).then(|| AiView {
                row: self.ai.pos.row,
                col: self.ai.pos.col,
                speed: self.ai.speed,
                move_counter: self.ai.move_counter,
                path_remaining: self.ai.path.len(),
            }),
            ai_distance,
            danger: ai_distance.map(|d| d <= DANGER_RADIUS).unwrap_or(false),
            power_ups: self.power_ups.clone(),
            exit: self.exit(),
            events: if include_events {
                std::mem::take(&mut self.events)
            } else {
                Vec::new()
            },
        }
    }

    fn update_timer(&mut self) {
        if !self.frame.is_multiple_of(TICK_RATE as u64) || self.timer == 0 {
            return;
        }
        self.timer -= 1;
        let elapsed = self.config.time_limit_secs.saturating_sub(self.timer);
        if self.mode == GameMode::Pursuit
            && elapsed.is_multiple_of(DIFFICULTY_INTERVAL_SECS)
            && self.ai.speed < AI_MAX_SPEED
        {
            self.ai.speed = next_ai_speed(self.ai.speed);
            self.events.push(RuntimeEvent::AiSpeedUp {
                speed: self.ai.speed,
            });
        }
    }

    fn update_boost(&mut self) {
        if self.player.boost_ticks == 0 {
            return;
        }
        self.player.boost_ticks -= 1;
        if self.player.boost_ticks == 0 {
            self.player.speed_boost = 0;
            self.events.push(RuntimeEvent::BoostExpired);
        }
    }

    fn apply_power_up_pickup(&mut self) {
        let Some(idx) = self.power_ups.iter().position(|p| *p == self.player.pos) else {
            return;
        };
        let taken = self.power_ups.remove(idx);
        self.player.speed_boost = BOOST_MAGNITUDE;
        self.player.boost_ticks = BOOST_DURATION_TICKS;
        self.score += POWER_UP_REWARD;
        self.events.push(RuntimeEvent::PowerUpTaken {
            row: taken.row,
            col: taken.col,
            score: self.score,
        });
        tracing::debug!(row = taken.row, col = taken.col, score = self.score, "power-up taken");
    }

    fn check_game_over(&mut self) -> Option<RoundSummary> {
        let reason = if self.player.pos == self.exit() {
            GameOverReason::Escaped
        } else if self.mode == GameMode::Pursuit && self.player.pos == self.ai.pos {
            GameOverReason::Caught
        } else if self.timer == 0 {
            GameOverReason::Timeout
        } else {
            return None;
        };

        let summary = RoundSummary {
            round: self.round,
            reason,
            score: self.score,
            ticks: self.frame,
            time_left: self.timer,
        };
        tracing::info!(
            round = summary.round,
            reason = ?reason,
            score = summary.score,
            "{} Score: {}",
            reason.message(),
            summary.score
        );
        self.events.push(RuntimeEvent::RoundOver {
            summary: summary.clone(),
        });
        self.last_summary = Some(summary.clone());
        self.reset();
        Some(summary)
    }
}
