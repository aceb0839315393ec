use chrono::{SecondsFormat, Utc};
use clap::Parser;
use maze_chase::config::{parse_mode, GameConfig};
use maze_chase::constants::{
    DEFAULT_COLS, DEFAULT_POWER_UP_COUNT, DEFAULT_ROWS, DEFAULT_TIME_LIMIT_SECS, TICK_RATE,
};
use maze_chase::engine::MazeGame;
use maze_chase::error::ConfigError;
use maze_chase::grid::direction_between;
use maze_chase::pathfinding::find_path;
use maze_chase::types::{Direction, GameMode, GameOverReason, RuntimeEvent, Snapshot};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless maze rounds driven by an autopilot player")]
struct Cli {
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: i32,
    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: i32,
    #[arg(long, default_value_t = DEFAULT_TIME_LIMIT_SECS)]
    time_limit: u32,
    #[arg(long, default_value_t = DEFAULT_POWER_UP_COUNT)]
    power_ups: usize,
    #[arg(long, default_value = "normal")]
    mode: String,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 3)]
    rounds: u32,
    /// Frames between autopilot moves.
    #[arg(long, default_value_t = 8)]
    autopilot_interval: u64,
    /// Safety cap on frames per round; defaults to the time limit plus one second.
    #[arg(long)]
    max_ticks: Option<u64>,
    #[arg(long)]
    match_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
    #[arg(long)]
    print_maze: bool,
}

#[derive(Clone, Debug, Serialize)]
struct RoundResultLine {
    round: u64,
    seed: u32,
    mode: GameMode,
    reason: Option<GameOverReason>,
    score: u32,
    ticks: u64,
    #[serde(rename = "timeLeft")]
    time_left: u32,
    #[serde(rename = "powerUpsTaken")]
    power_ups_taken: u32,
    #[serde(rename = "aiSpeedUps")]
    ai_speed_ups: u32,
    #[serde(rename = "playerMoves")]
    player_moves: u32,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "matchId")]
    match_id: String,
    #[serde(rename = "startedAt")]
    started_at: String,
    #[serde(rename = "finishedAt")]
    finished_at: String,
    config: GameConfig,
    #[serde(rename = "roundCount")]
    round_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageScore")]
    average_score: f64,
    #[serde(rename = "averageTicks")]
    average_ticks: u64,
    #[serde(rename = "reasonCounts")]
    reason_counts: BTreeMap<String, usize>,
    rounds: Vec<RoundResultLine>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "invalid configuration");
            std::process::exit(2);
        }
    };
    let match_id = cli
        .match_id
        .clone()
        .unwrap_or_else(|| default_match_id(config.seed, Utc::now().timestamp_millis()));
    let started_at = now_iso();
    let max_ticks = cli
        .max_ticks
        .unwrap_or((config.time_limit_secs as u64 + 1) * TICK_RATE as u64);

    let mut game = match MazeGame::new(config.clone()) {
        Ok(game) => game,
        Err(error) => {
            tracing::error!(%error, "could not start game");
            std::process::exit(2);
        }
    };
    tracing::info!(
        match_id = %match_id,
        seed = config.seed,
        mode = ?config.mode,
        rows = config.rows,
        cols = config.cols,
        "run started"
    );

    let mut results = Vec::new();
    let mut anomaly_count = 0usize;
    for _ in 0..cli.rounds {
        if cli.print_maze {
            print!("{}", render_round(&game));
        }
        let (result, records) = run_round(&mut game, cli.autopilot_interval.max(1), max_ticks);
        for record in &records {
            tracing::warn!(
                round = result.round,
                tick = record.tick,
                detail = %record.message,
                "anomaly detected"
            );
        }
        anomaly_count += records.len();
        tracing::info!(
            round = result.round,
            reason = ?result.reason,
            score = result.score,
            ticks = result.ticks,
            "round finished"
        );
        match serde_json::to_string(&result) {
            Ok(line) => println!("{line}"),
            Err(error) => tracing::error!(%error, "round result did not serialize"),
        }
        results.push(result);
    }

    let summary = build_run_summary(match_id, started_at, now_iso(), config, results, anomaly_count);
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            tracing::error!(path = %path.display(), %error, "summary write failed");
            std::process::exit(2);
        }
        tracing::info!(path = %path.display(), "summary written");
    }

    tracing::info!(
        rounds = summary.round_count,
        anomalies = summary.anomaly_count,
        average_score = summary.average_score,
        "run finished"
    );
    if summary.anomaly_count > 0 {
        std::process::exit(1);
    }
}

fn build_config(cli: &Cli) -> Result<GameConfig, ConfigError> {
    let seed = normalize_seed(cli.seed.unwrap_or_else(|| rand::random::<u32>() as u64));
    let config = GameConfig {
        rows: cli.rows,
        cols: cli.cols,
        time_limit_secs: cli.time_limit,
        power_up_count: cli.power_ups,
        mode: parse_mode(&cli.mode)?,
        seed,
    };
    config.validate()?;
    Ok(config)
}

fn normalize_seed(seed: u64) -> u32 {
    seed as u32
}

/// Plays one round to completion, or until `max_ticks` frames pass.
fn run_round(
    game: &mut MazeGame,
    autopilot_interval: u64,
    max_ticks: u64,
) -> (RoundResultLine, Vec<AnomalyRecord>) {
    let round = game.round();
    let mut anomaly_log = AnomalyLog::default();
    let mut power_ups_taken = 0;
    let mut ai_speed_ups = 0;
    let mut player_moves = 0;
    let mut frames = 0u64;
    let mut outcome = None;

    while outcome.is_none() {
        frames += 1;
        if frames > max_ticks {
            anomaly_log.record(frames, "tick safety limit exceeded".to_string());
            break;
        }

        if frames.is_multiple_of(autopilot_interval) {
            if let Some(dir) = autopilot_direction(game) {
                player_moves += 1;
                outcome = game.move_player(dir);
            }
        }
        if outcome.is_none() {
            outcome = game.step();
        }

        let snapshot = game.build_snapshot(true);
        for event in &snapshot.events {
            match event {
                RuntimeEvent::PowerUpTaken { .. } => power_ups_taken += 1,
                RuntimeEvent::AiSpeedUp { .. } => ai_speed_ups += 1,
                _ => {}
            }
        }
        for message in collect_snapshot_anomalies(&snapshot, &game.config) {
            anomaly_log.record(frames, message);
        }
    }

    let (anomalies, records) = anomaly_log.into_parts();
    let result = match outcome {
        Some(summary) => RoundResultLine {
            round,
            seed: game.config.seed,
            mode: game.mode(),
            reason: Some(summary.reason),
            score: summary.score,
            ticks: summary.ticks,
            time_left: summary.time_left,
            power_ups_taken,
            ai_speed_ups,
            player_moves,
            anomalies,
        },
        None => {
            let result = RoundResultLine {
                round,
                seed: game.config.seed,
                mode: game.mode(),
                reason: None,
                score: game.score(),
                ticks: game.frame(),
                time_left: game.timer(),
                power_ups_taken,
                ai_speed_ups,
                player_moves,
                anomalies,
            };
            game.reset();
            result
        }
    };
    (result, records)
}

/// First step of the shortest route from the player to the exit.
fn autopilot_direction(game: &MazeGame) -> Option<Direction> {
    let path = find_path(game.grid(), game.player_position(), game.exit());
    match path.as_slice() {
        [from, to, ..] => direction_between(*from, *to),
        _ => None,
    }
}

fn collect_snapshot_anomalies(snapshot: &Snapshot, config: &GameConfig) -> Vec<String> {
    let mut anomalies = Vec::new();
    let in_bounds =
        |row: i32, col: i32| row >= 0 && col >= 0 && row < snapshot.rows && col < snapshot.cols;

    if !in_bounds(snapshot.player.row, snapshot.player.col) {
        anomalies.push(format!(
            "player out of bounds: ({}, {})",
            snapshot.player.row, snapshot.player.col
        ));
    }
    if let Some(ai) = &snapshot.ai {
        if !in_bounds(ai.row, ai.col) {
            anomalies.push(format!("ai out of bounds: ({}, {})", ai.row, ai.col));
        }
    }
    if snapshot.power_ups.len() > config.power_up_count {
        anomalies.push(format!(
            "too many power-ups: {} > {}",
            snapshot.power_ups.len(),
            config.power_up_count
        ));
    }
    if snapshot.timer > config.time_limit_secs {
        anomalies.push(format!("timer above limit: {}", snapshot.timer));
    }
    if snapshot.walls.len() != (snapshot.rows * snapshot.cols) as usize {
        anomalies.push("wall topology size mismatch".to_string());
    }
    anomalies
}

/// Every anomaly occurrence, plus each distinct message once in first-seen order.
#[derive(Debug, Default)]
struct AnomalyLog {
    records: Vec<AnomalyRecord>,
    distinct: Vec<String>,
    seen: HashSet<String>,
}

impl AnomalyLog {
    fn record(&mut self, tick: u64, message: String) {
        if self.seen.insert(message.clone()) {
            self.distinct.push(message.clone());
        }
        self.records.push(AnomalyRecord { tick, message });
    }

    fn into_parts(self) -> (Vec<String>, Vec<AnomalyRecord>) {
        (self.distinct, self.records)
    }
}

fn render_round(game: &MazeGame) -> String {
    let player = game.player_position();
    let exit = game.exit();
    let ai = game.ai_position();
    let power_ups = game.power_ups();
    game.grid().render_ascii(|coord| {
        if coord == player {
            Some('P')
        } else if Some(coord) == ai {
            Some('A')
        } else if coord == exit {
            Some('E')
        } else if power_ups.contains(&coord) {
            Some('*')
        } else {
            None
        }
    })
}

fn default_match_id(seed: u32, timestamp_ms: i64) -> String {
    format!("maze-{seed}-{timestamp_ms}")
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn build_run_summary(
    match_id: String,
    started_at: String,
    finished_at: String,
    config: GameConfig,
    rounds: Vec<RoundResultLine>,
    anomaly_count: usize,
) -> RunSummary {
    let round_count = rounds.len();
    let mut reason_counts: BTreeMap<String, usize> = BTreeMap::new();
    for round in &rounds {
        *reason_counts
            .entry(game_over_reason_key(round.reason))
            .or_insert(0) += 1;
    }
    let (average_score, average_ticks) = if round_count == 0 {
        (0.0, 0)
    } else {
        let total_score: u64 = rounds.iter().map(|r| r.score as u64).sum();
        let total_ticks: u64 = rounds.iter().map(|r| r.ticks).sum();
        (
            total_score as f64 / round_count as f64,
            total_ticks / round_count as u64,
        )
    };
    RunSummary {
        match_id,
        started_at,
        finished_at,
        config,
        round_count,
        anomaly_count,
        average_score,
        average_ticks,
        reason_counts,
        rounds,
    }
}

fn game_over_reason_key(reason: Option<GameOverReason>) -> String {
    match reason {
        Some(GameOverReason::Escaped) => "escaped",
        Some(GameOverReason::Caught) => "caught",
        Some(GameOverReason::Timeout) => "timeout",
        None => "unfinished",
    }
    .to_string()
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    std::fs::write(path, summary_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_round_result(reason: Option<GameOverReason>, score: u32, ticks: u64) -> RoundResultLine {
        RoundResultLine {
            round: 1,
            seed: 42,
            mode: GameMode::Normal,
            reason,
            score,
            ticks,
            time_left: 0,
            power_ups_taken: 0,
            ai_speed_ups: 0,
            player_moves: 0,
            anomalies: Vec::new(),
        }
    }

    fn make_game(mode: GameMode, seed: u32) -> MazeGame {
        MazeGame::new(GameConfig {
            mode,
            seed,
            ..GameConfig::default()
        })
        .expect("default config is valid")
    }

    #[test]
    fn default_match_id_contains_seed_and_timestamp() {
        assert_eq!(default_match_id(42, 123456789), "maze-42-123456789");
    }

    #[test]
    fn build_run_summary_averages_and_counts_reasons() {
        let summary = build_run_summary(
            "maze-42-1".to_string(),
            "a".to_string(),
            "b".to_string(),
            GameConfig::default(),
            vec![
                make_round_result(Some(GameOverReason::Escaped), 20, 600),
                make_round_result(Some(GameOverReason::Timeout), 10, 900),
                make_round_result(None, 0, 0),
            ],
            0,
        );
        assert_eq!(summary.round_count, 3);
        assert_eq!(summary.average_ticks, 500);
        assert!((summary.average_score - 10.0).abs() < 1e-9);
        assert_eq!(summary.reason_counts.get("escaped"), Some(&1));
        assert_eq!(summary.reason_counts.get("timeout"), Some(&1));
        assert_eq!(summary.reason_counts.get("unfinished"), Some(&1));
    }

    #[test]
    fn autopilot_escapes_in_normal_mode() {
        let mut game = make_game(GameMode::Normal, 7);
        let (result, records) = run_round(&mut game, 1, 60 * 200);
        assert!(records.is_empty(), "{records:?}");
        assert_eq!(result.reason, Some(GameOverReason::Escaped));
        assert_eq!(result.round, 1);
        assert_eq!(game.round(), 2);
    }

    #[test]
    fn autopilot_walks_toward_exit() {
        let game = make_game(GameMode::Normal, 9);
        let dir = autopilot_direction(&game).expect("start is not the exit");
        assert!(game.grid().can_move(game.player_position(), dir));
    }

    #[test]
    fn safety_limit_flags_an_anomaly() {
        let mut game = make_game(GameMode::Normal, 3);
        let (result, records) = run_round(&mut game, 1_000_000, 5);
        assert_eq!(result.reason, None);
        assert_eq!(result.anomalies, vec!["tick safety limit exceeded".to_string()]);
        assert_eq!(records.len(), 1);
        assert_eq!(game.round(), 2);
    }

    #[test]
    fn config_from_cli_rejects_unknown_mode() {
        let cli = Cli::parse_from(["simulate", "--mode", "chaos", "--seed", "1"]);
        assert_eq!(
            build_config(&cli),
            Err(ConfigError::UnknownMode("chaos".to_string()))
        );

        let cli = Cli::parse_from(["simulate", "--mode", "pursuit", "--seed", "5", "--rows", "8"]);
        let config = build_config(&cli).expect("valid flags");
        assert_eq!(config.mode, GameMode::Pursuit);
        assert_eq!(config.rows, 8);
        assert_eq!(config.seed, 5);
    }

    #[test]
    fn rendered_round_marks_actors() {
        let game = make_game(GameMode::Pursuit, 11);
        let art = render_round(&game);
        assert_eq!(art.matches('P').count(), 1);
        assert_eq!(art.matches('A').count(), 1);
        assert_eq!(art.matches('E').count(), 1);
        let hidden_by_ai = game
            .power_ups()
            .iter()
            .filter(|p| Some(**p) == game.ai_position())
            .count();
        assert_eq!(art.matches('*').count(), game.power_ups().len() - hidden_by_ai);
    }

    #[test]
    fn write_summary_returns_error_when_parent_does_not_exist() {
        let target = std::env::temp_dir()
            .join(format!("maze-chase-missing-{}", Utc::now().timestamp_millis()))
            .join("summary.json");
        let summary = build_run_summary(
            "maze-1-1".to_string(),
            now_iso(),
            now_iso(),
            GameConfig::default(),
            vec![make_round_result(Some(GameOverReason::Timeout), 0, 7_200)],
            0,
        );
        assert!(write_summary(&target, &summary).is_err());
    }

    #[test]
    fn anomaly_log_keeps_every_occurrence_but_lists_messages_once() {
        let mut log = AnomalyLog::default();
        log.record(10, "same".to_string());
        log.record(11, "other".to_string());
        log.record(12, "same".to_string());

        let (distinct, records) = log.into_parts();
        assert_eq!(distinct, vec!["same".to_string(), "other".to_string()]);
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].tick, 12);
        assert_eq!(records[2].message, "same");
    }
}
