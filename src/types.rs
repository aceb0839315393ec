use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Normal,
    Pursuit,
}

impl GameMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(Self::Normal),
            "pursuit" | "ai" => Some(Self::Pursuit),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal Play",
            Self::Pursuit => "AI Opponent",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    Escaped,
    Caught,
    Timeout,
}

impl GameOverReason {
    pub fn is_win(self) -> bool {
        self == Self::Escaped
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Escaped => "You escaped!",
            Self::Caught => "Caught by AI!",
            Self::Timeout => "Time's up!",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub row: i32,
    pub col: i32,
    #[serde(rename = "speedBoost")]
    pub speed_boost: u32,
    #[serde(rename = "boostTicks")]
    pub boost_ticks: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct AiView {
    pub row: i32,
    pub col: i32,
    pub speed: f32,
    #[serde(rename = "moveCounter")]
    pub move_counter: f32,
    #[serde(rename = "pathRemaining")]
    pub path_remaining: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoundSummary {
    pub round: u64,
    pub reason: GameOverReason,
    pub score: u32,
    pub ticks: u64,
    #[serde(rename = "timeLeft")]
    pub time_left: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    PowerUpTaken {
        row: i32,
        col: i32,
        score: u32,
    },
    BoostExpired,
    AiSpeedUp {
        speed: f32,
    },
    RoundOver {
        summary: RoundSummary,
    },
    Reset {
        round: u64,
        mode: GameMode,
        #[serde(rename = "rngState")]
        rng_state: u32,
    },
}

/// Read-only view handed to the presentation side once per tick.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub round: u64,
    pub rows: i32,
    pub cols: i32,
    /// Row-major wall bitmasks, see [`crate::grid::Walls::mask`].
    pub walls: Vec<u8>,
    pub mode: GameMode,
    #[serde(rename = "modeLabel")]
    pub mode_label: &'static str,
    pub paused: bool,
    pub timer: u32,
    pub score: u32,
    pub player: PlayerView,
    #[serde(rename = "boostActive")]
    pub boost_active: bool,
    pub ai: Option<AiView>,
    #[serde(rename = "aiDistance")]
    pub ai_distance: Option<i32>,
    pub danger: bool,
    #[serde(rename = "powerUps")]
    pub power_ups: Vec<Coord>,
    pub exit: Coord,
    pub events: Vec<RuntimeEvent>,
}
