use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be positive: got {rows}x{cols}")]
    EmptyGrid { rows: i32, cols: i32 },
    #[error("grid side exceeds {max}: got {rows}x{cols}")]
    GridTooLarge { rows: i32, cols: i32, max: i32 },
    #[error("grid needs at least two cells so start and exit differ")]
    SingleCell,
    #[error("time limit must be at least one second")]
    ZeroTimeLimit,
    #[error("{requested} power-ups do not fit in {available} free cells")]
    TooManyPowerUps { requested: usize, available: usize },
    #[error("unknown game mode: {0}")]
    UnknownMode(String),
}
