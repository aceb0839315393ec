use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_COLS, DEFAULT_POWER_UP_COUNT, DEFAULT_ROWS, DEFAULT_TIME_LIMIT_SECS, MAX_GRID_SIDE,
};
use crate::error::ConfigError;
use crate::types::{Coord, GameMode};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: i32,
    pub cols: i32,
    #[serde(rename = "timeLimitSecs")]
    pub time_limit_secs: u32,
    #[serde(rename = "powerUpCount")]
    pub power_up_count: usize,
    pub mode: GameMode,
    pub seed: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            power_up_count: DEFAULT_POWER_UP_COUNT,
            mode: GameMode::Normal,
            seed: 0,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows <= 0 || self.cols <= 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.rows > MAX_GRID_SIDE || self.cols > MAX_GRID_SIDE {
            return Err(ConfigError::GridTooLarge {
                rows: self.rows,
                cols: self.cols,
                max: MAX_GRID_SIDE,
            });
        }
        let cells = (self.rows as usize) * (self.cols as usize);
        if cells < 2 {
            return Err(ConfigError::SingleCell);
        }
        if self.time_limit_secs == 0 {
            return Err(ConfigError::ZeroTimeLimit);
        }
        // player start and exit are never eligible
        let available = cells - 2;
        if self.power_up_count > available {
            return Err(ConfigError::TooManyPowerUps {
                requested: self.power_up_count,
                available,
            });
        }
        Ok(())
    }

    pub fn player_start(&self) -> Coord {
        Coord::new(0, 0)
    }

    pub fn exit(&self) -> Coord {
        Coord::new(self.rows - 1, self.cols - 1)
    }

    pub fn ai_start(&self) -> Coord {
        Coord::new(self.rows - 1, 0)
    }
}

pub fn parse_mode(raw: &str) -> Result<GameMode, ConfigError> {
    GameMode::parse(&raw.trim().to_ascii_lowercase())
        .ok_or_else(|| ConfigError::UnknownMode(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.exit(), Coord::new(19, 19));
        assert_eq!(config.ai_start(), Coord::new(19, 0));
    }

    #[test]
    fn rejects_degenerate_grids() {
        let mut config = GameConfig {
            rows: 0,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyGrid { .. })));

        config.rows = 1;
        config.cols = 1;
        config.power_up_count = 0;
        assert_eq!(config.validate(), Err(ConfigError::SingleCell));

        config.rows = MAX_GRID_SIDE + 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn rejects_power_ups_that_cannot_fit() {
        let config = GameConfig {
            rows: 2,
            cols: 2,
            power_up_count: 3,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooManyPowerUps {
                requested: 3,
                available: 2
            })
        );
    }

    #[test]
    fn rejects_zero_time_limit() {
        let config = GameConfig {
            time_limit_secs: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeLimit));
    }

    #[test]
    fn mode_parsing_is_lenient_about_case() {
        assert_eq!(parse_mode(" Pursuit "), Ok(GameMode::Pursuit));
        assert_eq!(parse_mode("normal"), Ok(GameMode::Normal));
        assert_eq!(
            parse_mode("chaos"),
            Err(ConfigError::UnknownMode("chaos".to_string()))
        );
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"rows": 8, "mode": "pursuit"}"#)
            .expect("config should parse");
        assert_eq!(config.rows, 8);
        assert_eq!(config.cols, DEFAULT_COLS);
        assert_eq!(config.mode, GameMode::Pursuit);
    }
}
