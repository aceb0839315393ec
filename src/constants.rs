pub const TICK_RATE: u32 = 60;

pub const DEFAULT_ROWS: i32 = 20;
pub const DEFAULT_COLS: i32 = 20;
pub const MAX_GRID_SIDE: i32 = 512;
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 120;
pub const DEFAULT_POWER_UP_COUNT: usize = 5;

pub const BOOST_MAGNITUDE: u32 = 2;
pub const BOOST_DURATION_TICKS: u32 = 180;
pub const POWER_UP_REWARD: u32 = 10;

pub const AI_BASE_SPEED: f32 = 0.25;
pub const AI_SPEED_STEP: f32 = 0.05;
pub const AI_MAX_SPEED: f32 = 2.0;
pub const DIFFICULTY_INTERVAL_SECS: u32 = 10;
pub const DANGER_RADIUS: i32 = 3;

/// Cells moved per input event, two while a boost is running.
pub fn steps_for_boost(speed_boost: u32) -> u32 {
    if speed_boost > 0 {
        2
    } else {
        1
    }
}

pub fn next_ai_speed(current: f32) -> f32 {
    if current >= AI_MAX_SPEED {
        return AI_MAX_SPEED;
    }
    (current + AI_SPEED_STEP).min(AI_MAX_SPEED)
}
