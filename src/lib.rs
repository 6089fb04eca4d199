//! River Hop - a lane-crossing arcade game
//!
//! Core modules:
//! - `sim`: Simulation (lane motion, collisions, homes, run state machine)
//! - `highscores`: Best score persistence
//! - `settings`: Player preferences
//! - `platform`: Input decoding for the browser shell
//! - `audio`: Audio cues (Web Audio playback on wasm)

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Largest dt accepted by a single tick (seconds). Longer frames are
    /// clamped so a suspended tab does not teleport the world.
    pub const MAX_FRAME_DT: f32 = 0.04;

    /// Logical grid
    pub const COLS: i32 = 14;
    pub const ROWS: i32 = 16;
    pub const HOME_ROW: i32 = 1;
    pub const SAFE_ROW: i32 = 7;
    pub const START_ROW: i32 = ROWS - 2;
    pub const START_COL: i32 = COLS / 2;

    /// River band (inclusive)
    pub const RIVER_FIRST_ROW: i32 = 2;
    pub const RIVER_LAST_ROW: i32 = 6;
    /// Road band (inclusive)
    pub const ROAD_FIRST_ROW: i32 = 8;
    pub const ROAD_LAST_ROW: i32 = 13;

    /// Entities wrap once they are this many tiles past either edge
    pub const WRAP_MARGIN: f32 = 4.0;

    /// Turtle submerge cycle
    pub const TURTLE_PHASE_RATE: f32 = 2.0; // radians per second
    pub const TURTLE_SURFACE_THRESHOLD: f32 = -0.7; // visible while sin(phase) > this

    /// Lane densities and spans
    pub const RIVER_DENSITY: usize = 5;
    pub const ROAD_DENSITY: usize = 6;
    pub const LOG_SIZE: i32 = 2;
    pub const TURTLE_SIZE: i32 = 3;
    pub const VEHICLE_SIZE: i32 = 1;

    /// Home slots
    pub const HOME_SLOTS: usize = 5;
    pub const SLOT_WIDTH: f32 = COLS as f32 / HOME_SLOTS as f32;

    /// Scoring
    pub const SLOT_POINTS: u64 = 50;
    pub const BONUS_POINTS: u64 = 100;
    pub const LEVEL_CLEAR_POINTS: u64 = 200;

    /// Run budget
    pub const START_LIVES: u8 = 3;
    pub const SLOT_TIME_BONUS: f32 = 10.0;
    pub const BASE_LEVEL_TIME: f32 = 45.0;
    pub const LEVEL_TIME_STEP: f32 = 3.0;
    pub const MIN_LEVEL_TIME: f32 = 30.0;

    /// Scheduled event delays (seconds of simulation time)
    pub const RESPAWN_DELAY: f64 = 0.3;
    pub const GAME_OVER_NOTICE_DELAY: f64 = 0.05;

    /// Bonus fly
    pub const FLY_SPAWN_CHANCE: f64 = 0.002; // per tick
    pub const FLY_SPEED: f32 = 0.35; // progress per second

    /// HUD turns the timer red at or below this many seconds
    pub const TIME_WARNING: f32 = 10.0;
}

/// Timer maximum for a level: shrinks by a few seconds per level down to a floor
#[inline]
pub fn level_time_limit(level: u32) -> f32 {
    use consts::*;
    let steps = level.max(1) - 1;
    (BASE_LEVEL_TIME - steps as f32 * LEVEL_TIME_STEP).max(MIN_LEVEL_TIME)
}
