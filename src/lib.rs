//! Block Dash - a canvas dodge-and-dash arcade game
//!
//! Core modules:
//! - `sim`: Per-frame simulation (entities, collisions, levels)
//! - `game`: Session lifecycle, game-over and replay handling
//! - `leaderboard`: Ranked, persisted session results
//! - `persistence`: Key-value storage backends
//! - `renderer`: Draw-surface abstraction
//! - `platform`: Clock and frame scheduling
//! - `settings`: Data-driven game tuning

pub mod error;
pub mod game;
pub mod input;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{GameError, GameResult};
pub use game::{FrameOutcome, Game, GameSummary, Phase};
pub use input::{DirectionFlags, InputState};
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use settings::Settings;

/// Game configuration constants
///
/// These are the defaults behind [`Settings`]; gameplay code reads the
/// settings, never these directly.
pub mod consts {
    /// Fixed simulation timestep (one animation frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per animation frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 400.0;

    /// Avatar defaults
    pub const AVATAR_SIZE: f32 = 20.0;
    pub const AVATAR_START: (f32, f32) = (50.0, 300.0);
    /// Distance moved per frame for each held direction
    pub const AVATAR_STEP: f32 = 5.0;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 20.0;
    pub const ENEMY_START: (f32, f32) = (750.0, 300.0);

    /// Block defaults
    pub const BLOCK_COUNT: usize = 5;
    pub const BLOCK_WIDTH: f32 = 50.0;
    pub const BLOCK_HEIGHT: f32 = 20.0;

    /// Difficulty curve: speed = BASE + SPEED_INCREMENT * (level - 1)
    pub const BASE_BLOCK_SPEED: f32 = 2.0;
    pub const BASE_ENEMY_SPEED: f32 = 2.0;
    pub const SPEED_INCREMENT: f32 = 0.5;

    /// Number of leaderboard rows shown
    pub const LEADERBOARD_DISPLAY: usize = 5;
}

/// Linear difficulty curve shared by block and enemy speeds
#[inline]
pub fn speed_for_level(base: f32, increment: f32, level: u32) -> f32 {
    base + increment * level.saturating_sub(1) as f32
}
