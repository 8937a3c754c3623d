//! Game tuning settings
//!
//! Persisted separately from the leaderboard. Every field falls back to the
//! compile-time default in [`crate::consts`], so a stored blob only needs the
//! keys it wants to override.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, GameResult};
use crate::persistence::KeyValueStore;

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Avatar ===
    pub avatar_size: f32,
    pub avatar_start: (f32, f32),
    /// Pixels moved per frame per held direction
    pub avatar_step: f32,

    // === Enemy ===
    pub enemy_size: f32,
    pub enemy_start: (f32, f32),

    // === Blocks ===
    pub block_count: usize,
    pub block_width: f32,
    pub block_height: f32,

    // === Difficulty ===
    pub base_block_speed: f32,
    pub base_enemy_speed: f32,
    /// Added to both speeds for every level past the first
    pub speed_increment: f32,
    /// Clearing this level ends the run as a win (endless when unset)
    pub max_level: Option<u32>,

    // === HUD ===
    /// Leaderboard rows shown to the player
    pub leaderboard_display: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            avatar_size: AVATAR_SIZE,
            avatar_start: AVATAR_START,
            avatar_step: AVATAR_STEP,

            enemy_size: ENEMY_SIZE,
            enemy_start: ENEMY_START,

            block_count: BLOCK_COUNT,
            block_width: BLOCK_WIDTH,
            block_height: BLOCK_HEIGHT,

            base_block_speed: BASE_BLOCK_SPEED,
            base_enemy_speed: BASE_ENEMY_SPEED,
            speed_increment: SPEED_INCREMENT,
            max_level: None,

            leaderboard_display: LEADERBOARD_DISPLAY,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "block_dash_settings";

    pub fn canvas_size(&self) -> Vec2 {
        Vec2::new(self.canvas_width, self.canvas_height)
    }

    pub fn avatar_start(&self) -> Vec2 {
        Vec2::from(self.avatar_start)
    }

    pub fn enemy_start(&self) -> Vec2 {
        Vec2::from(self.enemy_start)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> GameResult<()> {
        positive("canvas_width", self.canvas_width)?;
        positive("canvas_height", self.canvas_height)?;
        fits("avatar_size", self.avatar_size, self.canvas_width.min(self.canvas_height))?;
        fits("avatar_step", self.avatar_step, self.canvas_width)?;
        fits("enemy_size", self.enemy_size, self.canvas_width.min(self.canvas_height))?;
        fits("block_width", self.block_width, self.canvas_width)?;
        // Respawn picks y in [0, canvas_height - block_height), which must be non-empty
        fits("block_height", self.block_height, self.canvas_height)?;
        if self.base_block_speed < 0.0 {
            return Err(invalid("base_block_speed", self.base_block_speed, "[0, inf)"));
        }
        if self.base_enemy_speed < 0.0 {
            return Err(invalid("base_enemy_speed", self.base_enemy_speed, "[0, inf)"));
        }
        if self.speed_increment < 0.0 {
            return Err(invalid("speed_increment", self.speed_increment, "[0, inf)"));
        }
        if self.block_count > MAX_BLOCK_COUNT {
            return Err(invalid("block_count", self.block_count as f32, "[0, 64]"));
        }
        if self.leaderboard_display > MAX_LEADERBOARD_DISPLAY {
            return Err(invalid(
                "leaderboard_display",
                self.leaderboard_display as f32,
                "[0, 100]",
            ));
        }
        if self.max_level == Some(0) {
            return Err(invalid("max_level", 0.0, "[1, inf) or unset"));
        }
        Ok(())
    }

    /// Load settings from the store, falling back to defaults on any problem
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        match store.read(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => match settings.validate() {
                    Ok(()) => {
                        log::info!("Loaded settings from storage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                },
                Err(e) => log::warn!("Ignoring malformed settings: {e}"),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read settings: {e}"),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to the store
    pub fn save<S: KeyValueStore>(&self, store: &mut S) -> GameResult<()> {
        self.validate()?;
        let json = serde_json::to_string(self)?;
        store.write(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

/// Upper bound on blocks per level
const MAX_BLOCK_COUNT: usize = 64;
/// Upper bound on leaderboard rows shown
const MAX_LEADERBOARD_DISPLAY: usize = 100;

fn invalid(name: &'static str, value: f32, expected: &'static str) -> GameError {
    GameError::InvalidSetting {
        name,
        value,
        expected,
    }
}

fn positive(name: &'static str, value: f32) -> GameResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(name, value, "(0, inf)"))
    }
}

fn fits(name: &'static str, value: f32, limit: f32) -> GameResult<()> {
    if value > 0.0 && value < limit {
        Ok(())
    } else {
        Err(invalid(name, value, "(0, canvas size)"))
    }
}
