//! Level progression and difficulty
//!
//! Both speeds follow the same linear curve,
//! `base + increment * (level - 1)`, and are always recomputed from the level
//! number rather than accumulated, so they cannot drift.

use crate::settings::Settings;
use crate::speed_for_level;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelState {
    /// 1-based level number
    pub level: u32,
    /// Pixels per frame the blocks scroll left
    pub block_speed: f32,
    /// Pixels per frame (per axis) the enemy closes in
    pub enemy_speed: f32,
}

impl LevelState {
    pub fn first(settings: &Settings) -> Self {
        Self::at(1, settings)
    }

    /// State for an arbitrary level (0 is treated as 1)
    pub fn at(level: u32, settings: &Settings) -> Self {
        let level = level.max(1);
        Self {
            level,
            block_speed: speed_for_level(settings.base_block_speed, settings.speed_increment, level),
            enemy_speed: speed_for_level(settings.base_enemy_speed, settings.speed_increment, level),
        }
    }

    /// Move to the next level and recompute speeds
    pub fn advance(&mut self, settings: &Settings) {
        *self = Self::at(self.level.saturating_add(1), settings);
        log::debug!(
            "Level {}: block_speed={}, enemy_speed={}",
            self.level,
            self.block_speed,
            self.enemy_speed
        );
    }

    /// Whether clearing the current level finishes the run
    pub fn is_final(&self, settings: &Settings) -> bool {
        settings.max_level.is_some_and(|max| self.level >= max)
    }
}
