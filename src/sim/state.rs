//! Game state and entity types
//!
//! Everything that changes during a run lives in [`GameState`], which the
//! frame step takes by `&mut`. There are no globals.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Collider;
use super::level::LevelState;
use super::rect::Rect;
use crate::input::DirectionFlags;
use crate::settings::Settings;

/// Current phase of the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Frames are being simulated
    Running,
    /// The avatar hit something; frozen
    Crashed,
    /// The final level was cleared; frozen
    Cleared,
}

/// Something the frame step wants the session layer to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Avatar reached the right edge; `level` is the new level
    LevelComplete { level: u32 },
    /// Avatar touched the enemy or a block
    Collision(Collider),
    /// Avatar reached the right edge of the last level
    Cleared { level: u32 },
}

/// The player-controlled rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    pub rect: Rect,
}

impl Avatar {
    pub fn at(rect: Rect) -> Self {
        Self { rect }
    }

    /// Move one `step` along every held direction, then clamp to the canvas
    ///
    /// Diagonals are not normalized: holding right+down moves a full step on
    /// both axes.
    pub fn apply_input(&mut self, input: &DirectionFlags, step: f32, bounds: Vec2) {
        let mut delta = Vec2::ZERO;
        if input.up {
            delta.y -= step;
        }
        if input.down {
            delta.y += step;
        }
        if input.left {
            delta.x -= step;
        }
        if input.right {
            delta.x += step;
        }
        self.rect.translate(delta);
        self.rect.clamp_within(bounds);
    }
}

/// The pursuer
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub rect: Rect,
}

impl Enemy {
    pub fn at(rect: Rect) -> Self {
        Self { rect }
    }

    /// Step `speed` toward `target` on each axis independently
    ///
    /// This is per-axis (Chebyshev) pursuit: closing speed on a diagonal is
    /// `speed * sqrt(2)`. An axis that is already aligned does not move.
    pub fn pursue(&mut self, target: Vec2, speed: f32) {
        self.rect.x = approach(self.rect.x, target.x, speed);
        self.rect.y = approach(self.rect.y, target.y, speed);
    }
}

fn approach(current: f32, target: f32, speed: f32) -> f32 {
    if current > target {
        current - speed
    } else if current < target {
        current + speed
    } else {
        current
    }
}

/// A horizontally scrolling obstacle
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub rect: Rect,
}

impl Block {
    pub fn at(rect: Rect) -> Self {
        Self { rect }
    }

    /// Scroll left by `speed`; once fully off the left edge, wrap to the
    /// right edge at a fresh random height
    ///
    /// Returns true when the block wrapped.
    pub fn scroll(&mut self, speed: f32, bounds: Vec2, rng: &mut Pcg32) -> bool {
        self.rect.x -= speed;
        if self.rect.right() < 0.0 {
            self.rect.x = bounds.x;
            self.rect.y = random_block_y(rng, bounds.y, self.rect.height);
            return true;
        }
        false
    }
}

/// Uniform y in `[0, canvas_height - block_height)`
fn random_block_y(rng: &mut Pcg32, canvas_height: f32, block_height: f32) -> f32 {
    let span = canvas_height - block_height;
    if span > 0.0 {
        rng.random_range(0.0..span)
    } else {
        0.0
    }
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed (block layouts are reproducible from it)
    pub seed: u64,
    /// Tuning this state was built with
    pub settings: Settings,
    /// Level and derived speeds
    pub level: LevelState,
    /// Current phase
    pub phase: GamePhase,
    /// Frames simulated this session
    pub frame: u64,
    pub avatar: Avatar,
    pub enemy: Enemy,
    pub blocks: Vec<Block>,
    rng: Pcg32,
}

impl GameState {
    /// Fresh level-1 state
    pub fn new(settings: Settings, seed: u64) -> Self {
        let avatar = Avatar::at(Rect::from_pos_size(
            settings.avatar_start(),
            Vec2::splat(settings.avatar_size),
        ));
        let enemy = Enemy::at(Rect::from_pos_size(
            settings.enemy_start(),
            Vec2::splat(settings.enemy_size),
        ));
        let mut state = Self {
            seed,
            level: LevelState::first(&settings),
            phase: GamePhase::Running,
            frame: 0,
            avatar,
            enemy,
            blocks: Vec::with_capacity(settings.block_count),
            rng: Pcg32::seed_from_u64(seed),
            settings,
        };
        state.generate_blocks();
        state
    }

    /// Canvas size as a vector
    pub fn bounds(&self) -> Vec2 {
        self.settings.canvas_size()
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Replace all blocks with `block_count` fresh ones at random positions
    pub fn generate_blocks(&mut self) {
        let Settings {
            canvas_width,
            canvas_height,
            block_width,
            block_height,
            block_count,
            ..
        } = self.settings;

        self.blocks.clear();
        for _ in 0..block_count {
            let x = self.rng.random_range(0.0..canvas_width);
            let y = random_block_y(&mut self.rng, canvas_height, block_height);
            self.blocks
                .push(Block::at(Rect::new(x, y, block_width, block_height)));
        }
    }

    /// Put the avatar back on the starting spot
    pub fn reset_avatar(&mut self) {
        self.avatar.rect.set_pos(self.settings.avatar_start());
    }

    /// Put the enemy back on its starting spot
    pub fn reset_enemy(&mut self) {
        self.enemy.rect.set_pos(self.settings.enemy_start());
    }

    /// Scroll every block, wrapping the ones that left the canvas
    pub fn scroll_blocks(&mut self) {
        let speed = self.level.block_speed;
        let bounds = self.bounds();
        for block in &mut self.blocks {
            block.scroll(speed, bounds, &mut self.rng);
        }
    }
}
