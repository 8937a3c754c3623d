//! Demo-mode autopilot
//!
//! A cheap heuristic player: run right, sidestep blocks coming down the
//! avatar's lane, and keep vertical distance from the enemy when it gets
//! close. It is beatable on purpose and only reads the public state.

use glam::Vec2;

use super::collision::overlaps;
use super::rect::Rect;
use super::state::GameState;
use crate::input::DirectionFlags;

/// Frames of lookahead when scanning for blocks
const LOOKAHEAD_FRAMES: f32 = 14.0;
/// Vertical margin kept around the avatar when judging a lane clear
const LANE_MARGIN: f32 = 6.0;
/// Chebyshev distance at which the enemy is treated as a threat
const ENEMY_ALERT: f32 = 70.0;

/// Pick this frame's input for `state`
pub fn autopilot_input(state: &GameState) -> DirectionFlags {
    let avatar = state.avatar.rect;
    let step = state.settings.avatar_step;
    let bounds = state.bounds();
    let mut input = DirectionFlags::RIGHT;

    // Everything a block could cover in the next few frames, relative to us
    let reach = (state.level.block_speed + step) * LOOKAHEAD_FRAMES;
    let lane = Rect::new(
        avatar.x,
        avatar.y - LANE_MARGIN,
        avatar.width + reach,
        avatar.height + LANE_MARGIN * 2.0,
    );

    let threat = state
        .blocks
        .iter()
        .filter(|b| overlaps(&lane, &b.rect))
        .min_by(|a, b| a.rect.x.total_cmp(&b.rect.x));

    if let Some(block) = threat {
        dodge(&mut input, avatar, block.rect.center(), bounds);
        // Too close to outrun sideways: stop pushing into it
        if block.rect.x - avatar.right() < step * 2.0 {
            input.right = false;
        }
    }

    let enemy = state.enemy.rect;
    let gap = (enemy.center() - avatar.center()).abs();
    if gap.max_element() < ENEMY_ALERT && threat.is_none() {
        dodge(&mut input, avatar, enemy.center(), bounds);
    }

    input
}

/// Move vertically away from `danger`, or toward open space at the edges
fn dodge(input: &mut DirectionFlags, avatar: Rect, danger: Vec2, bounds: Vec2) {
    let at_top = avatar.y <= 0.0;
    let at_bottom = avatar.bottom() >= bounds.y;
    let go_up = if at_top {
        false
    } else if at_bottom {
        true
    } else {
        danger.y >= avatar.center().y
    };
    input.up = go_up;
    input.down = !go_up;
}
