//! Per-frame simulation step
//!
//! One call advances the game by exactly one animation frame. Order matters
//! and is fixed: avatar, enemy, blocks, collisions, then the level-complete
//! check. A collision ends the step before the level check, so touching a
//! block on the finish line is still a crash.

use super::collision::find_collision;
use super::state::{GameEvent, GamePhase, GameState};
use crate::input::DirectionFlags;

/// Advance the game state by one frame
///
/// Does nothing once the state has left [`GamePhase::Running`].
pub fn tick(state: &mut GameState, input: &DirectionFlags) -> Option<GameEvent> {
    if !state.is_running() {
        return None;
    }

    state.frame += 1;
    let bounds = state.bounds();

    state
        .avatar
        .apply_input(input, state.settings.avatar_step, bounds);

    let target = state.avatar.rect.pos();
    state.enemy.pursue(target, state.level.enemy_speed);

    state.scroll_blocks();

    if let Some(hit) = find_collision(&state.avatar, &state.enemy, &state.blocks) {
        log::info!("Collision with {:?} on level {}", hit, state.level.level);
        state.phase = GamePhase::Crashed;
        return Some(GameEvent::Collision(hit));
    }

    if state.avatar.rect.right() >= bounds.x {
        return Some(complete_level(state));
    }

    None
}

/// Handle the avatar reaching the right edge
fn complete_level(state: &mut GameState) -> GameEvent {
    if state.level.is_final(&state.settings) {
        log::info!("Final level {} cleared", state.level.level);
        state.phase = GamePhase::Cleared;
        return GameEvent::Cleared {
            level: state.level.level,
        };
    }

    state.level.advance(&state.settings);
    state.reset_avatar();
    state.generate_blocks();
    log::info!(
        "Level up: level={}, block_speed={}, enemy_speed={}",
        state.level.level,
        state.level.block_speed,
        state.level.enemy_speed
    );
    GameEvent::LevelComplete {
        level: state.level.level,
    }
}
