//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call to [`tick`] per frame, no wall-clock time
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod level;
pub mod rect;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_input;
pub use collision::{Collider, find_collision, overlaps};
pub use level::LevelState;
pub use rect::Rect;
pub use state::{Avatar, Block, Enemy, GameEvent, GamePhase, GameState};
pub use tick::tick;
