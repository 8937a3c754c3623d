//! Keyboard input handling
//!
//! Key events arrive asynchronously from the host and only flip entries in a
//! key map; the simulation reads a [`DirectionFlags`] snapshot once per frame.

use std::collections::HashMap;

/// Directions held during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionFlags {
    pub const RIGHT: Self = Self {
        up: false,
        down: false,
        left: false,
        right: true,
    };

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Logical direction for a key name (arrows and WASD)
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" | "w" | "W" => Some(Direction::Up),
        "ArrowDown" | "s" | "S" => Some(Direction::Down),
        "ArrowLeft" | "a" | "A" => Some(Direction::Left),
        "ArrowRight" | "d" | "D" => Some(Direction::Right),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Held-key map, keyed by the host's key identifier
///
/// Aliases are tracked separately, so releasing `d` leaves `ArrowRight`
/// held. Starts disabled so typing a username into a text field never moves the
/// avatar; the front end enables it once a session starts.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashMap<String, bool>,
    enabled: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.clear();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a key press; returns true when the key is a game key
    /// (so the caller can suppress the browser's default scrolling)
    pub fn key_down(&mut self, key: &str) -> bool {
        self.set_key(key, true)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.set_key(key, false)
    }

    fn set_key(&mut self, key: &str, pressed: bool) -> bool {
        if !self.enabled {
            return false;
        }
        if direction_for_key(key).is_none() {
            return false;
        }
        self.held.insert(key.to_string(), pressed);
        true
    }

    /// Release every key (on start, replay and focus loss)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Snapshot for the current frame
    pub fn directions(&self) -> DirectionFlags {
        let mut flags = DirectionFlags::default();
        let held = self
            .held
            .iter()
            .filter(|(_, pressed)| **pressed)
            .filter_map(|(key, _)| direction_for_key(key));
        for dir in held {
            match dir {
                Direction::Up => flags.up = true,
                Direction::Down => flags.down = true,
                Direction::Left => flags.left = true,
                Direction::Right => flags.right = true,
            }
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_input_ignores_keys() {
        let mut input = InputState::new();
        assert!(!input.key_down("ArrowRight"));
        assert!(!input.directions().any());
    }

    #[test]
    fn test_arrows_and_wasd() {
        let mut input = InputState::new();
        input.set_enabled(true);

        assert!(input.key_down("ArrowRight"));
        assert!(input.key_down("w"));
        assert!(!input.key_down("x"));

        let dirs = input.directions();
        assert!(dirs.right && dirs.up);
        assert!(!dirs.left && !dirs.down);

        input.key_up("ArrowRight");
        assert!(!input.directions().right);
        assert!(input.directions().up);
    }

    #[test]
    fn test_alias_release_keeps_other_key_held() {
        let mut input = InputState::new();
        input.set_enabled(true);

        input.key_down("ArrowRight");
        input.key_down("d");
        input.key_up("d");
        assert!(input.directions().right);

        input.key_up("ArrowRight");
        assert!(!input.directions().right);
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut input = InputState::new();
        input.set_enabled(true);
        input.key_down("ArrowLeft");
        input.key_down("ArrowDown");
        input.clear();
        assert_eq!(input.directions(), DirectionFlags::default());

        input.key_down("ArrowLeft");
        input.set_enabled(false);
        assert_eq!(input.directions(), DirectionFlags::default());
    }
}
