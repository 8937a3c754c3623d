//! Key-value persistence backends
//!
//! Everything the game keeps between page loads lives in a handful of named
//! slots holding JSON strings:
//! - `leaderboard`: the full ranked history
//! - `block_dash_settings`: optional tuning overrides
//!
//! Backends:
//! - [`MemoryStore`]: in-process, used by tests and as a last-resort fallback
//! - [`FileStore`]: one JSON file per key (native)
//! - [`LocalStore`]: `window.localStorage` (wasm)

use std::collections::HashMap;

use crate::error::GameResult;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

/// A named-slot string store
pub trait KeyValueStore {
    /// Read a slot; `Ok(None)` when it has never been written
    fn read(&self, key: &str) -> GameResult<Option<String>>;

    /// Overwrite a slot
    fn write(&mut self, key: &str, value: &str) -> GameResult<()>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a slot (handy for simulating a previous page load)
    pub fn with_slot(mut self, key: &str, value: &str) -> Self {
        self.slots.insert(key.to_string(), value.to_string());
        self
    }

    /// Raw slot contents
    pub fn get(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> GameResult<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> GameResult<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.read("leaderboard").unwrap(), None);

        store.write("leaderboard", "[]").unwrap();
        assert_eq!(store.read("leaderboard").unwrap().as_deref(), Some("[]"));

        store.write("leaderboard", "[1]").unwrap();
        assert_eq!(store.get("leaderboard"), Some("[1]"));
    }
}
