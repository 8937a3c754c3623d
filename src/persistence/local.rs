//! `window.localStorage` store for the browser build

use web_sys::Storage;

use super::KeyValueStore;
use crate::error::{GameError, GameResult};

/// Browser LocalStorage
pub struct LocalStore {
    storage: Storage,
}

impl LocalStore {
    /// Open the page's LocalStorage (fails in private modes that disable it)
    pub fn open() -> GameResult<Self> {
        let storage = web_sys::window()
            .ok_or_else(|| GameError::StorageUnavailable("no window".into()))?
            .local_storage()
            .map_err(|e| GameError::StorageUnavailable(format!("{e:?}")))?
            .ok_or_else(|| GameError::StorageUnavailable("localStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStore {
    fn read(&self, key: &str) -> GameResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| GameError::StorageUnavailable(format!("{e:?}")))
    }

    fn write(&mut self, key: &str, value: &str) -> GameResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| GameError::StorageUnavailable(format!("{e:?}")))
    }
}
