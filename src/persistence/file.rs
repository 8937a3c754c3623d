//! File-backed store for native builds

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::error::GameResult;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "BLOCK_DASH_DATA_DIR";
const DEFAULT_DATA_DIR: &str = ".block-dash";

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at `$BLOCK_DASH_DATA_DIR`, or `.block-dash` in the
    /// working directory
    pub fn from_env() -> Self {
        let dir = std::env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> GameResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> GameResult<()> {
        fs::create_dir_all(&self.dir)?;
        // Write to a sibling temp file first so a crash never leaves half a blob
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "block-dash-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_key_reads_none() {
        let store = FileStore::new(scratch_dir("missing"));
        assert!(store.read("leaderboard").unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = scratch_dir("write");
        let mut store = FileStore::new(&dir);
        store.write("leaderboard", r#"[{"username":"a"}]"#).unwrap();

        let reopened = FileStore::new(&dir);
        assert_eq!(
            reopened.read("leaderboard").unwrap().as_deref(),
            Some(r#"[{"username":"a"}]"#)
        );
        assert!(dir.join("leaderboard.json").exists());
        assert!(!dir.join("leaderboard.json.tmp").exists());

        let _ = fs::remove_dir_all(&dir);
    }
}
