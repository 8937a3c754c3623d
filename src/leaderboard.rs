//! Leaderboard
//!
//! Persisted as one JSON array under a single storage key. The whole history
//! is kept; only the top few rows are ever displayed.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::GameResult;
use crate::persistence::KeyValueStore;

/// One finished session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    /// Level the session ended on
    pub level: u32,
    /// Whole seconds from start to game over
    #[serde(rename = "duration")]
    pub duration_secs: u64,
}

impl LeaderboardEntry {
    pub fn new(username: impl Into<String>, level: u32, duration_secs: u64) -> Self {
        Self {
            username: username.into(),
            level,
            duration_secs,
        }
    }

    /// Duration as shown in the table
    pub fn duration_label(&self) -> String {
        format!("{} s", self.duration_secs)
    }
}

/// Ranking order: higher level first, then faster
pub fn rank_order(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.level
        .cmp(&a.level)
        .then_with(|| a.duration_secs.cmp(&b.duration_secs))
}

/// A display row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow<'a> {
    /// 1-based rank
    pub rank: usize,
    pub entry: &'a LeaderboardEntry,
}

/// Ranked session history backed by a key-value store
#[derive(Debug)]
pub struct Leaderboard<S> {
    entries: Vec<LeaderboardEntry>,
    store: S,
}

impl<S: KeyValueStore> Leaderboard<S> {
    /// Storage key (same `localStorage` slot as the legacy web build)
    pub const STORAGE_KEY: &'static str = "leaderboard";

    /// Load the leaderboard once from `store`
    ///
    /// A missing, unreadable or malformed blob yields an empty leaderboard.
    pub fn load(store: S) -> Self {
        let mut entries = match store.read(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<LeaderboardEntry>>(&json) {
                Ok(entries) => {
                    log::info!("Loaded {} leaderboard entries", entries.len());
                    entries
                }
                Err(e) => {
                    log::warn!("Leaderboard blob is corrupt, starting fresh: {e}");
                    Vec::new()
                }
            },
            Ok(None) => {
                log::info!("No leaderboard found, starting fresh");
                Vec::new()
            }
            Err(e) => {
                log::warn!("Could not read leaderboard, starting fresh: {e}");
                Vec::new()
            }
        };
        // Older writers may not have sorted; the invariant holds from here on
        entries.sort_by(rank_order);
        Self { entries, store }
    }

    /// Add a result, re-rank, and write the full history through
    ///
    /// Returns the 1-based rank the entry landed at. The entry is kept in
    /// memory even when the write fails.
    pub fn record(&mut self, entry: LeaderboardEntry) -> GameResult<usize> {
        log::info!(
            "Recording {} at level {} in {}s",
            entry.username,
            entry.level,
            entry.duration_secs
        );
        // Stable sort: the newcomer lands after every entry it ties with
        let rank = self
            .entries
            .iter()
            .filter(|e| rank_order(e, &entry) != Ordering::Greater)
            .count()
            + 1;
        self.entries.push(entry);
        self.entries.sort_by(rank_order);

        self.save()?;
        Ok(rank)
    }

    fn save(&mut self) -> GameResult<()> {
        let json = serde_json::to_string(&self.entries)?;
        self.store.write(Self::STORAGE_KEY, &json)?;
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// The best `n` entries, best first
    ///
    /// The iterator is `Clone`, so it can be walked again without touching
    /// the leaderboard.
    pub fn top_n(&self, n: usize) -> impl Iterator<Item = &LeaderboardEntry> + Clone + '_ {
        self.entries.iter().take(n)
    }

    /// The best `n` entries with their ranks
    pub fn rows(&self, n: usize) -> impl Iterator<Item = LeaderboardRow<'_>> + Clone + '_ {
        self.top_n(n)
            .enumerate()
            .map(|(i, entry)| LeaderboardRow { rank: i + 1, entry })
    }

    /// Full ranked history
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Backing store
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    fn entry(name: &str, level: u32, secs: u64) -> LeaderboardEntry {
        LeaderboardEntry::new(name, level, secs)
    }

    #[test]
    fn test_empty_store_loads_empty() {
        let board = Leaderboard::load(MemoryStore::new());
        assert!(board.is_empty());
        assert_eq!(board.top_n(5).count(), 0);
    }

    #[test]
    fn test_corrupt_blob_loads_empty() {
        let store = MemoryStore::new().with_slot("leaderboard", "{not an array");
        assert!(Leaderboard::load(store).is_empty());

        let store = MemoryStore::new().with_slot("leaderboard", "null");
        assert!(Leaderboard::load(store).is_empty());
    }

    #[test]
    fn test_reads_legacy_web_format() {
        let store = MemoryStore::new().with_slot(
            "leaderboard",
            r#"[{"username":"b","level":2,"duration":30},{"username":"a","level":5,"duration":10}]"#,
        );
        let board = Leaderboard::load(store);
        // Sorted on load
        assert_eq!(board.entries(), &[entry("a", 5, 10), entry("b", 2, 30)]);
    }

    /// Store that loads fine but refuses every write
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn read(&self, _key: &str) -> GameResult<Option<String>> {
            Ok(Some(r#"[{"username":"a","level":5,"duration":10}]"#.into()))
        }

        fn write(&mut self, _key: &str, _value: &str) -> GameResult<()> {
            Err(crate::error::GameError::StorageUnavailable("read-only".into()))
        }
    }

    #[test]
    fn test_failed_write_keeps_entry_in_memory() {
        let mut board = Leaderboard::load(ReadOnlyStore);
        assert!(board.record(entry("neo", 3, 42)).is_err());
        assert_eq!(board.entries(), &[entry("a", 5, 10), entry("neo", 3, 42)]);
        assert_eq!(board.rows(5).count(), 2);
    }

    #[test]
    fn test_record_sorts_and_persists() {
        let store = MemoryStore::new()
            .with_slot("leaderboard", r#"[{"username":"a","level":5,"duration":10}]"#);
        let mut board = Leaderboard::load(store);

        let rank = board.record(entry("neo", 3, 42)).unwrap();
        assert_eq!(rank, 2);
        assert_eq!(board.entries(), &[entry("a", 5, 10), entry("neo", 3, 42)]);

        let blob = board.store().get("leaderboard").unwrap();
        let saved: Vec<LeaderboardEntry> = serde_json::from_str(blob).unwrap();
        assert_eq!(saved, board.entries());
        assert!(blob.contains(r#""duration":42"#));
    }

    #[test]
    fn test_ties_break_on_duration_then_arrival() {
        let mut board = Leaderboard::load(MemoryStore::new());
        board.record(entry("slow", 4, 90)).unwrap();
        assert_eq!(board.record(entry("fast", 4, 30)).unwrap(), 1);
        assert_eq!(board.record(entry("same", 4, 30)).unwrap(), 2);
        let names: Vec<_> = board.entries().iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, ["fast", "same", "slow"]);
    }

    #[test]
    fn test_history_uncapped_display_capped() {
        let mut board = Leaderboard::load(MemoryStore::new());
        for i in 0..8 {
            board.record(entry(&format!("p{i}"), i + 1, 10)).unwrap();
        }
        assert_eq!(board.len(), 8);

        let top = board.top_n(5);
        let first_pass: Vec<_> = top.clone().map(|e| e.level).collect();
        let second_pass: Vec<_> = top.map(|e| e.level).collect();
        assert_eq!(first_pass, [8, 7, 6, 5, 4]);
        assert_eq!(first_pass, second_pass);

        let rows: Vec<_> = board.rows(5).map(|r| (r.rank, r.entry.level)).collect();
        assert_eq!(rows[0], (1, 8));
        assert_eq!(rows[4], (5, 4));
        assert_eq!(board.top_n(5).next().unwrap().duration_label(), "10 s");
    }

    proptest! {
        #[test]
        fn prop_sorted_after_records(raw in prop::collection::vec((1u32..20, 0u64..500), 1..40)) {
            let mut board = Leaderboard::load(MemoryStore::new());
            for (i, (level, secs)) in raw.iter().enumerate() {
                board.record(entry(&format!("p{i}"), *level, *secs)).unwrap();
            }
            for pair in board.entries().windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.level > b.level || (a.level == b.level && a.duration_secs <= b.duration_secs));
            }

            // Re-sorting is a no-op
            let mut resorted = board.entries().to_vec();
            resorted.sort_by(rank_order);
            prop_assert_eq!(resorted.as_slice(), board.entries());
        }
    }
}
