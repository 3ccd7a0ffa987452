//! Visited-player history
//!
//! Bounded, time-expiring record of the players the crawler has already
//! visited, together with the match batch fetched for each. The history
//! serves two purposes at once: it is the cycle guard ("have we been here
//! before?") and the pool of backtrack candidates when the traversal hits
//! a dead end.

use crate::model::{MatchBatch, Player, PlayerKey};
use moka::sync::Cache;
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;

/// Default retention of a visited entry: 1 day.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

/// Default maximum number of live entries.
pub const DEFAULT_CAPACITY: u64 = 100_000;

/// A visited player together with the batch fetched on that visit.
#[derive(Debug, Clone)]
pub struct VisitedEntry {
    pub player: Player,
    pub batch: MatchBatch,
}

/// Bounded, expiring map of visited players.
///
/// Internally synchronized: the traversal task writes while the
/// controlling context may read concurrently for diagnostics. A player
/// has at most one live entry at a time; recording again overwrites the
/// entry and resets its expiry.
pub struct VisitedHistory {
    entries: Cache<PlayerKey, Arc<VisitedEntry>>,
}

impl VisitedHistory {
    /// History with the default 1-day retention and 100 000-entry bound.
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_RETENTION, DEFAULT_CAPACITY)
    }

    /// History with explicit retention and capacity.
    pub fn with_settings(retention: Duration, capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(retention)
            .build();

        Self { entries }
    }

    /// Inserts or overwrites the entry for a player, resetting its expiry.
    pub fn record(&self, player: Player, batch: MatchBatch) {
        let key = player.key();
        self.entries.insert(key, Arc::new(VisitedEntry { player, batch }));
    }

    /// Deletes and returns the entry for a player; `None` if absent.
    pub fn remove(&self, key: &PlayerKey) -> Option<Arc<VisitedEntry>> {
        self.entries.remove(key)
    }

    /// Puts a previously removed entry back, with a fresh expiry.
    pub fn restore(&self, entry: Arc<VisitedEntry>) {
        self.entries.insert(entry.player.key(), entry);
    }

    /// Whether a live entry exists for a player.
    pub fn contains(&self, key: &PlayerKey) -> bool {
        self.entries.contains_key(key)
    }

    /// The live entry for a player, if any.
    pub fn get(&self, key: &PlayerKey) -> Option<Arc<VisitedEntry>> {
        self.entries.get(key)
    }

    /// Uniformly samples one live entry; `None` if the history is empty.
    pub fn random_entry(&self) -> Option<Arc<VisitedEntry>> {
        let live: Vec<Arc<VisitedEntry>> = self.entries.iter().map(|(_, v)| v).collect();
        live.choose(&mut rand::thread_rng()).cloned()
    }

    /// Whether the history holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().next().is_none()
    }

    /// Approximate number of live entries. Eventually consistent.
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }
}

impl Default for VisitedHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Match, Region};
    use std::collections::HashSet;

    fn player(id: &str) -> Player {
        Player {
            id: id.to_string(),
            name: id.to_string(),
            region: Region::Euw,
            level: 30,
            rank: None,
        }
    }

    fn batch(game_id: u64) -> MatchBatch {
        MatchBatch::new(vec![Match {
            game_id,
            queue: 420,
            duration_secs: 1800,
            played_at: None,
            participants: vec![],
        }])
    }

    #[test]
    fn test_record_and_contains() {
        let history = VisitedHistory::new();
        let p = player("a");

        assert!(!history.contains(&p.key()));
        history.record(p.clone(), batch(1));
        assert!(history.contains(&p.key()));
    }

    #[test]
    fn test_get_returns_recorded_batch() {
        let history = VisitedHistory::new();
        let p = player("a");
        history.record(p.clone(), batch(7));

        let entry = history.get(&p.key()).unwrap();
        assert_eq!(entry.batch.matches()[0].game_id, 7);
        assert_eq!(entry.player.id, "a");
    }

    #[test]
    fn test_record_overwrites() {
        let history = VisitedHistory::new();
        let p = player("a");

        history.record(p.clone(), batch(1));
        history.record(p.clone(), batch(2));

        let entry = history.get(&p.key()).unwrap();
        assert_eq!(entry.batch.matches()[0].game_id, 2);
    }

    #[test]
    fn test_remove_then_contains_reflects_net_effect() {
        let history = VisitedHistory::new();
        let p = player("a");

        history.record(p.clone(), batch(1));
        let removed = history.remove(&p.key()).unwrap();
        assert_eq!(removed.batch.matches()[0].game_id, 1);
        assert!(!history.contains(&p.key()));

        // Removing again is a no-op.
        assert!(history.remove(&p.key()).is_none());
    }

    #[test]
    fn test_restore_puts_entry_back() {
        let history = VisitedHistory::new();
        let p = player("a");

        history.record(p.clone(), batch(1));
        let removed = history.remove(&p.key()).unwrap();
        history.restore(removed);

        assert!(history.contains(&p.key()));
    }

    #[test]
    fn test_random_entry_empty_history() {
        let history = VisitedHistory::new();
        assert!(history.random_entry().is_none());
        assert!(history.is_empty());
    }

    #[test]
    fn test_random_entry_reaches_every_entry() {
        let history = VisitedHistory::new();
        for id in ["a", "b", "c"] {
            history.record(player(id), batch(1));
        }

        let mut seen = HashSet::new();
        for _ in 0..200 {
            let entry = history.random_entry().unwrap();
            seen.insert(entry.player.id.clone());
        }

        assert_eq!(seen.len(), 3, "all entries should be drawable: {:?}", seen);
    }

    #[test]
    fn test_expired_entries_are_not_visible() {
        let history = VisitedHistory::with_settings(Duration::from_millis(10), 100);
        let p = player("a");
        history.record(p.clone(), batch(1));

        std::thread::sleep(Duration::from_millis(50));

        assert!(!history.contains(&p.key()));
        assert!(history.random_entry().is_none());
    }
}
