//! Domain model for the crawled match graph
//!
//! Players are the nodes of the traversed graph, matches are the edges.
//! All types here are immutable value snapshots produced by fetch
//! operations; the crawler never mutates them after creation.

mod matches;
mod player;

pub use matches::{Match, MatchBatch, Participant};
pub use player::{Player, PlayerKey, Rank, Region};

use std::hash::Hash;

/// Stable identity of a cached entity.
///
/// Memoizing filters key their caches by this identity rather than by the
/// full (and possibly large) entity value. Two snapshots of the same remote
/// entity must produce equal keys.
pub trait Identity {
    /// The key type, cheap to clone and hash.
    type Key: Eq + Hash + Clone + Send + Sync + 'static;

    /// Returns the identity key of this entity.
    fn identity(&self) -> Self::Key;
}

impl Identity for Player {
    type Key = PlayerKey;

    fn identity(&self) -> PlayerKey {
        self.key()
    }
}

impl Identity for Match {
    type Key = u64;

    fn identity(&self) -> u64 {
        self.game_id
    }
}
