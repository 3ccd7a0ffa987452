use crate::model::Region;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reference to one player inside a match.
///
/// A participant points at a player by id and region without owning the
/// full account record; the crawler resolves it through the remote source
/// when it considers hopping to that player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub player_id: String,
    pub region: Region,
    #[serde(default)]
    pub name: Option<String>,
}

/// A recorded game involving multiple players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Globally unique game id.
    pub game_id: u64,

    /// Queue/mode identifier the game was played in.
    pub queue: u32,

    /// Game length in seconds.
    pub duration_secs: u64,

    /// When the game was played, if the remote source reports it.
    #[serde(default)]
    pub played_at: Option<DateTime<Utc>>,

    /// Everyone who played in this game.
    pub participants: Vec<Participant>,
}

impl Match {
    /// Game length as a `Duration`.
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

/// Ordered batch of one player's recent matches.
///
/// Produced once per visit, bounded by the configured maximum batch size,
/// and immutable afterwards. Iteration order is fetch order (most recent
/// first, as the remote source returns them).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchBatch {
    matches: Vec<Match>,
}

impl MatchBatch {
    /// Wraps a fetched list of matches.
    pub fn new(matches: Vec<Match>) -> Self {
        Self { matches }
    }

    /// Matches in fetch order.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Iterates matches in fetch order.
    pub fn iter(&self) -> std::slice::Iter<'_, Match> {
        self.matches.iter()
    }
}

impl<'a> IntoIterator for &'a MatchBatch {
    type Item = &'a Match;
    type IntoIter = std::slice::Iter<'a, Match>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}
