//! Match filter presets

use crate::filter::{Filter, FilterResult};
use crate::model::Match;
use std::collections::HashSet;
use std::time::Duration;

/// Rejects matches shorter than a minimum duration.
///
/// The classic preset is 20 minutes: anything shorter is likely a remake
/// or a surrender and tells little about the players in it.
pub struct MinDurationMatchFilter {
    min: Duration,
}

impl MinDurationMatchFilter {
    pub fn new(min: Duration) -> Self {
        Self { min }
    }
}

impl Filter<Match> for MinDurationMatchFilter {
    fn test(&self, m: &Match) -> FilterResult {
        Ok(m.duration() >= self.min)
    }
}

/// Accepts only matches played in one of the allowed queues.
pub struct QueueMatchFilter {
    queues: HashSet<u32>,
}

impl QueueMatchFilter {
    pub fn new(queues: impl IntoIterator<Item = u32>) -> Self {
        Self {
            queues: queues.into_iter().collect(),
        }
    }
}

impl Filter<Match> for QueueMatchFilter {
    fn test(&self, m: &Match) -> FilterResult {
        Ok(self.queues.contains(&m.queue))
    }
}
