//! Player filter presets

use crate::filter::{Filter, FilterResult};
use crate::model::{Player, Rank};

/// Rejects players below a minimum account level.
pub struct MinLevelPlayerFilter {
    min_level: u32,
}

impl MinLevelPlayerFilter {
    pub fn new(min_level: u32) -> Self {
        Self { min_level }
    }
}

impl Filter<Player> for MinLevelPlayerFilter {
    fn test(&self, player: &Player) -> FilterResult {
        Ok(player.level >= self.min_level)
    }
}

/// Rejects players below a minimum ranked tier.
///
/// A player with no rank information at all is rejected: without a rank
/// there is no way to place them on the ladder.
pub struct MinRankPlayerFilter {
    min_rank: Rank,
}

impl MinRankPlayerFilter {
    pub fn new(min_rank: Rank) -> Self {
        Self { min_rank }
    }
}

impl Filter<Player> for MinRankPlayerFilter {
    fn test(&self, player: &Player) -> FilterResult {
        Ok(player.rank.map_or(false, |rank| rank >= self.min_rank))
    }
}
