//! Traversal observation hooks
//!
//! An observer receives callbacks at every state transition and seek
//! decision. It is purely observational: the engine never consults its
//! return values (there are none) and runs identically with the default
//! no-op implementation.

use crate::crawler::CrawlState;
use crate::model::{Match, MatchBatch, Player};
use crate::source::RemoteError;

/// Callback hooks fired by the crawl engine.
///
/// All methods default to no-ops, so implementations only override what
/// they care about.
pub trait CrawlObserver: Send + Sync {
    /// The state machine moved from one state to another.
    fn on_transition(&self, _from: CrawlState, _to: CrawlState) {}

    /// The seed player passed the player predicate; a crawl is starting.
    fn on_seed_accepted(&self, _seed: &Player) {}

    /// The seed player was rejected; no crawl will start.
    fn on_seed_rejected(&self, _seed: &Player) {}

    /// A player was visited and their batch recorded and emitted.
    fn on_visit(&self, _player: &Player, _batch: &MatchBatch) {}

    /// The seek step found the next player to crawl.
    fn on_seek_accepted(&self, _next: &Player) {}

    /// The seek step exhausted every match without finding a next player.
    fn on_seek_exhausted(&self, _from: &Player) {}

    /// A candidate participant was resolved but rejected.
    fn on_candidate_rejected(&self, _candidate: &Player) {}

    /// A match was rejected by the match predicate during seek.
    fn on_match_rejected(&self, _m: &Match) {}

    /// Backtracking drew a previously visited player to resume from.
    fn on_backtrack(&self, _from: &Player, _to: &Player) {}

    /// Backtracking found the visited history empty; the crawl halts.
    fn on_backtrack_exhausted(&self) {}

    /// A remote failure ended the crawl.
    fn on_fatal(&self, _error: &RemoteError) {}
}

/// Observer that does nothing. The engine default.
pub struct NoopObserver;

impl CrawlObserver for NoopObserver {}

/// Observer that narrates the traversal through `tracing`.
pub struct TracingObserver;

impl CrawlObserver for TracingObserver {
    fn on_transition(&self, from: CrawlState, to: CrawlState) {
        tracing::info!(%from, %to, "crawl state changed");
    }

    fn on_seed_accepted(&self, seed: &Player) {
        tracing::info!(player = %seed.key(), name = %seed.name, "seed player accepted");
    }

    fn on_seed_rejected(&self, seed: &Player) {
        tracing::info!(player = %seed.key(), name = %seed.name, "seed player rejected");
    }

    fn on_visit(&self, player: &Player, batch: &MatchBatch) {
        tracing::info!(player = %player.key(), matches = batch.len(), "visited player");
    }

    fn on_seek_accepted(&self, next: &Player) {
        tracing::info!(player = %next.key(), "next player found");
    }

    fn on_seek_exhausted(&self, from: &Player) {
        tracing::info!(player = %from.key(), "dead end, no crawlable player in batch");
    }

    fn on_candidate_rejected(&self, candidate: &Player) {
        tracing::debug!(player = %candidate.key(), "candidate rejected");
    }

    fn on_match_rejected(&self, m: &Match) {
        tracing::debug!(game_id = m.game_id, "match rejected");
    }

    fn on_backtrack(&self, from: &Player, to: &Player) {
        tracing::info!(from = %from.key(), to = %to.key(), "backtracking");
    }

    fn on_backtrack_exhausted(&self) {
        tracing::info!("visited history exhausted, halting");
    }

    fn on_fatal(&self, error: &RemoteError) {
        tracing::error!(%error, "crawl halted by remote failure");
    }
}
