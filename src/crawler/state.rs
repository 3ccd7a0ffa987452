//! Crawl state machine states

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// The three modes of the crawl state machine.
///
/// `Idle` is both the initial and the terminal state. Exactly one engine
/// instance owns the state; external callers only ever push it back to
/// `Idle` via `stop()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Idle,
    Crawling,
    Backtracking,
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CrawlState::Idle => "idle",
            CrawlState::Crawling => "crawling",
            CrawlState::Backtracking => "backtracking",
        };
        f.write_str(name)
    }
}

const IDLE: u8 = 0;
const CRAWLING: u8 = 1;
const BACKTRACKING: u8 = 2;

fn encode(state: CrawlState) -> u8 {
    match state {
        CrawlState::Idle => IDLE,
        CrawlState::Crawling => CRAWLING,
        CrawlState::Backtracking => BACKTRACKING,
    }
}

fn decode(raw: u8) -> CrawlState {
    match raw {
        IDLE => CrawlState::Idle,
        CRAWLING => CrawlState::Crawling,
        BACKTRACKING => CrawlState::Backtracking,
        other => unreachable!("invalid crawl state encoding {}", other),
    }
}

/// Atomically readable/writable crawl state.
///
/// The traversal task and the controlling context both touch this cell;
/// the loop reads it once per iteration, `stop()` writes it at any time.
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub fn new(state: CrawlState) -> Self {
        Self(AtomicU8::new(encode(state)))
    }

    pub fn load(&self) -> CrawlState {
        decode(self.0.load(Ordering::SeqCst))
    }

    /// Stores `state`, returning the previous state.
    pub fn swap(&self, state: CrawlState) -> CrawlState {
        decode(self.0.swap(encode(state), Ordering::SeqCst))
    }

    /// Transitions from `current` to `new` only if the cell still holds
    /// `current`. Returns whether the transition happened.
    pub fn compare_exchange(&self, current: CrawlState, new: CrawlState) -> bool {
        self.0
            .compare_exchange(
                encode(current),
                encode(new),
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }
}
