//! Crawl engine - the traversal state machine
//!
//! One engine instance owns one crawl. `run` fetches and screens the seed
//! player, then spawns a background task that repeatedly fetches the
//! current player's recent matches, emits them, and hops to a randomly
//! sampled accepted participant. Dead ends are recovered by backtracking
//! into the visited history; the crawl halts when the history is
//! exhausted, when the remote source fails fatally, or when `stop()` is
//! called.

use crate::config::{validation, Config};
use crate::crawler::observer::{CrawlObserver, NoopObserver};
use crate::crawler::state::StateCell;
use crate::crawler::CrawlState;
use crate::filter::CrawlFilters;
use crate::history::{VisitedEntry, VisitedHistory};
use crate::model::{MatchBatch, Participant, Player, Region};
use crate::output::OutputHandler;
use crate::source::{RemoteError, RemoteSource, ThrottledSource};
use crate::{ConfigResult, Result, RifthopError};
use rand::Rng;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;

/// State shared between the engine handle and the traversal task.
struct Shared {
    source: ThrottledSource<Arc<dyn RemoteSource>>,
    max_matches: usize,
    state: StateCell,
    history: VisitedHistory,
    filters: RwLock<CrawlFilters>,
    output: RwLock<Arc<dyn OutputHandler>>,
    observer: RwLock<Arc<dyn CrawlObserver>>,
    last_error: Mutex<Option<RemoteError>>,
}

impl Shared {
    fn observer(&self) -> Arc<dyn CrawlObserver> {
        self.observer.read().unwrap().clone()
    }

    fn filters(&self) -> CrawlFilters {
        self.filters.read().unwrap().clone()
    }

    fn output_handler(&self) -> Arc<dyn OutputHandler> {
        self.output.read().unwrap().clone()
    }

    /// Moves to `to`, notifying the observer if the state actually changed.
    fn transition(&self, to: CrawlState) {
        let from = self.state.swap(to);
        if from != to {
            self.observer().on_transition(from, to);
        }
    }
}

/// The match-graph crawler.
///
/// Construction wires together a remote source (wrapped in the throttling
/// layer), the visited history, the filter pair and the output pipeline.
/// Filters, output and observer are swappable at any time from the
/// controlling context; the traversal reads them once per loop iteration.
pub struct CrawlEngine {
    shared: Arc<Shared>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl CrawlEngine {
    /// Creates an engine from a validated configuration.
    ///
    /// Bounds the engine depends on (max matches per batch, history
    /// settings) are re-checked here so a hand-built configuration cannot
    /// smuggle invalid values past file-load validation.
    pub fn new(
        source: Arc<dyn RemoteSource>,
        config: &Config,
        filters: CrawlFilters,
        output: Arc<dyn OutputHandler>,
    ) -> ConfigResult<Self> {
        validation::validate_crawler(&config.crawler)?;
        validation::validate_history(&config.history)?;

        let history = VisitedHistory::with_settings(
            Duration::from_secs(config.history.retention_secs),
            config.history.capacity,
        );

        Ok(Self {
            shared: Arc::new(Shared {
                source: ThrottledSource::new(source),
                max_matches: config.crawler.max_matches,
                state: StateCell::new(CrawlState::Idle),
                history,
                filters: RwLock::new(filters),
                output: RwLock::new(output),
                observer: RwLock::new(Arc::new(NoopObserver)),
                last_error: Mutex::new(None),
            }),
            task: Mutex::new(None),
        })
    }

    /// Current crawl state.
    pub fn state(&self) -> CrawlState {
        self.shared.state.load()
    }

    /// The error that ended the last crawl, if any.
    pub fn last_error(&self) -> Option<RemoteError> {
        self.shared.last_error.lock().unwrap().clone()
    }

    /// The visited history, readable for diagnostics while crawling.
    pub fn history(&self) -> &VisitedHistory {
        &self.shared.history
    }

    /// Replaces both predicates. Takes effect at the next loop iteration.
    pub fn set_filters(&self, filters: CrawlFilters) {
        *self.shared.filters.write().unwrap() = filters;
        tracing::info!("crawl filters replaced");
    }

    /// Replaces the output pipeline. Takes effect at the next batch.
    pub fn set_output(&self, output: Arc<dyn OutputHandler>) {
        *self.shared.output.write().unwrap() = output;
        tracing::info!("output pipeline replaced");
    }

    /// Replaces the observer.
    pub fn set_observer(&self, observer: Arc<dyn CrawlObserver>) {
        *self.shared.observer.write().unwrap() = observer;
    }

    /// Fetches the seed player and, if the player predicate accepts it,
    /// starts the background traversal.
    ///
    /// Returns `Ok(true)` when a crawl was started, `Ok(false)` when the
    /// seed was rejected (the engine stays `Idle`). A seed whose predicate
    /// errors counts as rejected. Fails with [`RifthopError::AlreadyRunning`]
    /// if a crawl is already in progress.
    pub async fn run(&self, seed_name: &str, region: Region) -> Result<bool> {
        let shared = &self.shared;

        tracing::info!(name = seed_name, %region, "fetching seed player");
        let seed = shared.source.player_by_name(seed_name, region).await?;

        let accepted = match shared.filters().player_filter.test(&seed) {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::warn!(player = %seed.key(), error = %e, "seed predicate failed, treating as rejection");
                false
            }
        };

        if !accepted {
            shared.observer().on_seed_rejected(&seed);
            tracing::info!(player = %seed.key(), "seed player rejected, staying idle");
            return Ok(false);
        }

        if !shared
            .state
            .compare_exchange(CrawlState::Idle, CrawlState::Crawling)
        {
            return Err(RifthopError::AlreadyRunning);
        }
        shared.observer().on_transition(CrawlState::Idle, CrawlState::Crawling);
        shared.observer().on_seed_accepted(&seed);
        *shared.last_error.lock().unwrap() = None;

        let task_shared = Arc::clone(shared);
        let handle = tokio::spawn(traverse(task_shared, seed));
        *self.task.lock().unwrap() = Some(handle);

        Ok(true)
    }

    /// Requests a stop. Advisory: the traversal observes it at its next
    /// iteration boundary, letting any in-flight fetch or throttle sleep
    /// complete. Idempotent.
    pub fn stop(&self) {
        let from = self.shared.state.swap(CrawlState::Idle);
        if from != CrawlState::Idle {
            tracing::info!("stop requested, crawl will halt at the next iteration");
            self.shared.observer().on_transition(from, CrawlState::Idle);
        }
    }

    /// Waits for the background traversal to finish, if one was started.
    pub async fn wait(&self) {
        let handle = self.task.lock().unwrap().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "traversal task failed");
            }
        }
    }
}

/// The background traversal loop.
///
/// `pending` carries the seek target installed by a successful backtrack:
/// when present, the next crawling iteration seeks from it instead of
/// fetching the current player's batch again.
async fn traverse(shared: Arc<Shared>, seed: Player) {
    let mut current = seed;
    let mut pending: Option<Arc<VisitedEntry>> = None;

    loop {
        match shared.state.load() {
            CrawlState::Idle => break,

            CrawlState::Crawling => {
                let batch = match pending.take() {
                    Some(entry) => entry.batch.clone(),
                    None => {
                        tracing::info!(player = %current.key(), "crawling player");
                        match shared.source.match_batch(&current, shared.max_matches).await {
                            Ok(batch) => {
                                shared.history.record(current.clone(), batch.clone());
                                shared.observer().on_visit(&current, &batch);
                                shared.output_handler().handle_batch(&batch);
                                batch
                            }
                            Err(e) => {
                                tracing::error!(
                                    player = %current.key(),
                                    error = %e,
                                    "failed to fetch match batch, halting crawl"
                                );
                                shared.observer().on_fatal(&e);
                                *shared.last_error.lock().unwrap() = Some(e);
                                shared.transition(CrawlState::Idle);
                                break;
                            }
                        }
                    }
                };

                match seek_next(&shared, &batch).await {
                    Some(next) => {
                        shared.observer().on_seek_accepted(&next);
                        current = next;
                    }
                    None => {
                        shared.observer().on_seek_exhausted(&current);
                        shared.transition(CrawlState::Backtracking);
                    }
                }
            }

            CrawlState::Backtracking => {
                let removed = shared.history.remove(&current.key());
                match shared.history.random_entry() {
                    None => {
                        shared.observer().on_backtrack_exhausted();
                        shared.transition(CrawlState::Idle);
                    }
                    Some(entry) => {
                        // The draw never yields the current player because
                        // its entry is out of the history for the draw.
                        if let Some(removed) = removed {
                            shared.history.restore(removed);
                        }
                        shared.observer().on_backtrack(&current, &entry.player);
                        current = entry.player.clone();
                        pending = Some(entry);
                        shared.transition(CrawlState::Crawling);
                    }
                }
            }
        }
    }

    tracing::info!("crawl loop exited");
}

/// Seeks the next player to crawl from a batch.
///
/// Matches are scanned in fetch order. For each match passing the match
/// predicate, participants are drawn uniformly at random from a shrinking
/// candidate set; the first resolved player passing the player predicate
/// and not already in the visited history wins. Failures local to one
/// candidate (resolution error, predicate error) skip that candidate.
async fn seek_next(shared: &Arc<Shared>, batch: &MatchBatch) -> Option<Player> {
    let filters = shared.filters();
    let observer = shared.observer();

    for m in batch {
        match filters.match_filter.test(m) {
            Ok(true) => {}
            Ok(false) => {
                observer.on_match_rejected(m);
                continue;
            }
            Err(e) => {
                tracing::warn!(game_id = m.game_id, error = %e, "match predicate failed, skipping match");
                continue;
            }
        }

        let mut candidates: Vec<&Participant> = m.participants.iter().collect();
        while !candidates.is_empty() {
            let index = rand::thread_rng().gen_range(0..candidates.len());
            let participant = candidates.swap_remove(index);

            let player = match shared
                .source
                .player_by_id(&participant.player_id, participant.region)
                .await
            {
                Ok(player) => player,
                Err(e) => {
                    tracing::warn!(
                        player_id = %participant.player_id,
                        error = %e,
                        "failed to resolve participant, skipping candidate"
                    );
                    continue;
                }
            };

            let accepted = match filters.player_filter.test(&player) {
                Ok(verdict) => verdict,
                Err(e) => {
                    tracing::warn!(player = %player.key(), error = %e, "player predicate failed, skipping candidate");
                    false
                }
            };

            if accepted && !shared.history.contains(&player.key()) {
                return Some(player);
            }
            observer.on_candidate_rejected(&player);
        }
    }

    None
}
