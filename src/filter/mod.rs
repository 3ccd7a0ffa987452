//! Acceptance predicates over players and matches
//!
//! Filters decide which nodes (players) and edges (matches) of the graph
//! are worth visiting. They compose with boolean combinators, can be
//! memoized by entity identity, and a handful of presets cover the common
//! cases (minimum duration, queue allowlist, minimum level/rank).
//!
//! A filter returning an error means "skip this candidate" to the crawler,
//! never "abort the traversal".

mod match_filters;
mod memo;
mod player_filters;

pub use match_filters::{MinDurationMatchFilter, QueueMatchFilter};
pub use memo::MemoizingFilter;
pub use player_filters::{MinLevelPlayerFilter, MinRankPlayerFilter};

use crate::config::Config;
use crate::model::{Match, Player};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by predicate evaluation
#[derive(Debug, Clone, Error)]
pub enum FilterError {
    #[error("predicate evaluation failed: {0}")]
    Evaluation(String),
}

/// Result type alias for filter operations
pub type FilterResult = std::result::Result<bool, FilterError>;

/// A boolean acceptance test over an entity.
///
/// Implementations must be referentially transparent when wrapped in a
/// [`MemoizingFilter`]: the same entity identity must always produce the
/// same verdict within the cache window.
pub trait Filter<T>: Send + Sync {
    fn test(&self, item: &T) -> FilterResult;
}

/// A filter that accepts everything.
pub struct AllowAll;

impl<T> Filter<T> for AllowAll {
    fn test(&self, _item: &T) -> FilterResult {
        Ok(true)
    }
}

/// Adapts a plain closure into a [`Filter`].
pub struct FnFilter<F>(F);

impl<F> FnFilter<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<T, F> Filter<T> for FnFilter<F>
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn test(&self, item: &T) -> FilterResult {
        Ok((self.0)(item))
    }
}

/// Conjunction of filters. Empty conjunction accepts everything.
///
/// Evaluation short-circuits on the first rejection; an evaluation error
/// propagates immediately.
pub struct AndFilter<T> {
    filters: Vec<Box<dyn Filter<T>>>,
}

impl<T> AndFilter<T> {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    pub fn with(mut self, filter: impl Filter<T> + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl<T> Default for AndFilter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Filter<T> for AndFilter<T> {
    fn test(&self, item: &T) -> FilterResult {
        for filter in &self.filters {
            if !filter.test(item)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Disjunction of filters. Empty disjunction rejects everything.
pub struct OrFilter<T> {
    filters: Vec<Box<dyn Filter<T>>>,
}

impl<T> OrFilter<T> {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    pub fn with(mut self, filter: impl Filter<T> + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl<T> Default for OrFilter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Filter<T> for OrFilter<T> {
    fn test(&self, item: &T) -> FilterResult {
        for filter in &self.filters {
            if filter.test(item)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Negation of a filter.
pub struct NotFilter<T> {
    inner: Box<dyn Filter<T>>,
}

impl<T> NotFilter<T> {
    pub fn new(inner: impl Filter<T> + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }
}

impl<T> Filter<T> for NotFilter<T> {
    fn test(&self, item: &T) -> FilterResult {
        Ok(!self.inner.test(item)?)
    }
}

/// The pair of predicates driving a crawl, swappable at runtime.
#[derive(Clone)]
pub struct CrawlFilters {
    pub match_filter: Arc<dyn Filter<Match>>,
    pub player_filter: Arc<dyn Filter<Player>>,
}

impl CrawlFilters {
    /// Filters that accept every match and every player.
    pub fn allow_all() -> Self {
        Self {
            match_filter: Arc::new(AllowAll),
            player_filter: Arc::new(AllowAll),
        }
    }
}

/// Assembles the configured filter presets, AND-composed and memoized with
/// the configured cache settings.
///
/// Unset preset knobs contribute nothing; with no knobs set at all both
/// predicates accept everything (the memo layer still applies).
pub fn build_filters(config: &Config) -> CrawlFilters {
    let ttl = Duration::from_secs(config.filter_cache.ttl_secs);
    let capacity = config.filter_cache.capacity;

    let mut match_filter = AndFilter::new();
    if let Some(secs) = config.filters.min_match_duration_secs {
        match_filter = match_filter.with(MinDurationMatchFilter::new(Duration::from_secs(secs)));
    }
    if !config.filters.queues.is_empty() {
        match_filter = match_filter.with(QueueMatchFilter::new(config.filters.queues.clone()));
    }

    let mut player_filter = AndFilter::new();
    if let Some(level) = config.filters.min_level {
        player_filter = player_filter.with(MinLevelPlayerFilter::new(level));
    }
    if let Some(rank) = config.filters.min_rank {
        player_filter = player_filter.with(MinRankPlayerFilter::new(rank));
    }

    CrawlFilters {
        match_filter: Arc::new(MemoizingFilter::with_cache(
            Box::new(match_filter),
            ttl,
            capacity,
        )),
        player_filter: Arc::new(MemoizingFilter::with_cache(
            Box::new(player_filter),
            ttl,
            capacity,
        )),
    }
}
