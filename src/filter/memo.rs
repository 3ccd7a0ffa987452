//! Predicate memoization
//!
//! Wraps a filter with a verdict cache keyed by entity identity, so that
//! repeated tests of the same player or match within the cache window do
//! not re-run the underlying predicate. Entries expire after a fixed
//! duration and the cache is capacity-bounded with LRU-style eviction.

use crate::filter::{Filter, FilterResult};
use crate::model::Identity;
use moka::sync::Cache;
use std::time::Duration;

/// Default verdict lifetime: 3 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3 * 60 * 60);

/// Default maximum number of cached verdicts.
pub const DEFAULT_CAPACITY: u64 = 100_000;

/// A [`Filter`] wrapper that caches verdicts by entity identity.
///
/// Only successful evaluations are cached. A failing evaluation is
/// surfaced to the caller and re-evaluated directly on every subsequent
/// test, so a transient predicate failure never poisons the cache.
///
/// The wrapped predicate must be referentially transparent: the same
/// entity identity must map to the same verdict for as long as an entry
/// may live. Non-deterministic predicates are a misuse this wrapper does
/// not protect against.
pub struct MemoizingFilter<T: Identity> {
    inner: Box<dyn Filter<T>>,
    cache: Cache<T::Key, bool>,
}

impl<T: Identity> MemoizingFilter<T> {
    /// Memoizes `inner` with the default 3-hour / 100 000-entry cache.
    pub fn new(inner: Box<dyn Filter<T>>) -> Self {
        Self::with_cache(inner, DEFAULT_TTL, DEFAULT_CAPACITY)
    }

    /// Memoizes `inner` with an explicit verdict lifetime and capacity.
    pub fn with_cache(inner: Box<dyn Filter<T>>, ttl: Duration, capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();

        Self { inner, cache }
    }

    /// Returns the cached verdict for a key, if one is live.
    pub fn cached_verdict(&self, key: &T::Key) -> Option<bool> {
        self.cache.get(key)
    }

    /// Number of live cached verdicts. Eventually consistent.
    pub fn cached_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl<T: Identity> Filter<T> for MemoizingFilter<T> {
    fn test(&self, item: &T) -> FilterResult {
        let key = item.identity();

        if let Some(verdict) = self.cache.get(&key) {
            return Ok(verdict);
        }

        let verdict = self.inner.test(item)?;
        self.cache.insert(key, verdict);
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterError, FnFilter};
    use crate::model::{Player, Rank, Region};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn player(id: &str, level: u32) -> Player {
        Player {
            id: id.to_string(),
            name: id.to_string(),
            region: Region::Euw,
            level,
            rank: Some(Rank::Silver),
        }
    }

    /// A filter that counts invocations of the underlying predicate.
    struct CountingFilter {
        calls: Arc<AtomicUsize>,
        verdict: bool,
    }

    impl Filter<Player> for CountingFilter {
        fn test(&self, _item: &Player) -> FilterResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.verdict)
        }
    }

    #[test]
    fn test_second_test_hits_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let memo = MemoizingFilter::new(Box::new(CountingFilter {
            calls: calls.clone(),
            verdict: true,
        }));

        let p = player("abc", 30);
        assert!(memo.test(&p).unwrap());
        assert!(memo.test(&p).unwrap());

        // Underlying predicate ran exactly once for the same identity.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_distinct_identities_evaluated_separately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let memo = MemoizingFilter::new(Box::new(CountingFilter {
            calls: calls.clone(),
            verdict: false,
        }));

        assert!(!memo.test(&player("a", 1)).unwrap());
        assert!(!memo.test(&player("b", 1)).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cached_verdict_inspection() {
        let memo = MemoizingFilter::new(Box::new(FnFilter::new(|p: &Player| p.level >= 30)));

        let p = player("abc", 42);
        assert_eq!(memo.cached_verdict(&p.key()), None);
        memo.test(&p).unwrap();
        assert_eq!(memo.cached_verdict(&p.key()), Some(true));
    }

    #[test]
    fn test_errors_are_not_cached() {
        struct FlakyFilter {
            calls: Arc<AtomicUsize>,
        }

        impl Filter<Player> for FlakyFilter {
            fn test(&self, _item: &Player) -> FilterResult {
                let n = self.calls.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    Err(FilterError::Evaluation("transient".to_string()))
                } else {
                    Ok(true)
                }
            }
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let memo = MemoizingFilter::new(Box::new(FlakyFilter {
            calls: calls.clone(),
        }));

        let p = player("abc", 30);
        assert!(memo.test(&p).is_err());
        // Second attempt falls through to direct evaluation and succeeds.
        assert!(memo.test(&p).unwrap());
        // Third is a cache hit.
        assert!(memo.test(&p).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_expired_entry_is_reevaluated() {
        let calls = Arc::new(AtomicUsize::new(0));
        let memo = MemoizingFilter::with_cache(
            Box::new(CountingFilter {
                calls: calls.clone(),
                verdict: true,
            }),
            Duration::from_millis(10),
            100,
        );

        let p = player("abc", 30);
        memo.test(&p).unwrap();
        std::thread::sleep(Duration::from_millis(30));
        memo.test(&p).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
