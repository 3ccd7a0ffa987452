//! Rate-limit-aware fetch wrapper
//!
//! Wraps any [`RemoteSource`] so that a rate-limited call sleeps out the
//! server-specified delay (with a 10% safety margin) and is retried exactly
//! once. Anything past that single retry is surfaced to the caller, so a
//! misbehaving endpoint can never trap the crawler in a retry storm.

use crate::model::{MatchBatch, Player, Region};
use crate::source::{RemoteError, RemoteResult, RemoteSource};
use async_trait::async_trait;
use std::future::Future;

/// Scalar applied to the advertised retry-after delay, to make sure the
/// window has actually elapsed by the time the retry goes out.
const RETRY_MARGIN: f64 = 1.1;

/// A [`RemoteSource`] wrapper that absorbs one rate-limit response per call.
///
/// Only the calling task sleeps during the throttle window; unrelated
/// concurrent fetches through other tasks are unaffected.
pub struct ThrottledSource<S> {
    inner: S,
}

impl<S: RemoteSource> ThrottledSource<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// The wrapped source.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Runs `op`, retrying once after a throttle sleep if the first attempt
    /// was rate limited. A second failure of any kind propagates.
    async fn throttled<T, F, Fut>(&self, op: F) -> RemoteResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = RemoteResult<T>>,
    {
        match op().await {
            Ok(value) => Ok(value),
            Err(RemoteError::RateLimited { retry_after }) => {
                let wait = retry_after.mul_f64(RETRY_MARGIN);
                tracing::warn!(?wait, "rate limit reached, throttling before single retry");
                tokio::time::sleep(wait).await;
                op().await
            }
            Err(other) => Err(other),
        }
    }
}

#[async_trait]
impl<S: RemoteSource> RemoteSource for ThrottledSource<S> {
    async fn player_by_name(&self, name: &str, region: Region) -> RemoteResult<Player> {
        self.throttled(|| self.inner.player_by_name(name, region))
            .await
    }

    async fn player_by_id(&self, id: &str, region: Region) -> RemoteResult<Player> {
        self.throttled(|| self.inner.player_by_id(id, region)).await
    }

    async fn match_batch(&self, player: &Player, max: usize) -> RemoteResult<MatchBatch> {
        self.throttled(|| self.inner.match_batch(player, max)).await
    }
}
