//! Remote source access
//!
//! This module defines the narrow contract the crawler has with the remote
//! match API, an HTTP implementation of it, and the throttling wrapper that
//! absorbs one rate-limit response per request before giving up.

mod http;
mod throttle;

pub use http::{build_http_client, HttpRemoteSource};
pub use throttle::ThrottledSource;

use crate::model::{MatchBatch, Player, Region};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by a remote source.
///
/// `RateLimited` is the only recoverable variant, and only once: the
/// throttling wrapper sleeps out the advertised delay and retries a single
/// time before surfacing whatever comes back next.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    #[error("rate limited by remote source, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("remote source returned HTTP {status} for {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("transport error for {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    #[error("failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

/// Result type alias for remote source operations
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// The remote match API as the crawler sees it.
///
/// Implementations fetch immutable snapshots; every call may fail with a
/// rate-limit signal carrying a retry-after duration, or a generic remote
/// error. Concrete wire formats are an implementation detail.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Looks a player up by display name within a region.
    async fn player_by_name(&self, name: &str, region: Region) -> RemoteResult<Player>;

    /// Looks a player up by stable id within a region.
    async fn player_by_id(&self, id: &str, region: Region) -> RemoteResult<Player>;

    /// Fetches up to `max` recent matches for a player, most recent first.
    async fn match_batch(&self, player: &Player, max: usize) -> RemoteResult<MatchBatch>;
}

#[async_trait]
impl<S: RemoteSource + ?Sized> RemoteSource for Arc<S> {
    async fn player_by_name(&self, name: &str, region: Region) -> RemoteResult<Player> {
        (**self).player_by_name(name, region).await
    }

    async fn player_by_id(&self, id: &str, region: Region) -> RemoteResult<Player> {
        (**self).player_by_id(id, region).await
    }

    async fn match_batch(&self, player: &Player, max: usize) -> RemoteResult<MatchBatch> {
        (**self).match_batch(player, max).await
    }
}
