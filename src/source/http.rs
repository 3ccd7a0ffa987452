//! HTTP implementation of the remote source
//!
//! Talks to a match API over HTTPS and maps its responses onto the crawler's
//! model types. Only the fields the crawler consumes are modeled; the rest
//! of the remote schema is deliberately ignored.

use crate::model::{Match, MatchBatch, Player, Region};
use crate::source::{RemoteError, RemoteResult, RemoteSource};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Header carrying the API key on every request.
const API_KEY_HEADER: &str = "X-Api-Key";

/// Fallback throttle window when a 429 arrives without a Retry-After header.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Builds the HTTP client used for all remote calls.
///
/// # Example
///
/// ```no_run
/// use rifthop::source::build_http_client;
///
/// let client = build_http_client().unwrap();
/// ```
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("rifthop/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Wire shape of a match-batch response.
#[derive(Debug, Deserialize)]
struct BatchPayload {
    matches: Vec<Match>,
}

/// A [`RemoteSource`] backed by an HTTP match API.
///
/// Endpoints, relative to the configured base URL:
/// - `players/by-name/{region}/{name}`
/// - `players/{region}/{id}`
/// - `players/{region}/{id}/matches?count={max}`
pub struct HttpRemoteSource {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl HttpRemoteSource {
    /// Creates a source for the given API base URL and key.
    ///
    /// The base URL is normalized to end with a slash so relative endpoint
    /// paths join under it rather than replacing its last segment.
    pub fn new(client: Client, mut base_url: Url, api_key: String) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            client,
            base_url,
            api_key,
        }
    }

    fn endpoint(&self, path: &str) -> RemoteResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| RemoteError::Transport {
                endpoint: path.to_string(),
                message: e.to_string(),
            })
    }

    /// Sends a GET and decodes the JSON body, classifying failures into
    /// the [`RemoteError`] taxonomy.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> RemoteResult<T> {
        let endpoint = url.path().to_string();

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| RemoteError::Transport {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(RemoteError::RateLimited {
                retry_after: retry_after_of(&response),
            });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound(endpoint));
        }

        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                endpoint,
            });
        }

        response.json::<T>().await.map_err(|e| RemoteError::Decode {
            endpoint,
            message: e.to_string(),
        })
    }
}

/// Reads the Retry-After header as whole seconds.
fn retry_after_of(response: &Response) -> Duration {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

#[async_trait]
impl RemoteSource for HttpRemoteSource {
    async fn player_by_name(&self, name: &str, region: Region) -> RemoteResult<Player> {
        let url = self.endpoint(&format!("players/by-name/{}/{}", region, name))?;
        self.get_json(url).await
    }

    async fn player_by_id(&self, id: &str, region: Region) -> RemoteResult<Player> {
        let url = self.endpoint(&format!("players/{}/{}", region, id))?;
        self.get_json(url).await
    }

    async fn match_batch(&self, player: &Player, max: usize) -> RemoteResult<MatchBatch> {
        let mut url = self.endpoint(&format!(
            "players/{}/{}/matches",
            player.region, player.id
        ))?;
        url.query_pairs_mut()
            .append_pair("count", &max.to_string());

        let payload: BatchPayload = self.get_json(url).await?;
        Ok(MatchBatch::new(payload.matches))
    }
}
