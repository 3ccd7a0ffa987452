use crate::model::Rank;
use serde::Deserialize;

/// Main configuration structure for rifthop
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(rename = "filter-cache", default)]
    pub filter_cache: FilterCacheConfig,
    #[serde(default)]
    pub filters: FilterPresetConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Remote API access configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the match API
    #[serde(rename = "base-url", default)]
    pub base_url: String,

    /// API key sent with every request
    #[serde(default)]
    pub key: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of recent matches to fetch per visited player (1-100)
    #[serde(rename = "max-matches", default = "default_max_matches")]
    pub max_matches: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_matches: default_max_matches(),
        }
    }
}

fn default_max_matches() -> usize {
    20
}

/// Visited-history retention configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// How long a visited entry stays live (seconds)
    #[serde(rename = "retention-secs", default = "default_retention_secs")]
    pub retention_secs: u64,

    /// Maximum number of live visited entries
    #[serde(default = "default_history_capacity")]
    pub capacity: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            retention_secs: default_retention_secs(),
            capacity: default_history_capacity(),
        }
    }
}

fn default_retention_secs() -> u64 {
    24 * 60 * 60
}

fn default_history_capacity() -> u64 {
    100_000
}

/// Predicate memoization cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FilterCacheConfig {
    /// How long a cached verdict stays live (seconds)
    #[serde(rename = "ttl-secs", default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,

    /// Maximum number of cached verdicts per predicate
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
}

impl Default for FilterCacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
            capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_ttl_secs() -> u64 {
    3 * 60 * 60
}

fn default_cache_capacity() -> u64 {
    100_000
}

/// Filter preset selection
///
/// Every knob is optional; set knobs are AND-composed. With nothing set,
/// all matches and players are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterPresetConfig {
    /// Reject matches shorter than this many seconds
    #[serde(rename = "min-match-duration-secs", default)]
    pub min_match_duration_secs: Option<u64>,

    /// Accept only matches played in one of these queues
    #[serde(default)]
    pub queues: Vec<u32>,

    /// Reject players below this account level
    #[serde(rename = "min-level", default)]
    pub min_level: Option<u32>,

    /// Reject players below this ranked tier
    #[serde(rename = "min-rank", default)]
    pub min_rank: Option<Rank>,
}

/// Output pipeline selection
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Where discovered matches go
    #[serde(default)]
    pub mode: OutputMode,

    /// Base directory for `mode = "file"`
    #[serde(default)]
    pub directory: Option<String>,
}

/// Output sink kinds selectable from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Print,
    File,
}
