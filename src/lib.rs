//! Rifthop: a match-graph crawler for online-game players
//!
//! This crate implements a rate-limited traversal over the social graph of
//! game players connected by shared match participation. Starting from a
//! seed player it fetches recent matches, emits them to an output pipeline,
//! hops to a randomly chosen accepted participant, and backtracks through
//! recently visited players when it hits a dead end.

pub mod config;
pub mod crawler;
pub mod filter;
pub mod history;
pub mod model;
pub mod output;
pub mod source;

use thiserror::Error;

/// Main error type for rifthop operations
#[derive(Debug, Error)]
pub enum RifthopError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Remote source error: {0}")]
    Remote(#[from] source::RemoteError),

    #[error("Filter error: {0}")]
    Filter(#[from] filter::FilterError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Crawler is already running")]
    AlreadyRunning,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for rifthop operations
pub type Result<T> = std::result::Result<T, RifthopError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, CrawlState};
pub use history::VisitedHistory;
pub use model::{Match, MatchBatch, Participant, Player, PlayerKey, Region};
pub use source::{RemoteError, RemoteSource};
