//! Configuration module for rifthop
//!
//! Handles loading, parsing and validating TOML configuration files.
//! Validation happens synchronously at load time, before any traversal
//! starts; an engine is never constructed from out-of-bounds settings.
//!
//! # Example
//!
//! ```no_run
//! use rifthop::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Max matches per player: {}", config.crawler.max_matches);
//! ```

mod parser;
mod types;
pub mod validation;

// Re-export types
pub use types::{
    ApiConfig, Config, CrawlerConfig, FilterCacheConfig, FilterPresetConfig, HistoryConfig,
    OutputConfig, OutputMode,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
