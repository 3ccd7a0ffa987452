//! Crawler module - the traversal engine
//!
//! This module contains the crawl state machine and its observation
//! hooks:
//! - `CrawlEngine` orchestrates fetch, emit, seek and backtrack
//! - `CrawlState` is the atomically shared Idle/Crawling/Backtracking mode
//! - `CrawlObserver` receives purely observational callbacks

mod engine;
mod observer;
mod state;

pub use engine::CrawlEngine;
pub use observer::{CrawlObserver, NoopObserver, TracingObserver};
pub use state::CrawlState;
