//! Output handler traits and types

use crate::model::{Match, MatchBatch};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("Failed to serialize match: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Consumer of discovered matches.
///
/// Implementations must be thread-safe; the crawler calls them from its
/// background traversal task.
pub trait OutputHandler: Send + Sync {
    /// Handles a single match.
    fn handle(&self, m: &Match) -> OutputResult<()>;

    /// Handles a whole batch in fetch order.
    ///
    /// Each item's failure is isolated and logged; processing always
    /// continues to the next item.
    fn handle_batch(&self, batch: &MatchBatch) {
        for m in batch {
            if let Err(e) = self.handle(m) {
                tracing::warn!(
                    game_id = m.game_id,
                    error = %e,
                    "output handler failed for match, continuing with batch"
                );
            }
        }
    }
}

/// Reshapes a match into an output representation.
pub trait MatchFormatter<T>: Send + Sync {
    fn format(&self, m: &Match) -> OutputResult<T>;
}

/// Terminal consumer of formatted values.
pub trait Sink<T>: Send + Sync {
    fn accept(&self, value: T) -> OutputResult<()>;
}

/// Adapts a closure into a [`Sink`].
pub struct FnSink<F>(F);

impl<F> FnSink<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<T, F> Sink<T> for FnSink<F>
where
    F: Fn(T) -> OutputResult<()> + Send + Sync,
{
    fn accept(&self, value: T) -> OutputResult<()> {
        (self.0)(value)
    }
}
