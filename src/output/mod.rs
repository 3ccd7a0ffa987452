//! Output pipeline for discovered matches
//!
//! Every match the crawler fetches is forwarded here. The pipeline is a
//! stack of small decorators around a base "format then send" step:
//! filtering (drop matches a predicate rejects) and formatting (reshape a
//! match into an arbitrary representation) compose freely without the
//! crawler knowing which are active.
//!
//! Failures are isolated per item: one match failing to format or write
//! never aborts the rest of its batch, let alone the traversal.

mod file;
mod formatter;
mod handlers;
mod traits;

pub use file::FileOutputHandler;
pub use formatter::JsonMatchFormatter;
pub use handlers::{FilteringOutputHandler, FormattingOutputHandler, PrintOutputHandler};
pub use traits::{FnSink, MatchFormatter, OutputError, OutputHandler, OutputResult, Sink};
