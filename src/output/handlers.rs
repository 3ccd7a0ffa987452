//! Output handler decorators and the stdout preset

use crate::filter::Filter;
use crate::model::Match;
use crate::output::{JsonMatchFormatter, MatchFormatter, OutputHandler, OutputResult, Sink};
use std::io::Write;

/// Formats each match and hands the result to a sink.
///
/// This is the base "format then send" step the other decorators wrap.
pub struct FormattingOutputHandler<T> {
    formatter: Box<dyn MatchFormatter<T>>,
    sink: Box<dyn Sink<T>>,
}

impl<T> FormattingOutputHandler<T> {
    pub fn new(formatter: Box<dyn MatchFormatter<T>>, sink: Box<dyn Sink<T>>) -> Self {
        Self { formatter, sink }
    }
}

impl<T> OutputHandler for FormattingOutputHandler<T> {
    fn handle(&self, m: &Match) -> OutputResult<()> {
        let value = self.formatter.format(m)?;
        self.sink.accept(value)
    }
}

/// Forwards only matches passing a predicate to the wrapped handler.
///
/// A predicate error drops the item, logged, and never reaches the
/// wrapped handler.
pub struct FilteringOutputHandler {
    filter: Box<dyn Filter<Match>>,
    inner: Box<dyn OutputHandler>,
}

impl FilteringOutputHandler {
    pub fn new(filter: Box<dyn Filter<Match>>, inner: Box<dyn OutputHandler>) -> Self {
        Self { filter, inner }
    }
}

impl OutputHandler for FilteringOutputHandler {
    fn handle(&self, m: &Match) -> OutputResult<()> {
        match self.filter.test(m) {
            Ok(true) => self.inner.handle(m),
            Ok(false) => Ok(()),
            Err(e) => {
                tracing::warn!(
                    game_id = m.game_id,
                    error = %e,
                    "output filter failed, dropping match"
                );
                Ok(())
            }
        }
    }
}

/// Writes each match to stdout, one JSON line per match.
pub struct PrintOutputHandler {
    formatter: Box<dyn MatchFormatter<String>>,
}

impl PrintOutputHandler {
    pub fn new() -> Self {
        Self::with_formatter(Box::new(JsonMatchFormatter::new()))
    }

    pub fn with_formatter(formatter: Box<dyn MatchFormatter<String>>) -> Self {
        Self { formatter }
    }
}

impl Default for PrintOutputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputHandler for PrintOutputHandler {
    fn handle(&self, m: &Match) -> OutputResult<()> {
        let line = self.formatter.format(m)?;
        let stdout = std::io::stdout();
        let mut lock = stdout.lock();
        writeln!(lock, "{}", line)?;
        Ok(())
    }
}
