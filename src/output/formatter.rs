//! Match formatters

use crate::model::Match;
use crate::output::{MatchFormatter, OutputResult};

/// Serializes a match to a JSON string.
#[derive(Debug, Default)]
pub struct JsonMatchFormatter {
    pretty: bool,
}

impl JsonMatchFormatter {
    /// Compact JSON, one line per match.
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Human-readable indented JSON.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl MatchFormatter<String> for JsonMatchFormatter {
    fn format(&self, m: &Match) -> OutputResult<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(m)?
        } else {
            serde_json::to_string(m)?
        };
        Ok(json)
    }
}
