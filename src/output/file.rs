//! File-based output handler
//!
//! Writes each match as `<game_id>.json` under a results directory. Files
//! are staged in a sibling building directory and renamed into place once
//! fully written, so readers never observe a half-written result. Game ids
//! already present in the results directory at startup are treated as
//! stored and skipped.
//!
//! The handler assumes the directory tree is not modified externally while
//! it is running.

use crate::model::Match;
use crate::output::{JsonMatchFormatter, MatchFormatter, OutputHandler, OutputResult};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Output handler that persists one JSON file per match.
pub struct FileOutputHandler {
    building_dir: PathBuf,
    results_dir: PathBuf,
    formatter: Box<dyn MatchFormatter<String>>,
    stored: Mutex<HashSet<u64>>,
}

impl FileOutputHandler {
    /// Creates the handler rooted at `directory`, creating the
    /// `building/` and `results/` subdirectories as needed and seeding
    /// the duplicate set from existing result files.
    pub fn new(directory: &Path) -> OutputResult<Self> {
        Self::with_formatter(directory, Box::new(JsonMatchFormatter::pretty()))
    }

    /// Same as [`FileOutputHandler::new`] with a custom formatter.
    pub fn with_formatter(
        directory: &Path,
        formatter: Box<dyn MatchFormatter<String>>,
    ) -> OutputResult<Self> {
        let building_dir = directory.join("building");
        let results_dir = directory.join("results");
        fs::create_dir_all(&building_dir)?;
        fs::create_dir_all(&results_dir)?;

        let stored = load_stored_ids(&results_dir)?;
        tracing::info!(
            count = stored.len(),
            dir = %results_dir.display(),
            "seeded stored match set from results directory"
        );

        Ok(Self {
            building_dir,
            results_dir,
            formatter,
            stored: Mutex::new(stored),
        })
    }

    /// Whether a match with this game id has already been written.
    pub fn is_stored(&self, game_id: u64) -> bool {
        self.stored.lock().unwrap().contains(&game_id)
    }
}

/// Collects game ids from `<id>.json` filenames; anything else is ignored.
fn load_stored_ids(results_dir: &Path) -> OutputResult<HashSet<u64>> {
    let mut stored = HashSet::new();
    for entry in fs::read_dir(results_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if let Some(stem) = name.strip_suffix(".json") {
            if let Ok(id) = stem.parse::<u64>() {
                stored.insert(id);
            } else {
                tracing::warn!(file = %name, "non-match file in results directory");
            }
        }
    }
    Ok(stored)
}

impl OutputHandler for FileOutputHandler {
    fn handle(&self, m: &Match) -> OutputResult<()> {
        {
            let stored = self.stored.lock().unwrap();
            if stored.contains(&m.game_id) {
                tracing::debug!(game_id = m.game_id, "match already stored, skipping");
                return Ok(());
            }
        }

        let json = self.formatter.format(m)?;

        let build_path = self.building_dir.join(format!("{}.json.tmp", m.game_id));
        let final_path = self.results_dir.join(format!("{}.json", m.game_id));

        fs::write(&build_path, json)?;
        fs::rename(&build_path, &final_path)?;

        self.stored.lock().unwrap().insert(m.game_id);
        tracing::debug!(game_id = m.game_id, path = %final_path.display(), "stored match");
        Ok(())
    }
}
