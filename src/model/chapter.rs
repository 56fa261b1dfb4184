use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Plot assigned to chapters that carry no (or an empty) `@plot:` marker.
pub const DEFAULT_PLOT: &str = "geen_plot";

/// Date format used for every `@time:` marker, on read and on write.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Normalized front-matter of one chapter file.
///
/// Built fresh on every directory scan. When written back, the record is the
/// only source of truth: the file's previous front-matter is regenerated
/// from it, not merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRecord {
    pub chapter_name: String,
    pub source_path: PathBuf,
    pub plot: String,
    #[serde(default)]
    pub point_of_view: String,
    #[serde(default)]
    pub characters: String,
    #[serde(default)]
    pub synopsis: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Error returned by [`ChapterRecord::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{path}: start date {start} is after end date {end}")]
pub struct RangeError {
    pub path: PathBuf,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ChapterRecord {
    /// Individual story threads, split on commas and trimmed.
    ///
    /// A chapter with an empty plot list belongs to [`DEFAULT_PLOT`].
    pub fn plots(&self) -> Vec<&str> {
        let threads: Vec<&str> = self
            .plot
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        if threads.is_empty() {
            vec![DEFAULT_PLOT]
        } else {
            threads
        }
    }

    /// Whether this chapter belongs to `thread` (one of its comma-separated plots).
    pub fn has_plot(&self, thread: &str) -> bool {
        self.plots().iter().any(|p| *p == thread.trim())
    }

    /// Number of days covered, counting `end_date` as exclusive.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Check the `start_date <= end_date` invariant.
    pub fn validate(&self) -> Result<(), RangeError> {
        if self.start_date > self.end_date {
            return Err(RangeError {
                path: self.source_path.clone(),
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }
}
