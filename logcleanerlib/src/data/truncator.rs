//! Dropping log lines older than a cutoff.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::timestamp::extract_timestamp;

/// Outcome of truncating one log file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruncationResult {
    /// Whether at least one line was dropped
    pub modified: bool,
    /// Retained lines, verbatim and in input order
    pub kept_lines: Vec<String>,
    /// Number of lines dropped
    pub lines_removed: usize,
}

impl TruncationResult {
    /// The retained lines joined back into file content.
    pub fn content(&self) -> String {
        self.kept_lines.concat()
    }
}

/// Why a line was kept or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Empty or whitespace-only
    Blank,
    /// No timestamp could be extracted
    Undated,
    /// Timestamp at or after the cutoff
    Current,
    /// Timestamp strictly before the cutoff
    Stale,
}

impl Retention {
    pub fn is_kept(&self) -> bool {
        !matches!(self, Self::Stale)
    }
}

/// Decide the fate of a single line.
pub fn retention(line: &str, cutoff: NaiveDateTime) -> Retention {
    if line.trim().is_empty() {
        return Retention::Blank;
    }
    match extract_timestamp(line) {
        None => Retention::Undated,
        Some(ts) if ts >= cutoff => Retention::Current,
        Some(_) => Retention::Stale,
    }
}

/// Drop every line whose timestamp is strictly before `cutoff`.
///
/// Blank lines and lines without a parseable timestamp are always kept.
///
/// # Example
///
/// ```rust
/// use logcleanerlib::truncate;
/// use chrono::NaiveDate;
///
/// let cutoff = NaiveDate::from_ymd_opt(2024, 2, 16).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let lines = ["2024-02-15 10:30:45 INFO old\n", "\n", "2024-02-17 09:00:00 INFO new\n"];
/// let result = truncate(&lines, cutoff);
///
/// assert_eq!(result.lines_removed, 1);
/// assert_eq!(result.kept_lines, vec!["\n", "2024-02-17 09:00:00 INFO new\n"]);
/// ```
pub fn truncate<S: AsRef<str>>(lines: &[S], cutoff: NaiveDateTime) -> TruncationResult {
    let mut result = TruncationResult::default();

    for line in lines {
        let line = line.as_ref();
        if retention(line, cutoff).is_kept() {
            result.kept_lines.push(line.to_string());
        } else {
            result.lines_removed += 1;
        }
    }

    result.modified = result.lines_removed > 0;
    result
}
