//! Pruning stale entries from log files.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::FileError;
use crate::Result;

use super::lines::{read_lines, write_lines};
use super::truncator::{truncate, TruncationResult};

/// Options for a pruning session.
#[derive(Debug, Clone, Copy, Default)]
pub struct PruneOptions {
    /// Compute everything but write nothing
    pub dry_run: bool,
}

impl PruneOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable dry-run mode.
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }
}

/// What happened to one log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PruneFileReport {
    pub path: PathBuf,
    pub lines_removed: usize,
    pub lines_kept: usize,
}

impl PruneFileReport {
    /// Whether any line was dropped from this file.
    pub fn modified(&self) -> bool {
        self.lines_removed > 0
    }
}

/// Result of a pruning session.
#[derive(Debug, Clone, Serialize)]
pub struct PruneReport {
    /// Entries strictly before this instant were dropped
    pub cutoff: NaiveDateTime,
    /// Log files that had at least one line dropped
    pub files_cleaned: usize,
    /// Lines dropped across all files
    pub lines_removed: usize,
    /// Every log file that was read, in processing order
    pub files: Vec<PruneFileReport>,
    /// Files that could not be processed
    pub errors: Vec<FileError>,
    pub dry_run: bool,
}

impl PruneReport {
    fn new(cutoff: NaiveDateTime, dry_run: bool) -> Self {
        Self {
            cutoff,
            files_cleaned: 0,
            lines_removed: 0,
            files: Vec::new(),
            errors: Vec::new(),
            dry_run,
        }
    }

    fn record(&mut self, path: PathBuf, result: &TruncationResult) {
        if result.modified {
            self.files_cleaned += 1;
            self.lines_removed += result.lines_removed;
        }
        self.files.push(PruneFileReport {
            path,
            lines_removed: result.lines_removed,
            lines_kept: result.kept_lines.len(),
        });
    }
}

/// Drop log entries older than `cutoff` from each file.
///
/// A failure on one file is recorded in [`PruneReport::errors`] and the
/// session moves on.
///
/// # Example
///
/// ```rust
/// use logcleanerlib::{prune, PruneOptions};
/// use chrono::NaiveDate;
/// use std::fs;
/// use tempfile::tempdir;
///
/// let dir = tempdir().unwrap();
/// let log = dir.path().join("app.log");
/// fs::write(&log, "2024-01-01 00:00:00 old\n2024-03-01 00:00:00 new\n").unwrap();
///
/// let cutoff = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let report = prune(&[log.clone()], cutoff, PruneOptions::new());
///
/// assert_eq!(report.files_cleaned, 1);
/// assert_eq!(fs::read_to_string(&log).unwrap(), "2024-03-01 00:00:00 new\n");
/// ```
pub fn prune(files: &[PathBuf], cutoff: NaiveDateTime, options: PruneOptions) -> PruneReport {
    let mut report = PruneReport::new(cutoff, options.dry_run);

    for path in files {
        match prune_file(path, cutoff, options.dry_run) {
            Ok(result) => {
                if !result.modified {
                    tracing::debug!(path = %path.display(), "no cleaning needed");
                }
                report.record(path.clone(), &result);
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), "{err}");
                report.errors.push(FileError::new(path.clone(), &err));
            }
        }
    }

    report
}

fn prune_file(path: &Path, cutoff: NaiveDateTime, dry_run: bool) -> Result<TruncationResult> {
    let lines = read_lines(path)?;
    let result = truncate(&lines, cutoff);

    if result.modified && !dry_run {
        write_lines(path, &result.kept_lines)?;
        tracing::info!(
            path = %path.display(),
            removed = result.lines_removed,
            "pruned log file"
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    fn cutoff() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 16)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_prune_files() {
        let temp = tempdir().unwrap();
        let stale = temp.path().join("stale.log");
        let fresh = temp.path().join("fresh.log");
        fs::write(
            &stale,
            "2024-02-15 10:30:45 INFO Test\n  continuation\n\n2024-02-17 08:00:00 INFO Later\n",
        )
        .unwrap();
        fs::write(&fresh, "2024-02-20 10:30:45 INFO Fresh\n").unwrap();

        let report = prune(&[stale.clone(), fresh.clone()], cutoff(), PruneOptions::new());

        assert_eq!(report.files_cleaned, 1);
        assert_eq!(report.lines_removed, 1);
        assert_eq!(report.files.len(), 2);
        assert!(report.files[0].modified());
        assert!(!report.files[1].modified());
        assert_eq!(
            fs::read_to_string(&stale).unwrap(),
            "  continuation\n\n2024-02-17 08:00:00 INFO Later\n"
        );
        assert_eq!(
            fs::read_to_string(&fresh).unwrap(),
            "2024-02-20 10:30:45 INFO Fresh\n"
        );
    }

    #[test]
    fn test_prune_dry_run() {
        let temp = tempdir().unwrap();
        let log = temp.path().join("app.log");
        fs::write(&log, "2024-02-01 00:00:00 old\n").unwrap();

        let report = prune(&[log.clone()], cutoff(), PruneOptions::new().dry_run(true));

        assert!(report.dry_run);
        assert_eq!(report.lines_removed, 1);
        assert_eq!(
            fs::read_to_string(&log).unwrap(),
            "2024-02-01 00:00:00 old\n"
        );
    }

    #[test]
    fn test_prune_missing_file_recorded() {
        let temp = tempdir().unwrap();
        let log = temp.path().join("app.log");
        fs::write(&log, "2024-02-01 00:00:00 old\n").unwrap();

        let report = prune(
            &[temp.path().join("missing.log"), log],
            cutoff(),
            PruneOptions::new(),
        );

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.files_cleaned, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_prune_symlinked_log() {
        let temp = tempdir().unwrap();
        let real = temp.path().join("app-2024.log");
        let link = temp.path().join("current.log");
        fs::write(&real, "2020-01-01 00:00:00 old\n2030-01-01 00:00:00 new\n").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let report = prune(&[link.clone()], cutoff(), PruneOptions::new());

        assert_eq!(report.files_cleaned, 1);
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(
            fs::read_to_string(&real).unwrap(),
            "2030-01-01 00:00:00 new\n"
        );
    }
}
