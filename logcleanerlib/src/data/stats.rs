//! Aggregate statistics for cleaning sessions.
//!
//! The engines return per-file results; the session accumulates them here.
//! Only files that were actually modified contribute.

use std::collections::BTreeMap;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use super::rewriter::RewriteResult;

/// Totals for a statement-cleaning session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Files that had at least one statement removed
    pub files_processed: u64,
    /// Lines removed across all files
    pub lines_removed: u64,
    /// Removed statements per tag, e.g. `"console.log" -> 3`
    pub removed_statements: BTreeMap<String, u64>,
    /// Modified files per extension, e.g. `".py" -> 2`
    pub file_types_processed: BTreeMap<String, u64>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one rewritten file. Unmodified files are ignored.
    pub fn record_file(&mut self, extension: &str, result: &RewriteResult) {
        if !result.modified {
            return;
        }
        self.files_processed += 1;
        self.lines_removed += result.lines_removed() as u64;
        *self
            .file_types_processed
            .entry(extension.to_string())
            .or_insert(0) += 1;
        for removal in &result.removals {
            *self
                .removed_statements
                .entry(removal.statement_type.clone())
                .or_insert(0) += 1;
        }
    }

    /// Whether anything was removed.
    pub fn is_empty(&self) -> bool {
        self.files_processed == 0
    }
}

impl AddAssign for SessionStats {
    fn add_assign(&mut self, other: Self) {
        self.files_processed += other.files_processed;
        self.lines_removed += other.lines_removed;
        for (tag, count) in other.removed_statements {
            *self.removed_statements.entry(tag).or_insert(0) += count;
        }
        for (ext, count) in other.file_types_processed {
            *self.file_types_processed.entry(ext).or_insert(0) += count;
        }
    }
}
