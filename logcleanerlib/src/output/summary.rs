//! Presentation-ready session summaries.
//!
//! A [`Summary`] is a titled list of sections, each a list of label/value
//! rows. It only formats numbers and paths into strings; the CLI decides
//! how to style them.

use serde::{Deserialize, Serialize};

use crate::data::cleaner::CleanReport;
use crate::data::pruner::PruneReport;
use crate::source::selection::SourceSelection;

/// A single label/value row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub label: String,
    pub value: String,
}

/// A titled group of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySection {
    pub title: String,
    pub rows: Vec<SummaryRow>,
}

impl SummarySection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    /// Append a row.
    pub fn row(mut self, label: impl Into<String>, value: impl ToString) -> Self {
        self.rows.push(SummaryRow {
            label: label.into(),
            value: value.to_string(),
        });
        self
    }
}

/// Summary of a cleaning or pruning session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub title: String,
    pub sections: Vec<SummarySection>,
}

impl Summary {
    /// Summarise a cleaning session.
    ///
    /// Sections: operation details, statistics, files by type, statements by
    /// type and, when backups were made, asset locations.
    pub fn from_clean(report: &CleanReport, selection: &SourceSelection) -> Self {
        let extensions: Vec<&str> = report.extensions.iter().map(String::as_str).collect();

        let mut operation = SummarySection::new("Operation Details")
            .row("Mode", selection.mode_label())
            .row("Location", selection.location_label())
            .row("File Types", extensions.join(", "));
        if report.dry_run {
            operation = operation.row("Dry Run", "no files were modified");
        }

        let mut statistics = SummarySection::new("Statistics")
            .row("Files Scanned", report.files_scanned)
            .row("Files Processed", report.stats.files_processed)
            .row("Lines Removed", report.stats.lines_removed);
        if !report.errors.is_empty() {
            statistics = statistics.row("Errors", report.errors.len());
        }

        let by_type = report
            .stats
            .file_types_processed
            .iter()
            .fold(SummarySection::new("Files processed by type"), |s, (ext, n)| {
                s.row(ext.as_str(), n)
            });

        let by_statement = report
            .stats
            .removed_statements
            .iter()
            .fold(SummarySection::new("Removed statements by type"), |s, (tag, n)| {
                s.row(tag.as_str(), n)
            });

        let mut sections = vec![operation, statistics, by_type, by_statement];

        if let (Some(assets), Some(backup)) = (&report.assets_dir, &report.backup_dir) {
            let log = report
                .session_log
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "Not configured".to_string());
            sections.push(
                SummarySection::new("Asset Locations")
                    .row("Assets Directory", assets.display())
                    .row("Backup Location", backup.display())
                    .row("Log File", log),
            );
        }

        Self {
            title: "Cleanup Summary".to_string(),
            sections,
        }
    }

    /// Summarise a pruning session.
    pub fn from_prune(report: &PruneReport) -> Self {
        let mut operation = SummarySection::new("Operation Details")
            .row("Cutoff", report.cutoff.format("%Y-%m-%d %H:%M:%S"))
            .row("Log Files", report.files.len() + report.errors.len());
        if report.dry_run {
            operation = operation.row("Dry Run", "no files were modified");
        }

        let mut statistics = SummarySection::new("Statistics")
            .row("Files Cleaned", report.files_cleaned)
            .row("Lines Removed", report.lines_removed);
        if !report.errors.is_empty() {
            statistics = statistics.row("Errors", report.errors.len());
        }

        Self {
            title: "Log Cleanup Summary".to_string(),
            sections: vec![operation, statistics],
        }
    }

    /// Find a section by title.
    pub fn section(&self, title: &str) -> Option<&SummarySection> {
        self.sections.iter().find(|s| s.title == title)
    }
}
