//! High-level statement-cleaning API.
//!
//! This module ties discovery, the rewrite engine, backups and write-back
//! together into a cleaning session over a [`SourceSelection`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::assets::{session_stamp_now, AssetsLayout, BackupSession};
use crate::error::{FileError, LogCleanerError};
use crate::source::category::{dotted_extension, FileCategory, SUPPORTED_EXTENSIONS};
use crate::source::filter::FilterConfig;
use crate::source::selection::SourceSelection;
use crate::Result;

use super::lines::{read_lines, write_lines};
use super::rewriter::{rewrite, RemovalRecord, RewriteResult};
use super::stats::SessionStats;

/// Options for a cleaning session.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// File filter used when walking a directory
    pub file_filter: FilterConfig,
    /// Copy each file into the backup directory before rewriting it
    pub backup: bool,
    /// Compute everything but write nothing
    pub dry_run: bool,
    /// Session stamp used to name the backup directory (defaults to now)
    pub stamp: Option<String>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            file_filter: FilterConfig::new()
                .extensions(SUPPORTED_EXTENSIONS.iter().map(|(ext, _)| *ext)),
            backup: false,
            dry_run: false,
            stamp: None,
        }
    }
}

impl CleanOptions {
    /// Create new default options (every supported extension, no backup).
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selected extensions, e.g. `[".js", ".py"]`.
    pub fn extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.file_filter.extensions.clear();
        self.file_filter = self.file_filter.extensions(exts);
        self
    }

    /// Set the file filter. An empty extension set selects every supported extension.
    pub fn filter(mut self, filter: FilterConfig) -> Self {
        self.file_filter = filter;
        self
    }

    /// Enable or disable backups.
    pub fn backup(mut self, enabled: bool) -> Self {
        self.backup = enabled;
        self
    }

    /// Enable or disable dry-run mode.
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Use a fixed session stamp.
    pub fn stamp(mut self, stamp: impl Into<String>) -> Self {
        self.stamp = Some(stamp.into());
        self
    }

    fn effective_filter(&self) -> FilterConfig {
        if self.file_filter.extensions.is_empty() {
            self.file_filter
                .clone()
                .extensions(SUPPORTED_EXTENSIONS.iter().map(|(ext, _)| *ext))
        } else {
            self.file_filter.clone()
        }
    }
}

/// What happened to one modified file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    /// Lower-cased, dot-prefixed extension
    pub extension: String,
    pub removals: Vec<RemovalRecord>,
    /// Backup copy, if one was made
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<PathBuf>,
}

/// Result of a cleaning session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    /// Directory relative paths and assets hang off
    pub base_dir: PathBuf,
    /// Extensions that were selected for cleaning
    pub extensions: BTreeSet<String>,
    /// Files that were read and checked
    pub files_scanned: usize,
    /// Totals over modified files
    pub stats: SessionStats,
    /// Modified files, in processing order
    pub files: Vec<FileReport>,
    /// Files that could not be processed
    pub errors: Vec<FileError>,
    pub dry_run: bool,
    /// Assets directory, when backups were made
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets_dir: Option<PathBuf>,
    /// This session's backup directory, when backups were made
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,
    /// This session's log file, when backups were made
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_log: Option<PathBuf>,
}

/// Remove diagnostic statements from every file in a selection.
///
/// Each file is read, rewritten, backed up (if requested) and written back.
/// A failure on one file is recorded in [`CleanReport::errors`] and the
/// session moves on; that file does not contribute to the statistics.
///
/// # Example
///
/// ```rust
/// use logcleanerlib::{clean, CleanOptions, SourceSelection};
/// use std::fs;
/// use tempfile::tempdir;
///
/// let dir = tempdir().unwrap();
/// fs::write(dir.path().join("app.js"), "console.log('start');\nrun();\n").unwrap();
/// fs::write(dir.path().join("tool.py"), "import logging\nmain()\n").unwrap();
///
/// let selection = SourceSelection::directory(dir.path()).unwrap();
/// let report = clean(&selection, CleanOptions::new()).unwrap();
///
/// assert_eq!(report.stats.files_processed, 2);
/// assert_eq!(report.stats.lines_removed, 2);
/// assert_eq!(fs::read_to_string(dir.path().join("app.js")).unwrap(), "run();\n");
/// ```
pub fn clean(selection: &SourceSelection, options: CleanOptions) -> Result<CleanReport> {
    let base_dir = selection.base_dir();
    let filter = options.effective_filter();
    let files = selection.resolve(&filter)?;

    let mut report = CleanReport {
        extensions: match selection {
            SourceSelection::Directory(_) => filter.extensions.clone(),
            SourceSelection::Files(_) => files.iter().filter_map(dotted_extension).collect(),
        },
        base_dir: base_dir.clone(),
        dry_run: options.dry_run,
        ..CleanReport::default()
    };

    let backup = if options.backup && !options.dry_run {
        let layout = AssetsLayout::new(&base_dir);
        let stamp = options.stamp.clone().unwrap_or_else(session_stamp_now);
        let session = layout.start_backup(&stamp)?;
        report.assets_dir = Some(layout.root().to_path_buf());
        report.backup_dir = Some(session.dir().to_path_buf());
        report.session_log = Some(layout.prepare_session_log(&stamp)?);
        Some(session)
    } else {
        None
    };

    for path in files {
        let category = FileCategory::from_path(&path);
        if !category.is_supported() {
            let err = LogCleanerError::UnsupportedFile(path.clone());
            tracing::warn!(path = %path.display(), "{err}");
            report.errors.push(FileError::new(path, &err));
            continue;
        }
        report.files_scanned += 1;

        let extension = dotted_extension(&path).unwrap_or_default();
        match clean_file(&path, category, backup.as_ref(), options.dry_run) {
            Ok((result, backup_path)) => {
                if !result.modified {
                    continue;
                }
                report.stats.record_file(&extension, &result);
                report.files.push(FileReport {
                    path,
                    extension,
                    removals: result.removals,
                    backup: backup_path,
                });
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), "{err}");
                report.errors.push(FileError::new(path, &err));
            }
        }
    }

    Ok(report)
}

/// Rewrite one file. The backup, if any, is taken before the file is touched.
fn clean_file(
    path: &Path,
    category: FileCategory,
    backup: Option<&BackupSession>,
    dry_run: bool,
) -> Result<(RewriteResult, Option<PathBuf>)> {
    let lines = read_lines(path)?;
    let result = rewrite(&lines, category);

    if !result.modified || dry_run {
        return Ok((result, None));
    }

    let backup_path = match backup {
        Some(session) => session.backup_file(path)?,
        None => None,
    };

    write_lines(path, &result.cleaned_lines)?;

    for removal in &result.removals {
        tracing::info!(
            path = %path.display(),
            line = removal.line_number,
            statement = %removal.statement_type,
            "removed: {}",
            removal.original_text
        );
    }
    tracing::info!(
        path = %path.display(),
        removed = result.lines_removed(),
        "cleaned file"
    );

    Ok((result, backup_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn create_project(dir: &Path) {
        fs::create_dir_all(dir.join("src")).unwrap();
        fs::create_dir_all(dir.join("tools")).unwrap();
        fs::write(
            dir.join("src/app.js"),
            "const a = 1;\nconsole.log(a);\nconsole.error('bad');\nexport default a;\n",
        )
        .unwrap();
        fs::write(dir.join("src/view.tsx"), "export const View = () => null;\n").unwrap();
        fs::write(
            dir.join("tools/run.py"),
            "import logging\nlogger = logging.getLogger(__name__)\n\ndef main():\n    logger.info('go')\n    return 0\n",
        )
        .unwrap();
        fs::write(dir.join("README.md"), "console.log('docs');\n").unwrap();
    }

    #[test]
    fn test_clean_directory() {
        let temp = tempdir().unwrap();
        create_project(temp.path());

        let selection = SourceSelection::directory(temp.path()).unwrap();
        let report = clean(&selection, CleanOptions::new()).unwrap();

        assert_eq!(report.files_scanned, 3);
        assert_eq!(report.stats.files_processed, 2);
        assert_eq!(report.stats.lines_removed, 5);
        assert_eq!(report.stats.removed_statements["console.log"], 1);
        assert_eq!(report.stats.removed_statements["console.error"], 1);
        assert_eq!(report.stats.removed_statements["logging_import"], 1);
        assert_eq!(report.stats.removed_statements["logger_definition"], 1);
        assert_eq!(report.stats.removed_statements["logger.info"], 1);
        assert_eq!(report.stats.file_types_processed[".js"], 1);
        assert_eq!(report.stats.file_types_processed[".py"], 1);
        assert!(report.errors.is_empty());

        assert_eq!(
            fs::read_to_string(temp.path().join("src/app.js")).unwrap(),
            "const a = 1;\nexport default a;\n"
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("tools/run.py")).unwrap(),
            "\ndef main():\n    return 0\n"
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("README.md")).unwrap(),
            "console.log('docs');\n"
        );
    }

    #[test]
    fn test_clean_selected_extensions() {
        let temp = tempdir().unwrap();
        create_project(temp.path());

        let selection = SourceSelection::directory(temp.path()).unwrap();
        let report = clean(&selection, CleanOptions::new().extensions([".py"])).unwrap();

        assert_eq!(report.extensions, BTreeSet::from([".py".to_string()]));
        assert_eq!(report.stats.files_processed, 1);
        assert!(fs::read_to_string(temp.path().join("src/app.js"))
            .unwrap()
            .contains("console.log(a);"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp = tempdir().unwrap();
        create_project(temp.path());
        let before = fs::read_to_string(temp.path().join("src/app.js")).unwrap();

        let selection = SourceSelection::directory(temp.path()).unwrap();
        let report = clean(
            &selection,
            CleanOptions::new().dry_run(true).backup(true),
        )
        .unwrap();

        assert!(report.dry_run);
        assert_eq!(report.stats.lines_removed, 5);
        assert_eq!(report.backup_dir, None);
        assert_eq!(
            fs::read_to_string(temp.path().join("src/app.js")).unwrap(),
            before
        );
        assert!(!temp.path().join(crate::assets::ASSETS_DIR_NAME).exists());
    }

    #[test]
    fn test_backup_before_rewrite() {
        let temp = tempdir().unwrap();
        create_project(temp.path());
        let original = fs::read_to_string(temp.path().join("src/app.js")).unwrap();

        let selection = SourceSelection::directory(temp.path()).unwrap();
        let report = clean(
            &selection,
            CleanOptions::new().backup(true).stamp("20240215_103045"),
        )
        .unwrap();

        let backup_dir = report.backup_dir.clone().unwrap();
        assert!(backup_dir.ends_with("lc-cleaned-assets/backups/backup_20240215_103045"));
        assert!(report
            .session_log
            .as_ref()
            .unwrap()
            .ends_with("lc-cleaned-assets/logs/cleanup_log_20240215_103045.log"));
        assert_eq!(
            fs::read_to_string(backup_dir.join("src/app.js")).unwrap(),
            original
        );
        assert!(backup_dir.join("tools/run.py").exists());
        assert!(!backup_dir.join("src/view.tsx").exists());

        let js = report
            .files
            .iter()
            .find(|f| f.extension == ".js")
            .unwrap();
        assert_eq!(js.backup.as_deref(), Some(backup_dir.join("src/app.js").as_path()));

        // A second run does not walk into the assets directory.
        let again = clean(&selection, CleanOptions::new()).unwrap();
        assert_eq!(again.stats.files_processed, 0);
    }

    #[test]
    fn test_clean_explicit_files() {
        let temp = tempdir().unwrap();
        create_project(temp.path());

        let (selection, rejected) = SourceSelection::files([
            temp.path().join("tools/run.py"),
            temp.path().join("README.md"),
        ]);
        assert_eq!(rejected.len(), 1);

        let report = clean(&selection, CleanOptions::new()).unwrap();
        assert_eq!(report.extensions, BTreeSet::from([".py".to_string()]));
        assert_eq!(report.files_scanned, 1);
        assert_eq!(report.stats.lines_removed, 3);
        assert_eq!(report.files[0].removals[0].line_number, 1);
    }

    #[test]
    fn test_failed_backup_leaves_file_untouched() {
        let temp = tempdir().unwrap();
        create_project(temp.path());
        let original = fs::read(temp.path().join("src/app.js")).unwrap();

        // A regular file where the backup's src/ directory has to go.
        let session = temp
            .path()
            .join("lc-cleaned-assets/backups/backup_20240215_103045");
        fs::create_dir_all(&session).unwrap();
        fs::write(session.join("src"), "").unwrap();

        let selection = SourceSelection::directory(temp.path()).unwrap();
        let report = clean(
            &selection,
            CleanOptions::new().backup(true).stamp("20240215_103045"),
        )
        .unwrap();

        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].path.ends_with("src/app.js"));
        assert!(report.errors[0].message.starts_with("failed to back up"));
        assert_eq!(fs::read(temp.path().join("src/app.js")).unwrap(), original);

        // Other files are still backed up and cleaned.
        assert_eq!(report.stats.files_processed, 1);
        assert!(session.join("tools/run.py").exists());
    }

    #[test]
    fn test_clean_explicit_files_with_extension_filter() {
        let temp = tempdir().unwrap();
        create_project(temp.path());
        let app = temp.path().join("src/app.js");
        let original = fs::read_to_string(&app).unwrap();

        let (selection, _) = SourceSelection::files([app.clone(), temp.path().join("tools/run.py")]);
        let report = clean(&selection, CleanOptions::new().extensions([".py"])).unwrap();

        assert_eq!(report.extensions, BTreeSet::from([".py".to_string()]));
        assert_eq!(report.files_scanned, 1);
        assert_eq!(fs::read_to_string(&app).unwrap(), original);
    }

    #[test]
    fn test_unsupported_extension_recorded() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("task.rb"), "puts 'hi'\n").unwrap();

        let selection = SourceSelection::directory(temp.path()).unwrap();
        let report = clean(&selection, CleanOptions::new().extensions([".rb"])).unwrap();

        assert_eq!(report.files_scanned, 0);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].message.starts_with("unsupported file type"));
    }

    #[test]
    fn test_unreadable_file_recorded_and_skipped() {
        let temp = tempdir().unwrap();
        create_project(temp.path());
        fs::write(temp.path().join("src/broken.js"), [0xff, 0xfe, b'\n']).unwrap();

        let selection = SourceSelection::directory(temp.path()).unwrap();
        let report = clean(&selection, CleanOptions::new()).unwrap();

        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].path.ends_with("src/broken.js"));
        assert_eq!(report.stats.files_processed, 2);
    }

    #[test]
    fn test_clean_invalid_directory() {
        let result = SourceSelection::directory("/nonexistent/project");
        assert!(matches!(result, Err(LogCleanerError::PathNotFound(_))));
    }
}
