//! # logcleanerlib
//!
//! A library for stripping diagnostic statements from source files and pruning
//! stale entries from log files.
//!
//! ## Overview
//!
//! Debug output tends to pile up: `console.log` calls left in a React
//! component, `logger.debug` lines and `import logging` in a Python script,
//! log files that only ever grow. This library provides two line-level
//! engines and the sessions around them:
//!
//! - **Statement cleaning**: removes `console.*` calls from JavaScript and
//!   TypeScript, and `logging` / `logger` statements from Python
//! - **Log pruning**: drops log lines whose timestamp is older than a cutoff,
//!   keeping blank lines and lines without a recognisable timestamp
//!
//! Both are textual heuristics applied one physical line at a time; they
//! do not parse the languages involved.
//!
//! ## Features
//!
//! - **Ten timestamp grammars**: ISO 8601 variants, US dates, syslog style,
//!   epoch seconds and compact dates, tried in a fixed priority order
//! - **Log file detection**: by extension, rotated-log naming or content
//! - **Backups**: modified files are copied into `lc-cleaned-assets/` first
//! - **Scheduling**: daily prune jobs in the user's crontab
//! - **Pure Rust data types**: every session returns a serializable report
//!
//! ## Example
//!
//! ```rust
//! use logcleanerlib::{clean, rewrite, CleanOptions, FileCategory, SourceSelection};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! // Rewrite lines directly
//! let result = rewrite(&["import logging\n", "run()\n"], FileCategory::PythonScript);
//! assert_eq!(result.cleaned_lines, vec!["run()\n"]);
//!
//! // Clean a whole directory
//! let dir = tempdir().unwrap();
//! fs::write(dir.path().join("index.ts"), "console.debug(state);\nrender();\n").unwrap();
//!
//! let selection = SourceSelection::directory(dir.path()).unwrap();
//! let report = clean(&selection, CleanOptions::new().extensions([".ts"])).unwrap();
//! assert_eq!(report.stats.removed_statements["console.debug"], 1);
//! ```

pub mod assets;
pub mod data;
pub mod error;
pub mod output;
pub mod schedule;
pub mod source;

pub use assets::{AssetsLayout, BackupSession, ASSETS_DIR_NAME};
pub use data::{
    classify, clean, extract_timestamp, parse_date, parse_duration, prune, rewrite,
    should_remove, truncate, CleanOptions, CleanReport, Cutoff, FileReport, PruneFileReport,
    PruneOptions, PruneReport, RemovalRecord, RewriteResult, SessionStats, TruncationResult,
};
pub use error::{FileError, LogCleanerError};
pub use output::{Summary, SummaryRow, SummarySection};
pub use schedule::{
    CronJob, CrontabStore, FileCrontab, MemoryCrontab, Scheduler, SystemCrontab,
};
pub use source::{
    find_log_files, is_log_file, FileCategory, FilterConfig, RejectedFile, SourceSelection,
};

/// Result type for logcleanerlib operations
pub type Result<T> = std::result::Result<T, LogCleanerError>;
