//! Data processing: the cleaning and pruning engines and their sessions.
//!
//! This module handles the second stage of the pipeline - turning file
//! content into cleaned content and statistics. It provides:
//!
//! - **Matching**: line-level detection of diagnostic statements (`should_remove`, `classify`)
//! - **Rewriting**: single-pass removal of those lines (`rewrite`)
//! - **Dates**: timestamp grammars for log lines (`extract_timestamp`)
//! - **Truncation**: dropping log lines older than a cutoff (`truncate`)
//! - **Sessions**: read, rewrite, back up and write back (`clean`, `prune`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use logcleanerlib::data::{clean, CleanOptions};
//! use logcleanerlib::SourceSelection;
//!
//! let selection = SourceSelection::directory("./web")?;
//! let report = clean(&selection, CleanOptions::new().backup(true))?;
//! println!("Removed {} lines", report.stats.lines_removed);
//! ```

pub mod cleaner;
pub mod cutoff;
pub mod lines;
pub mod matcher;
pub mod pruner;
pub mod rewriter;
pub mod stats;
pub mod timestamp;
pub mod truncator;

pub use cleaner::{clean, CleanOptions, CleanReport, FileReport};
pub use cutoff::{parse_date, parse_duration, Cutoff, DEFAULT_MAX_AGE_DAYS};
pub use lines::{read_lines, split_lines, write_lines};
pub use matcher::{classify, matching_rule, should_remove, MatchRule, CONSOLE_METHODS};
pub use pruner::{prune, PruneFileReport, PruneOptions, PruneReport};
pub use rewriter::{rewrite, RemovalRecord, RewriteResult};
pub use stats::SessionStats;
pub use timestamp::{extract_timestamp, has_timestamp_pattern, DateGrammar, GRAMMARS};
pub use truncator::{truncate, Retention, TruncationResult};
