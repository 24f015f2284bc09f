//! Output formatting: present session results as summaries.
//!
//! This module handles the final stage of the pipeline - turning session
//! reports into display-ready data. It provides:
//!
//! - **Summary**: titled sections of label/value rows
//! - **SummarySection**: one titled group, e.g. "Statistics"
//!
//! Summary is a pure presentation layer - it only formats data into strings.
//!
//! ## Example
//!
//! ```rust,ignore
//! use logcleanerlib::output::Summary;
//!
//! let summary = Summary::from_clean(&report, &selection);
//! // summary.sections[1]: SummarySection { title: "Statistics", rows: [...] }
//! ```

pub mod summary;

pub use summary::{Summary, SummaryRow, SummarySection};
