//! Source discovery: find files to clean and logs to prune.
//!
//! This module handles the first stage of the pipeline - discovering what
//! files to process. It provides:
//!
//! - **Categories**: which removal rules apply to a file (`FileCategory`)
//! - **Selection**: a directory or an explicit list of files (`SourceSelection`)
//! - **File filtering**: extensions plus include/exclude glob patterns
//! - **Log files**: recognising logs by name or content (`is_log_file`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use logcleanerlib::source::{FilterConfig, SourceSelection};
//!
//! let selection = SourceSelection::directory("./web")?;
//! let filter = FilterConfig::new()
//!     .extensions([".ts", ".tsx"])
//!     .exclude("**/vendor/**")?;
//! let files = selection.resolve(&filter)?;
//! ```

pub mod category;
pub mod filter;
pub mod logfiles;
pub mod selection;

pub use category::{dotted_extension, FileCategory, SUPPORTED_EXTENSIONS};
pub use filter::{discover_files, FilterConfig, VCS_DIRS};
pub use logfiles::{find_log_files, is_log_file, is_log_file_with, LOG_EXTENSIONS};
pub use selection::{RejectedFile, SourceSelection};
