//! Single-pass removal of diagnostic statements from a file's lines.

use serde::{Deserialize, Serialize};

use super::matcher::{classify, should_remove};
use crate::source::category::FileCategory;

/// One line dropped by a rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalRecord {
    /// 1-based line number in the input
    pub line_number: usize,
    /// The removed line, trimmed of surrounding whitespace
    pub original_text: String,
    /// Statement tag, e.g. `"console.log"` or `"logging_import"`
    pub statement_type: String,
}

/// Outcome of rewriting one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteResult {
    /// Whether at least one line was dropped
    pub modified: bool,
    /// Retained lines, verbatim and in input order (terminators included)
    pub cleaned_lines: Vec<String>,
    /// Dropped lines, in input order
    pub removals: Vec<RemovalRecord>,
}

impl RewriteResult {
    /// Number of lines dropped.
    pub fn lines_removed(&self) -> usize {
        self.removals.len()
    }

    /// The retained lines joined back into file content.
    pub fn content(&self) -> String {
        self.cleaned_lines.concat()
    }
}

/// Drop every removable diagnostic line.
///
/// Lines are visited in order with no lookahead; a diagnostic call whose
/// arguments span several physical lines is only removed if a rule matches
/// one of those lines on its own.
///
/// # Example
///
/// ```rust
/// use logcleanerlib::{rewrite, FileCategory};
///
/// let lines = ["console.log('test');\n", "valid code;\n", "console.error('test');"];
/// let result = rewrite(&lines, FileCategory::CStyleScript);
///
/// assert!(result.modified);
/// assert_eq!(result.cleaned_lines, vec!["valid code;\n"]);
/// assert_eq!(result.removals.len(), 2);
/// ```
pub fn rewrite<S: AsRef<str>>(lines: &[S], category: FileCategory) -> RewriteResult {
    let mut result = RewriteResult::default();

    for (idx, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        if should_remove(line, category) {
            let statement_type = classify(line, category);
            tracing::debug!(line = idx + 1, %statement_type, "matched diagnostic statement");
            result.removals.push(RemovalRecord {
                line_number: idx + 1,
                original_text: line.trim().to_string(),
                statement_type,
            });
        } else {
            result.cleaned_lines.push(line.to_string());
        }
    }

    result.modified = !result.removals.is_empty();
    result
}
