//! Language categories for source files.
//!
//! The category of a file decides which removal rules apply to it. It is
//! derived from the file extension alone and never changes for a given file.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Extensions the statement cleaner understands, with a human description.
pub const SUPPORTED_EXTENSIONS: &[(&str, &str)] = &[
    (".js", "JavaScript files"),
    (".jsx", "React JavaScript files"),
    (".ts", "TypeScript files"),
    (".tsx", "React TypeScript files"),
    (".py", "Python files"),
];

/// The language family of a source file.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileCategory {
    /// JavaScript and TypeScript (`.js`, `.jsx`, `.ts`, `.tsx`)
    CStyleScript,
    /// Python (`.py`)
    PythonScript,
    /// Anything else; never cleaned
    Unrecognized,
}

impl FileCategory {
    /// Determine the category from an extension, with or without the leading dot.
    ///
    /// Matching is case-insensitive: `.JS` and `js` are both C-style scripts.
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "js" | "jsx" | "ts" | "tsx" => Self::CStyleScript,
            "py" => Self::PythonScript,
            _ => Self::Unrecognized,
        }
    }

    /// Determine the category from a file path.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unrecognized)
    }

    /// Whether any removal rules exist for this category.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unrecognized)
    }
}

/// Lower-cased, dot-prefixed extension of a path (e.g. `".tsx"`), if any.
pub fn dotted_extension(path: impl AsRef<Path>) -> Option<String> {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
}
