//! File filtering and discovery with glob pattern support.
//!
//! This module provides functionality to discover candidate files under a
//! directory, restricted by extension and by include/exclude glob patterns.
//! Version-control metadata and the tool's own assets directory are never
//! traversed.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::assets::ASSETS_DIR_NAME;
use crate::error::LogCleanerError;
use crate::Result;

/// Version-control metadata directories that are never traversed.
pub const VCS_DIRS: &[&str] = &[".git", ".hg", ".svn", ".jj"];

/// Configuration for file filtering.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Lower-cased, dot-prefixed extensions to keep (if empty, keep any extension)
    pub extensions: BTreeSet<String>,
    /// Glob patterns to include (if empty, include everything)
    pub include: Vec<Pattern>,
    /// Glob patterns to exclude
    pub exclude: Vec<Pattern>,
}

impl FilterConfig {
    /// Create a new empty filter config (includes every file).
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict discovery to an extension, e.g. `".py"` or `"py"`.
    pub fn extension(mut self, ext: &str) -> Self {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        self.extensions.insert(format!(".{ext}"));
        self
    }

    /// Restrict discovery to several extensions.
    pub fn extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ext in exts {
            self = self.extension(ext.as_ref());
        }
        self
    }

    /// Add an include pattern.
    pub fn include(mut self, pattern: &str) -> Result<Self> {
        let pat = Pattern::new(pattern).map_err(|e| LogCleanerError::InvalidGlob {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        self.include.push(pat);
        Ok(self)
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: &str) -> Result<Self> {
        let pat = Pattern::new(pattern).map_err(|e| LogCleanerError::InvalidGlob {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        self.exclude.push(pat);
        Ok(self)
    }

    /// Check if a path matches the filter criteria.
    ///
    /// A path matches if:
    /// 1. Its extension is selected (or no extensions are selected)
    /// 2. It matches at least one include pattern (or include is empty)
    /// 3. It doesn't match any exclude pattern
    pub fn matches(&self, path: &Path) -> bool {
        if !self.extensions.is_empty() {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{}", e.to_ascii_lowercase()));
            match ext {
                Some(ext) if self.extensions.contains(&ext) => {}
                _ => return false,
            }
        }

        let path_str = path.to_string_lossy();

        if self.exclude.iter().any(|p| p.matches(&path_str)) {
            return false;
        }

        self.include.is_empty() || self.include.iter().any(|p| p.matches(&path_str))
    }
}

/// Check if a directory should be skipped during traversal.
fn should_skip_dir(name: &str) -> bool {
    VCS_DIRS.contains(&name) || name == ASSETS_DIR_NAME
}

/// Discover files in a directory.
///
/// Walks the directory tree and returns all files that match the filter,
/// sorted for deterministic output. A file path is checked against the
/// filter directly.
pub fn discover_files(root: impl AsRef<Path>, filter: &FilterConfig) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();

    if !root.exists() {
        return Err(LogCleanerError::PathNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();

    if root.is_file() {
        if filter.matches(root) {
            files.push(root.to_path_buf());
        }
        return Ok(files);
    }

    let walker = WalkDir::new(root).into_iter();

    for entry in walker.filter_entry(|e| {
        if e.depth() == 0 {
            return true;
        }
        if e.file_type().is_dir() {
            let name = e.file_name().to_str().unwrap_or("");
            return !should_skip_dir(name);
        }
        true
    }) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::debug!("skipping unreadable entry: {err}");
                continue;
            }
        };

        let path = entry.path();

        if entry.file_type().is_file() && filter.matches(path) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn create_test_files(dir: &Path) {
        fs::create_dir_all(dir.join("src/components")).unwrap();
        fs::create_dir_all(dir.join("scripts")).unwrap();
        fs::create_dir_all(dir.join(".git/hooks")).unwrap();
        fs::create_dir_all(dir.join(ASSETS_DIR_NAME).join("backups")).unwrap();

        fs::write(dir.join("src/index.js"), "console.log('a');\n").unwrap();
        fs::write(dir.join("src/components/App.tsx"), "export {};\n").unwrap();
        fs::write(dir.join("scripts/build.py"), "import logging\n").unwrap();
        fs::write(dir.join(".git/hooks/pre-commit.py"), "print(1)\n").unwrap();
        fs::write(
            dir.join(ASSETS_DIR_NAME).join("backups/index.js"),
            "console.log('old');\n",
        )
        .unwrap();
        fs::write(dir.join("README.md"), "# Readme").unwrap();
    }

    #[test]
    fn test_filter_matches_everything_by_default() {
        let filter = FilterConfig::new();

        assert!(filter.matches(Path::new("src/main.js")));
        assert!(filter.matches(Path::new("README.md")));
    }

    #[test]
    fn test_filter_with_extensions() {
        let filter = FilterConfig::new().extensions([".js", "py"]);

        assert!(filter.matches(Path::new("src/main.js")));
        assert!(filter.matches(Path::new("src/MAIN.JS")));
        assert!(filter.matches(Path::new("tool.py")));
        assert!(!filter.matches(Path::new("src/App.tsx")));
        assert!(!filter.matches(Path::new("Makefile")));
    }

    #[test]
    fn test_filter_with_include_pattern() {
        let filter = FilterConfig::new().include("**/components/*").unwrap();

        assert!(filter.matches(Path::new("src/components/App.tsx")));
        assert!(!filter.matches(Path::new("src/index.js")));
    }

    #[test]
    fn test_filter_with_exclude_pattern() {
        let filter = FilterConfig::new().exclude("**/vendor/**").unwrap();

        assert!(filter.matches(Path::new("src/index.js")));
        assert!(!filter.matches(Path::new("src/vendor/jquery.js")));
    }

    #[test]
    fn test_invalid_glob_pattern() {
        let result = FilterConfig::new().include("[invalid");
        assert!(matches!(
            result,
            Err(LogCleanerError::InvalidGlob { .. })
        ));
    }

    #[test]
    fn test_discover_files_skips_vcs_and_assets() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let filter = FilterConfig::new().extensions([".js", ".tsx", ".py"]);
        let files = discover_files(temp.path(), &filter).unwrap();

        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(temp.path()).unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(files.len(), 3);
        assert!(names.iter().any(|n| n.ends_with("index.js")));
        assert!(names.iter().any(|n| n.ends_with("App.tsx")));
        assert!(names.iter().any(|n| n.ends_with("build.py")));
        assert!(!names.iter().any(|n| n.contains(".git")));
        assert!(!names.iter().any(|n| n.contains(ASSETS_DIR_NAME)));
    }

    #[test]
    fn test_discover_files_sorted() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let files = discover_files(temp.path(), &FilterConfig::new()).unwrap();
        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }

    #[test]
    fn test_discover_single_file() {
        let temp = tempdir().unwrap();
        create_test_files(temp.path());

        let file = temp.path().join("scripts/build.py");
        let files = discover_files(&file, &FilterConfig::new().extension("py")).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_discover_nonexistent_path() {
        let result = discover_files("/nonexistent/path/for/sure", &FilterConfig::new());
        assert!(matches!(result, Err(LogCleanerError::PathNotFound(_))));
    }
}
