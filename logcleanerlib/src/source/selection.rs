//! What the user asked to clean: a directory tree, or an explicit file list.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::category::FileCategory;
use super::filter::{discover_files, FilterConfig};
use crate::error::LogCleanerError;
use crate::Result;

/// The source of files for a cleaning session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelection {
    /// Every matching file below a directory
    Directory(PathBuf),
    /// An explicit list of files (already validated)
    Files(Vec<PathBuf>),
}

/// A file that was named explicitly but cannot be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedFile {
    pub path: PathBuf,
    pub reason: String,
}

impl SourceSelection {
    /// Select a directory, which must exist.
    pub fn directory(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(LogCleanerError::PathNotFound(path.to_path_buf()));
        }
        let path = path.canonicalize()?;
        Ok(Self::Directory(path))
    }

    /// Validate an explicit list of files.
    ///
    /// Returns the selection of valid (canonicalized) files along with the
    /// files that were rejected. Rejected files are either missing / not
    /// regular files, or have an extension no removal rules exist for.
    pub fn files<I, P>(paths: I) -> (Self, Vec<RejectedFile>)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut valid = Vec::new();
        let mut rejected = Vec::new();

        for path in paths {
            let path = path.as_ref();
            if !path.is_file() {
                rejected.push(RejectedFile {
                    path: path.to_path_buf(),
                    reason: "not a file".to_string(),
                });
            } else if !FileCategory::from_path(path).is_supported() {
                rejected.push(RejectedFile {
                    path: path.to_path_buf(),
                    reason: "unsupported type".to_string(),
                });
            } else {
                valid.push(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()));
            }
        }

        (Self::Files(valid), rejected)
    }

    /// The directory that relative paths, backups and the assets directory hang off.
    ///
    /// For a directory this is the directory itself; for a file list it is
    /// the deepest directory containing every file.
    pub fn base_dir(&self) -> PathBuf {
        match self {
            Self::Directory(dir) => dir.clone(),
            Self::Files(files) => {
                let parents: Vec<&Path> = files.iter().filter_map(|f| f.parent()).collect();
                common_ancestor(&parents)
            }
        }
    }

    /// Short description of the selection mode.
    pub fn mode_label(&self) -> &'static str {
        match self {
            Self::Directory(_) => "Directory scan",
            Self::Files(_) => "Specific files",
        }
    }

    /// Where the selection points, for display.
    pub fn location_label(&self) -> String {
        match self {
            Self::Directory(dir) => dir.display().to_string(),
            Self::Files(files) if files.len() == 1 => files[0].display().to_string(),
            Self::Files(_) => "Multiple files".to_string(),
        }
    }

    /// Whether the selection contains no files to look at.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Directory(_) => false,
            Self::Files(files) => files.is_empty(),
        }
    }

    /// Resolve the selection to the concrete list of files to process.
    ///
    /// Directory selections are walked with the given filter; explicit file
    /// lists keep the files the filter accepts, in their given order.
    pub fn resolve(&self, filter: &FilterConfig) -> Result<Vec<PathBuf>> {
        match self {
            Self::Directory(dir) => discover_files(dir, filter),
            Self::Files(files) => Ok(files
                .iter()
                .filter(|file| {
                    let keep = filter.matches(file);
                    if !keep {
                        tracing::debug!(path = %file.display(), "filtered out");
                    }
                    keep
                })
                .cloned()
                .collect()),
        }
    }
}

/// Longest common leading path of a set of directories.
fn common_ancestor(dirs: &[&Path]) -> PathBuf {
    let Some((first, rest)) = dirs.split_first() else {
        return PathBuf::from(".");
    };

    let mut common: Vec<_> = first.components().collect();
    for dir in rest {
        let shared = common
            .iter()
            .zip(dir.components())
            .take_while(|(a, b)| **a == *b)
            .count();
        common.truncate(shared);
    }

    if common.is_empty() {
        PathBuf::from(".")
    } else {
        common.iter().collect()
    }
}
