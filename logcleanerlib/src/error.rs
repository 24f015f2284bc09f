//! Error types for logcleanerlib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while cleaning sources, pruning logs or scheduling jobs
#[derive(Error, Debug)]
pub enum LogCleanerError {
    /// Failed to read a file (including content that is not valid UTF-8)
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a cleaned file back to disk
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to copy a file into the backup directory
    #[error("failed to back up '{path}': {source}")]
    Backup {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid glob pattern
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// Path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// File has an extension the statement cleaner does not handle
    #[error("unsupported file type: {0}")]
    UnsupportedFile(PathBuf),

    /// Cutoff date could not be parsed
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Cutoff duration could not be parsed
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// Hour/minute outside the valid range for a daily job
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    /// The crontab could not be read or written
    #[error("crontab error: {0}")]
    Crontab(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A per-file failure recorded in a session report instead of aborting the session.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FileError {
    pub path: PathBuf,
    pub message: String,
}

impl FileError {
    pub fn new(path: impl Into<PathBuf>, error: &LogCleanerError) -> Self {
        Self {
            path: path.into(),
            message: error.to_string(),
        }
    }
}
