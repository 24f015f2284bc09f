//! The assets directory: backups of cleaned files and session logs.
//!
//! Layout, relative to the base directory of a session:
//!
//! ```text
//! lc-cleaned-assets/
//! ├── backups/
//! │   └── backup_20240215_103045/   one directory per session
//! └── logs/
//!     └── cleanup_log_20240215_103045.log
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::error::LogCleanerError;
use crate::Result;

/// Name of the directory holding backups and session logs.
pub const ASSETS_DIR_NAME: &str = "lc-cleaned-assets";

/// `strftime` layout of session stamps.
pub const SESSION_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Format a session stamp, e.g. `20240215_103045`.
pub fn session_stamp(at: NaiveDateTime) -> String {
    at.format(SESSION_STAMP_FORMAT).to_string()
}

/// Session stamp for the current local time.
pub fn session_stamp_now() -> String {
    session_stamp(Local::now().naive_local())
}

/// Paths inside the assets directory of a base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetsLayout {
    base: PathBuf,
    root: PathBuf,
}

impl AssetsLayout {
    /// Layout for the assets directory under `base`. Nothing is created.
    pub fn new(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref().to_path_buf();
        let root = base.join(ASSETS_DIR_NAME);
        Self { base, root }
    }

    /// The assets directory itself.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.root.join("backups")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Where the session log for `stamp` is written.
    pub fn session_log_path(&self, stamp: &str) -> PathBuf {
        self.logs_dir().join(format!("cleanup_log_{stamp}.log"))
    }

    /// Create the logs directory and return the session log path for `stamp`.
    pub fn prepare_session_log(&self, stamp: &str) -> Result<PathBuf> {
        fs::create_dir_all(self.logs_dir())?;
        Ok(self.session_log_path(stamp))
    }

    /// Create the backup directory for a session.
    pub fn start_backup(&self, stamp: &str) -> Result<BackupSession> {
        let dir = self.backups_dir().join(format!("backup_{stamp}"));
        fs::create_dir_all(&dir).map_err(|source| LogCleanerError::Backup {
            path: dir.clone(),
            source,
        })?;
        tracing::info!(dir = %dir.display(), "created backup directory");
        Ok(BackupSession {
            base: self.base.clone(),
            assets: self.root.clone(),
            dir,
        })
    }
}

/// A backup directory that files are copied into before they are rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupSession {
    base: PathBuf,
    assets: PathBuf,
    dir: PathBuf,
}

impl BackupSession {
    /// The session's backup directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where a file's backup copy goes.
    ///
    /// Files under the base directory keep their relative path; anything
    /// else is stored by bare file name.
    pub fn destination(&self, file: &Path) -> PathBuf {
        match file.strip_prefix(&self.base) {
            Ok(relative) if !relative.as_os_str().is_empty() => self.dir.join(relative),
            _ => self
                .dir
                .join(file.file_name().unwrap_or(file.as_os_str())),
        }
    }

    /// Copy a file into the backup directory.
    ///
    /// Returns the backup path, or `None` for files inside the assets
    /// directory, which are never backed up.
    pub fn backup_file(&self, file: &Path) -> Result<Option<PathBuf>> {
        if file.starts_with(&self.assets) {
            return Ok(None);
        }

        let dest = self.destination(file);
        let backup_err = |source| LogCleanerError::Backup {
            path: file.to_path_buf(),
            source,
        };

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(backup_err)?;
        }
        fs::copy(file, &dest).map_err(backup_err)?;

        tracing::info!(file = %file.display(), backup = %dest.display(), "backed up file");
        Ok(Some(dest))
    }
}
