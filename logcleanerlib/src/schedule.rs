//! Recurring log pruning through the user's crontab.
//!
//! Jobs installed by this crate are tagged with a trailing crontab comment
//! starting with [`JOB_COMMENT_PREFIX`]; every other crontab line is left
//! untouched.
//!
//! ```text
//! 30 2 * * * "/usr/local/bin/logcleaner" prune "/var/log/app" --older-than 30d # log-cleaner-automated_20240215_103045
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Serialize;

use crate::assets::session_stamp_now;
use crate::error::LogCleanerError;
use crate::Result;

/// Comment prefix identifying jobs installed by this crate.
pub const JOB_COMMENT_PREFIX: &str = "log-cleaner-automated";

/// Age passed to scheduled prune runs.
pub const SCHEDULED_MAX_AGE: &str = "30d";

/// Somewhere a crontab can be loaded from and saved to.
pub trait CrontabStore {
    /// The full crontab text; empty when there is none.
    fn load(&self) -> Result<String>;
    /// Replace the full crontab text.
    fn save(&mut self, content: &str) -> Result<()>;
}

/// The current user's crontab, via the `crontab` command.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCrontab;

impl CrontabStore for SystemCrontab {
    fn load(&self) -> Result<String> {
        let output = Command::new("crontab")
            .arg("-l")
            .output()
            .map_err(|e| LogCleanerError::Crontab(format!("failed to run crontab -l: {e}")))?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("no crontab") {
            return Ok(String::new());
        }
        Err(LogCleanerError::Crontab(format!(
            "crontab -l failed: {}",
            stderr.trim()
        )))
    }

    fn save(&mut self, content: &str) -> Result<()> {
        let crontab_err =
            |e: std::io::Error| LogCleanerError::Crontab(format!("failed to run crontab -: {e}"));

        let mut child = Command::new("crontab")
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(crontab_err)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(content.as_bytes()).map_err(crontab_err)?;
        }

        let output = child.wait_with_output().map_err(crontab_err)?;
        if !output.status.success() {
            return Err(LogCleanerError::Crontab(format!(
                "crontab - failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

/// A crontab kept in a plain file, e.g. one installed under `/etc/cron.d`.
///
/// A missing file reads as an empty crontab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCrontab {
    pub path: PathBuf,
}

impl FileCrontab {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CrontabStore for FileCrontab {
    fn load(&self) -> Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(LogCleanerError::FileRead {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn save(&mut self, content: &str) -> Result<()> {
        fs::write(&self.path, content).map_err(|e| LogCleanerError::FileWrite {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// A crontab held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryCrontab {
    pub content: String,
}

impl MemoryCrontab {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl CrontabStore for MemoryCrontab {
    fn load(&self) -> Result<String> {
        Ok(self.content.clone())
    }

    fn save(&mut self, content: &str) -> Result<()> {
        self.content = content.to_string();
        Ok(())
    }
}

/// A scheduled job found in, or added to, the crontab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CronJob {
    /// The five schedule fields, e.g. `"30 2 * * *"`
    pub schedule: String,
    pub command: String,
    pub comment: String,
}

impl CronJob {
    /// Render as a crontab line.
    pub fn to_line(&self) -> String {
        format!("{} {} # {}", self.schedule, self.command, self.comment)
    }

    /// Parse a crontab line carrying a trailing `# comment`.
    ///
    /// Blank lines, comment lines, environment assignments and entries
    /// without a comment yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let (entry, comment) = line.rsplit_once(" # ")?;
        let fields: Vec<&str> = entry.split_whitespace().collect();
        if fields.len() < 6 {
            return None;
        }

        Some(Self {
            schedule: fields[..5].join(" "),
            command: fields[5..].join(" "),
            comment: comment.trim().to_string(),
        })
    }

    /// Whether this job was installed by this crate.
    pub fn is_managed(&self) -> bool {
        self.comment.starts_with(JOB_COMMENT_PREFIX)
    }
}

/// Daily schedule fields for `hour:minute`.
pub fn daily_schedule(hour: u32, minute: u32) -> Result<String> {
    if hour > 23 {
        return Err(LogCleanerError::InvalidSchedule(format!(
            "hour must be 0-23, got {hour}"
        )));
    }
    if minute > 59 {
        return Err(LogCleanerError::InvalidSchedule(format!(
            "minute must be 0-59, got {minute}"
        )));
    }
    Ok(format!("{minute} {hour} * * *"))
}

/// The command a scheduled job runs.
pub fn prune_command(exe: &Path, log_dir: &Path) -> String {
    format!(
        "\"{}\" prune \"{}\" --older-than {}",
        exe.display(),
        log_dir.display(),
        SCHEDULED_MAX_AGE
    )
}

/// Manages this crate's jobs in a crontab.
#[derive(Debug)]
pub struct Scheduler<S: CrontabStore> {
    store: S,
}

impl<S: CrontabStore> Scheduler<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Install a daily prune job for `log_dir`, stamped with the current time.
    pub fn add_job(&mut self, exe: &Path, log_dir: &Path, hour: u32, minute: u32) -> Result<CronJob> {
        self.add_job_stamped(exe, log_dir, hour, minute, &session_stamp_now())
    }

    /// Install a daily prune job with an explicit stamp in its comment.
    pub fn add_job_stamped(
        &mut self,
        exe: &Path,
        log_dir: &Path,
        hour: u32,
        minute: u32,
        stamp: &str,
    ) -> Result<CronJob> {
        let schedule = daily_schedule(hour, minute)?;
        let existing = self.jobs()?;

        let base = format!("{JOB_COMMENT_PREFIX}_{stamp}");
        let mut comment = base.clone();
        let mut n = 2;
        while existing.iter().any(|job| job.comment == comment) {
            comment = format!("{base}_{n}");
            n += 1;
        }

        let job = CronJob {
            schedule,
            command: prune_command(exe, log_dir),
            comment,
        };

        let mut lines = self.lines()?;
        lines.push(job.to_line());
        self.write(&lines)?;

        tracing::info!(comment = %job.comment, schedule = %job.schedule, "added cron job");
        Ok(job)
    }

    /// Jobs installed by this crate, in crontab order.
    pub fn jobs(&self) -> Result<Vec<CronJob>> {
        Ok(self
            .lines()?
            .iter()
            .filter_map(|line| CronJob::parse(line))
            .filter(CronJob::is_managed)
            .collect())
    }

    /// Whether any job installed by this crate exists.
    pub fn has_jobs(&self) -> Result<bool> {
        Ok(!self.jobs()?.is_empty())
    }

    /// Remove the managed job with this comment. Returns whether one was found.
    pub fn remove_job(&mut self, comment: &str) -> Result<bool> {
        let removed = self.retain(|job| job.comment != comment)?;
        if removed > 0 {
            tracing::info!(comment, "removed cron job");
        }
        Ok(removed > 0)
    }

    /// Remove every job installed by this crate. Returns how many were removed.
    pub fn remove_all(&mut self) -> Result<usize> {
        let removed = self.retain(|_| false)?;
        tracing::info!(removed, "removed all cron jobs");
        Ok(removed)
    }

    /// Keep unmanaged lines and managed jobs for which `keep` holds.
    fn retain<F>(&mut self, keep: F) -> Result<usize>
    where
        F: Fn(&CronJob) -> bool,
    {
        let lines = self.lines()?;
        let before = lines.len();
        let kept: Vec<String> = lines
            .into_iter()
            .filter(|line| match CronJob::parse(line) {
                Some(job) if job.is_managed() => keep(&job),
                _ => true,
            })
            .collect();

        let removed = before - kept.len();
        if removed > 0 {
            self.write(&kept)?;
        }
        Ok(removed)
    }

    fn lines(&self) -> Result<Vec<String>> {
        Ok(self.store.load()?.lines().map(str::to_string).collect())
    }

    fn write(&mut self, lines: &[String]) -> Result<()> {
        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        self.store.save(&content)
    }
}
