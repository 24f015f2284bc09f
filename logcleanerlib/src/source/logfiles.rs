//! Recognising log files and finding them in a directory tree.
//!
//! A file is a log file if any of these hold, checked in order:
//!
//! 1. its extension is one of [`LOG_EXTENSIONS`]
//! 2. its lower-cased name matches a rotated-log naming pattern
//!    (`app.log.1`, `app.log.old`, `trace.logs`, `server.error`, ...)
//! 3. one of its first [`SNIFF_LINES`] lines contains a timestamp pattern
//!
//! Unreadable files, and files whose head is not valid UTF-8, are not log files.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::filter::{discover_files, FilterConfig};
use crate::data::timestamp::has_timestamp_pattern;
use crate::Result;

/// Extensions (without the dot) that always mark a log file.
pub const LOG_EXTENSIONS: &[&str] = &["log", "logs", "error", "debug", "info"];

/// How many leading lines are inspected when sniffing content.
pub const SNIFF_LINES: usize = 5;

static LOG_NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\.log(\.\d+)?$",
        r"\.logs$",
        r"\.(error|debug|info)$",
        r"\.log\.[0-9A-Za-z-]+$",
    ]
    .iter()
    .map(|p| match Regex::new(p) {
        Ok(regex) => regex,
        Err(err) => panic!("built-in log name pattern {p:?} must compile: {err}"),
    })
    .collect()
});

/// Whether the extension alone marks a log file.
pub fn has_log_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| LOG_EXTENSIONS.iter().any(|l| l.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Whether the file name follows a log naming convention.
pub fn has_log_name(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let name = name.to_lowercase();
    LOG_NAME_PATTERNS.iter().any(|p| p.is_match(&name))
}

/// Whether any of the given lines looks like a timestamped log entry.
pub fn looks_like_log(lines: &[String]) -> bool {
    lines.iter().any(|line| has_timestamp_pattern(line))
}

/// Read up to `limit` lines from the start of a file.
pub fn peek_lines(path: &Path, limit: usize) -> io::Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    reader.lines().take(limit).collect()
}

/// Decide whether a file is a log file, using `peek` to read its head.
///
/// `peek` is only called when neither the extension nor the name decide.
/// Any error it returns makes the answer `false`.
pub fn is_log_file_with<F>(path: &Path, peek: F) -> bool
where
    F: FnOnce(&Path) -> io::Result<Vec<String>>,
{
    if !path.is_file() {
        return false;
    }
    if has_log_extension(path) || has_log_name(path) {
        return true;
    }
    match peek(path) {
        Ok(lines) => looks_like_log(&lines),
        Err(err) => {
            tracing::debug!(path = %path.display(), "not sniffing unreadable file: {err}");
            false
        }
    }
}

/// Decide whether a file is a log file.
///
/// # Example
///
/// ```rust
/// use logcleanerlib::is_log_file;
/// use std::fs;
/// use tempfile::tempdir;
///
/// let dir = tempdir().unwrap();
/// let named = dir.path().join("server.log.1");
/// fs::write(&named, "anything\n").unwrap();
/// let sniffed = dir.path().join("output.txt");
/// fs::write(&sniffed, "2024-02-15 10:30:45 started\n").unwrap();
/// let plain = dir.path().join("notes.txt");
/// fs::write(&plain, "buy milk\n").unwrap();
///
/// assert!(is_log_file(&named));
/// assert!(is_log_file(&sniffed));
/// assert!(!is_log_file(&plain));
/// ```
pub fn is_log_file(path: impl AsRef<Path>) -> bool {
    is_log_file_with(path.as_ref(), |p| peek_lines(p, SNIFF_LINES))
}

/// Find every log file below a directory (or the path itself if it is one).
///
/// VCS metadata and the assets directory are not searched.
pub fn find_log_files(root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let candidates = discover_files(root, &FilterConfig::new())?;
    Ok(candidates.into_iter().filter(|p| is_log_file(p)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_log_extensions() {
        assert!(has_log_extension(Path::new("app.log")));
        assert!(has_log_extension(Path::new("APP.LOG")));
        assert!(has_log_extension(Path::new("trace.logs")));
        assert!(has_log_extension(Path::new("server.error")));
        assert!(has_log_extension(Path::new("server.debug")));
        assert!(has_log_extension(Path::new("server.info")));
        assert!(!has_log_extension(Path::new("server.txt")));
        assert!(!has_log_extension(Path::new("log")));
    }

    #[test]
    fn test_log_names() {
        assert!(has_log_name(Path::new("app.log.1")));
        assert!(has_log_name(Path::new("app.log.12")));
        assert!(has_log_name(Path::new("App.Log.Old")));
        assert!(has_log_name(Path::new("nginx.log.2024-02-15")));
        assert!(!has_log_name(Path::new("catalog.txt")));
        assert!(!has_log_name(Path::new("blog.md")));
    }

    #[test]
    fn test_sniff_uses_peek() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("output.txt");
        fs::write(&file, "irrelevant").unwrap();

        assert!(is_log_file_with(&file, |_| Ok(vec![
            "header".to_string(),
            "Feb 15 10:30:45 2024 boot".to_string(),
        ])));
        assert!(!is_log_file_with(&file, |_| Ok(vec!["plain text".to_string()])));
        assert!(!is_log_file_with(&file, |_| Err(io::Error::other("boom"))));
    }

    #[test]
    fn test_peek_skipped_for_named_logs() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("worker.log");
        fs::write(&file, "no dates").unwrap();

        assert!(is_log_file_with(&file, |_| panic!("must not peek")));
    }

    #[test]
    fn test_only_first_lines_sniffed() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("report.txt");
        let mut content = String::new();
        for i in 0..SNIFF_LINES {
            content.push_str(&format!("line {i}\n"));
        }
        content.push_str("2024-02-15 10:30:45 too late\n");
        fs::write(&file, content).unwrap();

        assert!(!is_log_file(&file));
    }

    #[test]
    fn test_non_utf8_head_is_not_log() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("blob.bin");
        fs::write(&file, [0xffu8, 0xfe, b'2', b'0', b'2', b'4', b'\n']).unwrap();

        assert!(!is_log_file(&file));
    }

    #[test]
    fn test_missing_and_directories_are_not_logs() {
        let temp = tempdir().unwrap();
        assert!(!is_log_file(temp.path().join("missing.log")));
        fs::create_dir(temp.path().join("dir.log")).unwrap();
        assert!(!is_log_file(temp.path().join("dir.log")));
    }

    #[test]
    fn test_find_log_files() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("nested")).unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join("app.log"), "x\n").unwrap();
        fs::write(temp.path().join("nested/worker.log.1"), "x\n").unwrap();
        fs::write(temp.path().join("nested/out.txt"), "02/15/2024 done\n").unwrap();
        fs::write(temp.path().join("nested/readme.md"), "hello\n").unwrap();
        fs::write(temp.path().join(".git/index.log"), "x\n").unwrap();

        let logs = find_log_files(temp.path()).unwrap();
        let names: Vec<_> = logs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(logs.len(), 3);
        assert!(names.contains(&"app.log".to_string()));
        assert!(names.contains(&"worker.log.1".to_string()));
        assert!(names.contains(&"out.txt".to_string()));
    }
}
