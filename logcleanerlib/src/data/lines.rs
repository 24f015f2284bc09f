//! Reading files into terminated lines and writing them back safely.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::LogCleanerError;
use crate::Result;

/// Split content into lines, each keeping its own terminator.
///
/// The last line has no terminator if the content does not end with one.
pub fn split_lines(content: &str) -> Vec<String> {
    content.split_inclusive('\n').map(str::to_string).collect()
}

/// Read a UTF-8 file into terminated lines.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| LogCleanerError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(split_lines(&content))
}

/// Replace a file's content with the given lines.
///
/// The content is written to a temporary file next to the target and then
/// renamed over it, so the target is never left half-written. The target's
/// permissions are carried over. A symlink is followed and the file it points
/// to is replaced, leaving the link itself intact.
pub fn write_lines(path: impl AsRef<Path>, lines: &[String]) -> Result<()> {
    let path = path.as_ref();
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let write_err = |source: std::io::Error| LogCleanerError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    for line in lines {
        tmp.write_all(line.as_bytes()).map_err(write_err)?;
    }
    tmp.flush().map_err(write_err)?;

    if let Ok(metadata) = fs::metadata(&target) {
        fs::set_permissions(tmp.path(), metadata.permissions()).map_err(write_err)?;
    }

    tmp.persist(&target).map_err(|e| write_err(e.error))?;
    Ok(())
}
