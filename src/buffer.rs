//! Deferred configuration sources.
//!
//! A [`Buffer`] collects file names, directory globs and `path=value`
//! assignments while command-line arguments are being parsed, and applies
//! them to a record later in exactly the order they were added. Later entries
//! override earlier ones.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::coerce::assign;
use crate::error::DotfigError;
use crate::file::{read_file, read_file_if_exists};
use crate::record::Record;

#[derive(Debug, Clone, PartialEq)]
enum Entry {
    /// A file that must exist.
    File(PathBuf),
    /// A glob; each match is read if it still exists at flush time.
    Pattern(String),
    Assignment(String),
}

/// Ordered list of configuration sources waiting to be applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buffer {
    entries: Vec<Entry>,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with default file names or glob patterns. Empty ones are skipped.
    pub fn with_defaults<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = patterns
            .into_iter()
            .map(Into::into)
            .filter(|pattern: &String| !pattern.is_empty())
            .map(Entry::Pattern)
            .collect();
        Self { entries }
    }

    /// Buffer a file to read.
    pub fn add_file(&mut self, path: impl Into<PathBuf>) -> Result<(), DotfigError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(DotfigError::EmptyInput("file name"));
        }
        self.entries.push(Entry::File(path));
        Ok(())
    }

    /// Buffer a file to read, discarding everything buffered so far.
    pub fn replace_files(&mut self, path: impl Into<PathBuf>) -> Result<(), DotfigError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(DotfigError::EmptyInput("file name"));
        }
        self.entries.clear();
        self.entries.push(Entry::File(path));
        Ok(())
    }

    /// Buffer every file in `dir` matching the glob `pattern`.
    pub fn add_dir(&mut self, dir: impl AsRef<Path>, pattern: &str) -> Result<(), DotfigError> {
        let dir = dir.as_ref();
        if dir.as_os_str().is_empty() {
            return Err(DotfigError::EmptyInput("directory name"));
        }
        if pattern.is_empty() {
            return Err(DotfigError::EmptyInput("glob pattern"));
        }
        let joined = dir.join(pattern).to_string_lossy().into_owned();
        self.entries.push(Entry::Pattern(joined));
        Ok(())
    }

    /// Buffer a `path=value` assignment.
    pub fn add_assignment(&mut self, expr: impl Into<String>) -> Result<(), DotfigError> {
        let expr = expr.into();
        if expr.is_empty() {
            return Err(DotfigError::EmptyInput("expression"));
        }
        self.entries.push(Entry::Assignment(expr));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply every buffered entry to `record`, in order.
    ///
    /// Stops at the first error; entries applied before it stay applied.
    pub fn flush(&self, record: &mut dyn Record, strict: bool) -> Result<(), DotfigError> {
        for entry in &self.entries {
            debug!(?entry, "flushing buffered config entry");
            match entry {
                Entry::File(path) => read_file(record, path, strict)?,
                Entry::Pattern(pattern) => {
                    for path in glob_sorted(pattern)? {
                        read_file_if_exists(record, &path, strict)?;
                    }
                }
                Entry::Assignment(expr) => assign(record, expr, strict)?,
            }
        }
        Ok(())
    }

    /// [`flush`](Self::flush) with unknown keys rejected.
    pub fn apply(&self, record: &mut dyn Record) -> Result<(), DotfigError> {
        self.flush(record, true)
    }
}

fn glob_sorted(pattern: &str) -> Result<Vec<PathBuf>, DotfigError> {
    let paths = glob::glob(pattern).map_err(|e| DotfigError::PatternError {
        pattern: pattern.into(),
        source: e,
    })?;
    let mut matches = paths
        .map(|entry| {
            entry.map_err(|e| DotfigError::IoError {
                path: e.path().to_path_buf(),
                source: std::io::Error::from(e),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    matches.sort();
    Ok(matches)
}
