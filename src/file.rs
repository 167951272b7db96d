//! Reading TOML configuration into records.
//!
//! Every reader parses the whole document first and only then writes into the
//! record, so a syntax error never leaves a half-applied file behind. Value
//! errors during population do stop midway; see [`populate`].

use std::io::Read;
use std::path::{Path, PathBuf};

use toml::Table;
use tracing::debug;

use crate::error::DotfigError;
use crate::populate::populate;
use crate::record::Record;

/// Apply TOML text to `record`.
pub fn read_str(record: &mut dyn Record, text: &str, strict: bool) -> Result<(), DotfigError> {
    let table = parse(text, Path::new("<input>"))?;
    populate(record, &table, strict)
}

/// Apply TOML read from `reader` to `record`.
pub fn read(record: &mut dyn Record, mut reader: impl Read, strict: bool) -> Result<(), DotfigError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| DotfigError::IoError {
            path: PathBuf::from("<input>"),
            source: e,
        })?;
    read_str(record, &text, strict)
}

/// Apply the TOML file at `path` to `record`. A missing file is an error.
pub fn read_file(
    record: &mut dyn Record,
    path: impl AsRef<Path>,
    strict: bool,
) -> Result<(), DotfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| DotfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    apply_file(record, path, &text, strict)
}

/// Like [`read_file`], but a missing file is skipped.
///
/// Returns whether the file existed.
pub fn read_file_if_exists(
    record: &mut dyn Record,
    path: impl AsRef<Path>,
    strict: bool,
) -> Result<bool, DotfigError> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(text) => apply_file(record, path, &text, strict).map(|()| true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            Ok(false)
        }
        Err(e) => Err(DotfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn apply_file(
    record: &mut dyn Record,
    path: &Path,
    text: &str,
    strict: bool,
) -> Result<(), DotfigError> {
    debug!(path = %path.display(), "reading config file");
    let table = parse(text, path)?;
    populate(record, &table, strict)
}

fn parse(text: &str, path: &Path) -> Result<Table, DotfigError> {
    toml::from_str(text).map_err(|e| DotfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}
