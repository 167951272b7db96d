//! Writing records out as TOML, and patching single values into existing files.
//!
//! Full writes go through [`sanitize`] and are deterministic: rendering a
//! record, reading the text into a fresh record and rendering again yields the
//! same bytes. Single-value updates use `toml_edit` so comments and layout of
//! the target file survive. Parent directories are created as needed.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::coerce::{get, parse_text, render, set};
use crate::error::DotfigError;
use crate::ops::ConfigResult;
use crate::path::KeyPath;
use crate::record::Record;
use crate::sanitize::{leaf_to_toml, sanitize};

/// Render `record` as a TOML document.
pub fn write_string(record: &dyn Record) -> Result<String, DotfigError> {
    let table = sanitize(record)?;
    Ok(toml::to_string(&table)?)
}

/// Render `record` into `writer`.
pub fn write(record: &dyn Record, mut writer: impl Write) -> Result<(), DotfigError> {
    let text = write_string(record)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| DotfigError::IoError {
            path: PathBuf::from("<output>"),
            source: e,
        })
}

/// Render `record` to the file at `path`, replacing it.
pub fn write_file(record: &dyn Record, path: impl AsRef<Path>) -> Result<(), DotfigError> {
    let path = path.as_ref();
    let text = write_string(record)?;
    create_parent(path)?;
    debug!(path = %path.display(), "writing config file");
    std::fs::write(path, text).map_err(|e| DotfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Pure function: set `key` in `record` from `text`, and patch the same key
/// into the TOML document `content` (or an empty one).
///
/// The value is parsed with the field's declared kind, so the document only
/// ever receives values the record accepts. The record is written last: if
/// the text, the document or the path through it is rejected, the record is
/// left as it was. Returns the modified document.
pub fn set_in_document(
    record: &mut dyn Record,
    content: Option<&str>,
    key: &KeyPath,
    text: &str,
    origin: &Path,
) -> Result<String, DotfigError> {
    let edit_error = |source| DotfigError::EditError {
        path: origin.to_path_buf(),
        source,
    };
    let mut doc: toml_edit::DocumentMut = content.unwrap_or("").parse().map_err(edit_error)?;

    let kind = get(record, key)?.kind();
    let parsed = parse_text(kind, text).map_err(|reason| DotfigError::InvalidValue {
        key: key.to_string(),
        reason,
    })?;
    let stored = leaf_to_toml(parsed.clone(), key.segments())?;
    let value: toml_edit::Value = stored.to_string().parse().map_err(edit_error)?;

    let Some((leaf, parents)) = key.segments().split_last() else {
        return Err(DotfigError::EmptyPath);
    };
    let mut current: &mut toml_edit::Item = doc.as_item_mut();
    for segment in parents {
        if current.get(segment).is_none() {
            let mut table = toml_edit::Table::new();
            table.set_implicit(true);
            current[segment.as_str()] = toml_edit::Item::Table(table);
        }
        current = &mut current[segment.as_str()];
        if !current.is_table_like() {
            return Err(DotfigError::NotARecord(key.to_string()));
        }
    }
    set(record, key, parsed)?;
    current[leaf.as_str()] = toml_edit::value(value);

    Ok(doc.to_string())
}

/// I/O wrapper: reads the file (if it exists), patches `key`, writes it back.
pub fn persist_value(
    record: &mut dyn Record,
    file_path: &Path,
    key: &KeyPath,
    text: &str,
) -> Result<ConfigResult, DotfigError> {
    let content = match std::fs::read_to_string(file_path) {
        Ok(c) => Some(c),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            return Err(DotfigError::IoError {
                path: file_path.to_path_buf(),
                source: e,
            });
        }
    };

    let new_content = set_in_document(record, content.as_deref(), key, text, file_path)?;

    create_parent(file_path)?;
    std::fs::write(file_path, &new_content).map_err(|e| DotfigError::IoError {
        path: file_path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %file_path.display(), key = %key, "persisted value");

    Ok(ConfigResult::ValueSet {
        key: key.to_string(),
        value: render(record, key)?,
    })
}

fn create_parent(path: &Path) -> Result<(), DotfigError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| DotfigError::IoError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}
