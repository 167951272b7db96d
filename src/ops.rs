//! Config operations: usage listing, key lookup, value listing, dumping, and
//! the `ConfigResult` enum callers use to display results.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::coerce::{assign, render, render_text};
use crate::error::DotfigError;
use crate::flatten::{enumerate, leaves};
use crate::path::KeyPath;
use crate::persist::{persist_value, write_file, write_string};
use crate::record::Record;
use crate::types::ConfigAction;
use crate::value::Kind;

/// Result of a config operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigResult {
    /// Every addressable key with its kind.
    Usage { entries: Vec<(String, Kind)> },
    /// Every addressable key with its rendered value.
    Listing { entries: Vec<(String, String)> },
    /// One key's rendered value.
    KeyValue { key: String, value: String },
    /// Confirmation that a value was set.
    ValueSet { key: String, value: String },
    /// A rendered TOML document.
    Rendered(String),
    /// Confirmation that the document was written to a file.
    Written { path: PathBuf },
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::Usage { entries } => {
                for (i, (key, kind)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} {kind}")?;
                }
                Ok(())
            }
            ConfigResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
            ConfigResult::KeyValue { key, value } => write!(f, "{key} = {value}"),
            ConfigResult::ValueSet { key, value } => write!(f, "Set {key} = {value}"),
            ConfigResult::Rendered(text) => write!(f, "{text}"),
            ConfigResult::Written { path } => {
                write!(f, "Config written to {}", path.display())
            }
        }
    }
}

/// List every addressable key with its kind, in declaration order.
pub fn usage(record: &dyn Record) -> ConfigResult {
    ConfigResult::Usage {
        entries: enumerate(record)
            .map(|(path, kind)| (path.to_string(), kind))
            .collect(),
    }
}

/// List every addressable key with its current value.
pub fn list_values(record: &dyn Record) -> ConfigResult {
    ConfigResult::Listing {
        entries: leaves(record)
            .map(|(path, slot)| (path.to_string(), render_text(&slot.get())))
            .collect(),
    }
}

/// Get a config value by dotted key.
pub fn get_value(record: &dyn Record, key: &str) -> Result<ConfigResult, DotfigError> {
    let path = KeyPath::parse(key)?;
    Ok(ConfigResult::KeyValue {
        key: path.to_string(),
        value: render(record, &path)?,
    })
}

/// Set a config value in memory from its text form.
pub fn set_value(
    record: &mut dyn Record,
    key: &str,
    value: &str,
) -> Result<ConfigResult, DotfigError> {
    let path = KeyPath::parse(key)?;
    assign(record, &format!("{path}={value}"), true)?;
    Ok(ConfigResult::ValueSet {
        key: path.to_string(),
        value: render(record, &path)?,
    })
}

/// Render the record, or write it to `output`.
pub fn dump(record: &dyn Record, output: Option<&Path>) -> Result<ConfigResult, DotfigError> {
    match output {
        Some(path) => {
            write_file(record, path)?;
            Ok(ConfigResult::Written {
                path: path.to_path_buf(),
            })
        }
        None => Ok(ConfigResult::Rendered(write_string(record)?)),
    }
}

/// Run one [`ConfigAction`] against `record`.
pub fn handle(record: &mut dyn Record, action: &ConfigAction) -> Result<ConfigResult, DotfigError> {
    match action {
        ConfigAction::Usage => Ok(usage(record)),
        ConfigAction::List => Ok(list_values(record)),
        ConfigAction::Get { key } => get_value(record, key),
        ConfigAction::Set {
            key,
            value,
            file: None,
        } => set_value(record, key, value),
        ConfigAction::Set {
            key,
            value,
            file: Some(file),
        } => persist_value(record, file, &KeyPath::parse(key)?, value),
        ConfigAction::Dump { output } => dump(record, output.as_deref()),
    }
}
