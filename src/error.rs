use std::path::PathBuf;
use thiserror::Error;

use crate::value::Kind;

#[derive(Debug, Error)]
pub enum DotfigError {
    #[error("Key path is empty")]
    EmptyPath,

    #[error("Key path '{0}' contains an empty segment")]
    EmptySegment(String),

    #[error("Unknown key '{0}'")]
    UnknownKey(String),

    #[error("Key '{0}' goes through an optional record that is not allocated")]
    NilEmbedded(String),

    #[error("Key '{0}' descends below a value")]
    NotARecord(String),

    #[error("Key '{0}' names a section, not a value")]
    NotALeaf(String),

    #[error("Type mismatch for '{key}': expected {expected}, got {found}")]
    KindMismatch {
        key: String,
        expected: Kind,
        found: Kind,
    },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Unsupported value for '{key}': {reason}")]
    UnsupportedValue { key: String, reason: String },

    #[error("Invalid assignment '{0}' (expected path=value)")]
    InvalidAssignment(String),

    #[error("Configuration {0} is empty")]
    EmptyInput(&'static str),

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to edit {path}: {source}")]
    EditError {
        path: PathBuf,
        source: toml_edit::TomlError,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to render configuration: {0}")]
    RenderError(#[from] toml::ser::Error),

    #[error("Invalid file pattern '{pattern}': {source}")]
    PatternError {
        pattern: String,
        source: glob::PatternError,
    },
}

impl DotfigError {
    /// True for errors that non-strict population is allowed to skip.
    pub fn is_unknown_key(&self) -> bool {
        matches!(self, DotfigError::UnknownKey(_))
    }
}
