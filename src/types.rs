use std::path::PathBuf;

/// A config operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigAction {
    /// Every addressable key with its kind.
    Usage,
    /// Every addressable key with its current value.
    List,
    Get {
        key: String,
    },
    /// Set a value in memory, and in `file` when one is given.
    Set {
        key: String,
        value: String,
        file: Option<PathBuf>,
    },
    /// Render the whole record, to stdout or to `output`.
    Dump {
        output: Option<PathBuf>,
    },
}
