//! Dotted key paths such as `audio.samplerate`.
//!
//! A [`KeyPath`] is the parsed form: a non-empty list of non-empty segments.
//! Segments are matched verbatim against the lower-cased field names of a
//! record, so `Audio.SampleRate` does not resolve.

use std::fmt;
use std::str::FromStr;

use crate::error::DotfigError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Parse a dotted path. Fails on empty text or an empty segment
    /// (`a..b`, `.a`, `a.`).
    pub fn parse(text: &str) -> Result<Self, DotfigError> {
        if text.is_empty() {
            return Err(DotfigError::EmptyPath);
        }
        let segments: Vec<String> = text.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(DotfigError::EmptySegment(text.into()));
        }
        Ok(Self { segments })
    }

    /// Build a path from segments produced by walking a record tree.
    pub(crate) fn from_segments(segments: Vec<String>) -> Self {
        debug_assert!(!segments.is_empty());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Never true for a parsed path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for KeyPath {
    type Err = DotfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KeyPath::parse(s)
    }
}

impl TryFrom<&str> for KeyPath {
    type Error = DotfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        KeyPath::parse(value)
    }
}
