//! Address the fields of plain configuration structs through dotted paths.
//!
//! Dotfig makes an ordinary Rust struct readable and writable by key:
//! `audio.samplerate`, `server.timeout`, `plugins.echo.prefix`. You list the
//! fields once with the [`record!`] macro and get typed and textual get/set,
//! a usage listing of every key with its type, and TOML files in and out.
//!
//! ```ignore
//! #[derive(Default)]
//! struct Audio {
//!     enabled: bool,
//!     samplerate: u32,
//! }
//!
//! #[derive(Default)]
//! struct AppConfig {
//!     comment: String,
//!     audio: Audio,
//! }
//!
//! dotfig::record!(Audio { enabled, samplerate });
//! dotfig::record!(AppConfig { comment, audio: nested });
//!
//! let mut config = AppConfig::default();
//! dotfig::read_file(&mut config, "app.toml", true)?;
//! dotfig::assign(&mut config, "audio.samplerate=48000", true)?;
//! assert_eq!(config.audio.samplerate, 48000);
//! ```
//!
//! # Design: the struct stays plain
//!
//! The struct is never wrapped or replaced. Its listed fields are the schema:
//! their names (lower-cased) are the path segments and their Rust types pick
//! the leaf kind. Fields that are not listed are invisible. Sub-records can be
//! nested under their own name, inlined so their fields appear on the parent,
//! held optionally in `Option<Box<T>>`, or collected in a [`RecordMap`] whose
//! entries are registered at runtime and may each be a different type. See
//! the [`record`](mod@record) module for the field classes.
//!
//! # Kinds and text
//!
//! Every leaf has exactly one [`Kind`]. Typed writes ([`set`]) only accept a
//! [`Value`] of that exact kind; there is no widening from `i64` into an `i32`
//! field. Textual writes ([`set_from_str`]) parse according to the kind and
//! reject out-of-range text, so `256` never lands in a `u8` and `1e40` never
//! lands in an `f32`. Durations are [`TimeDelta`] values limited to a signed
//! 64-bit count of nanoseconds, written as compound text such as `1h30m`,
//! `-1.5s` or `10h9m8.007006005s`. String lists use TOML array syntax. A
//! failed write never changes the field.
//!
//! # Files and assignments
//!
//! TOML documents are applied with [`read_file`] and friends: every value in
//! the document is turned into a dotted path and parsed like an assignment,
//! and keys the document does not mention keep their values. [`write_file`]
//! renders the record back, deterministically, so rendering, reading and
//! rendering again reproduces the same bytes. [`persist_value`] edits a single
//! key in an existing file with `toml_edit`, keeping comments and layout.
//!
//! A [`Buffer`] collects files, directory globs and assignments while the
//! command line is parsed and applies them later, in order.
//!
//! # Strict mode
//!
//! Every operation that applies outside input takes a `strict` flag. When
//! set, a key that matches no field is an error. When cleared, unknown keys
//! are logged at debug level through `tracing` and skipped; every other
//! error still fails.
//!
//! # Clap adapter
//!
//! The `cli` module (behind the `clap` feature, on by default) offers
//! [`ConfigArgs`] with repeatable `-f/--config` and `-c/--set` flags, kept in
//! command-line order, and [`ConfigSubcommand`] for
//! `config usage|list|get|set|dump`. Both convert
//! into the framework-agnostic [`Buffer`] and [`ConfigAction`], which
//! [`handle`] executes.
//!
//! # Error handling
//!
//! All fallible operations return [`DotfigError`]. Messages are user-facing
//! and name the offending key or file.

pub mod error;
pub mod record;
pub mod types;

mod buffer;
#[cfg(feature = "clap")]
mod cli;
mod coerce;
mod duration;
mod file;
mod flatten;
mod ops;
mod path;
mod persist;
mod populate;
mod resolve;
mod sanitize;
mod value;

#[cfg(test)]
mod fixtures;

pub use buffer::Buffer;
#[cfg(feature = "clap")]
pub use cli::{ConfigArgs, ConfigSource, ConfigSubcommand};
pub use coerce::{assign, get, get_as, parse_text, render, render_text, set, set_from_str};
pub use error::DotfigError;
pub use file::{read, read_file, read_file_if_exists, read_str};
pub use flatten::{Leaves, enumerate, leaves};
pub use ops::{ConfigResult, dump, get_value, handle, list_values, set_value, usage};
pub use path::KeyPath;
pub use persist::{persist_value, set_in_document, write, write_file, write_string};
pub use populate::populate;
pub use record::{Descriptor, FieldInfo, FieldMut, FieldRef, FieldShape, Record, RecordMap};
pub use resolve::{resolve, resolve_mut};
pub use sanitize::sanitize;
pub use types::ConfigAction;
pub use value::{Kind, Leaf, Slot, Value};

pub use chrono::TimeDelta;
