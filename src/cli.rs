//! Clap adapter for dotfig.
//!
//! Compiled only when the `clap` Cargo feature is enabled (on by default).
//! [`ConfigArgs`] adds the usual `-f/--config FILE` and `-c/--set PATH=VALUE`
//! flags to an application's parser and turns them into a [`Buffer`];
//! [`ConfigSubcommand`] provides `config usage|list|get|set|dump` and maps to
//! a framework-agnostic [`ConfigAction`](crate::ConfigAction).

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Args, Command, FromArgMatches, Subcommand, value_parser};

use crate::buffer::Buffer;
use crate::error::DotfigError;
use crate::types::ConfigAction;

const FILES: &str = "config_files";
const ASSIGNMENTS: &str = "config_assignments";
const IGNORE_UNKNOWN: &str = "ignore_unknown";

/// One `-f` or `-c` flag, in command-line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Assignment(String),
}

/// Configuration flags for a clap parser.
///
/// Flatten this into your app's parser:
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     config: ConfigArgs,
/// }
/// ```
///
/// `-f` and `-c` keep their relative order, so `-c bar=2 -f app.toml` lets
/// the file override the assignment.
#[derive(Debug, Default)]
pub struct ConfigArgs {
    pub sources: Vec<ConfigSource>,
    pub ignore_unknown: bool,
}

impl ConfigArgs {
    /// Buffer the sources in command-line order.
    pub fn into_buffer(self) -> Result<Buffer, DotfigError> {
        let mut buffer = Buffer::new();
        self.extend_buffer(&mut buffer)?;
        Ok(buffer)
    }

    /// Append the sources in command-line order after whatever `buffer`
    /// already holds (typically default file patterns).
    pub fn extend_buffer(self, buffer: &mut Buffer) -> Result<(), DotfigError> {
        for source in self.sources {
            match source {
                ConfigSource::File(file) => buffer.add_file(file)?,
                ConfigSource::Assignment(expr) => buffer.add_assignment(expr)?,
            }
        }
        Ok(())
    }

    /// Whether flushing should reject unknown keys.
    pub fn strict(&self) -> bool {
        !self.ignore_unknown
    }
}

/// Pair every value of `id` with its position on the command line.
fn indexed<T: Clone + Send + Sync + 'static>(
    matches: &ArgMatches,
    id: &str,
    wrap: impl Fn(T) -> ConfigSource,
) -> Vec<(usize, ConfigSource)> {
    match (matches.indices_of(id), matches.get_many::<T>(id)) {
        (Some(indices), Some(values)) => indices
            .zip(values)
            .map(|(index, value)| (index, wrap(value.clone())))
            .collect(),
        _ => Vec::new(),
    }
}

impl FromArgMatches for ConfigArgs {
    fn from_arg_matches(matches: &ArgMatches) -> Result<Self, clap::Error> {
        let mut args = ConfigArgs::default();
        args.update_from_arg_matches(matches)?;
        Ok(args)
    }

    fn update_from_arg_matches(&mut self, matches: &ArgMatches) -> Result<(), clap::Error> {
        let mut sources = indexed(matches, FILES, ConfigSource::File);
        sources.extend(indexed(matches, ASSIGNMENTS, ConfigSource::Assignment));
        sources.sort_by_key(|(index, _)| *index);
        self.sources = sources.into_iter().map(|(_, source)| source).collect();
        self.ignore_unknown = matches.get_flag(IGNORE_UNKNOWN);
        Ok(())
    }
}

impl Args for ConfigArgs {
    fn augment_args(cmd: Command) -> Command {
        cmd.arg(
            Arg::new(FILES)
                .short('f')
                .long("config")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Append)
                .help("Read a configuration file (repeatable, applied in order)"),
        )
        .arg(
            Arg::new(ASSIGNMENTS)
                .short('c')
                .long("set")
                .value_name("PATH=VALUE")
                .value_parser(value_parser!(String))
                .action(ArgAction::Append)
                .help("Set a configuration value (repeatable, applied in order)"),
        )
        .arg(
            Arg::new(IGNORE_UNKNOWN)
                .long("ignore-unknown")
                .action(ArgAction::SetTrue)
                .help("Skip keys that match no configuration field instead of failing"),
        )
    }

    fn augment_args_for_update(cmd: Command) -> Command {
        Self::augment_args(cmd)
    }
}

/// Available config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// List every configuration key with its type.
    Usage,
    /// Show every configuration key with its current value.
    List,
    /// Show the current value of a configuration key.
    Get {
        /// Dotted key path (e.g. "audio.samplerate").
        key: String,
    },
    /// Set a configuration value, optionally persisting it to a file.
    Set {
        /// Dotted key path (e.g. "audio.samplerate").
        key: String,
        /// Value to set.
        value: String,
        /// Also write the value into this TOML file.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Print the whole configuration as TOML.
    Dump {
        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl ConfigSubcommand {
    /// Convert the parsed subcommand into a framework-agnostic `ConfigAction`.
    pub fn into_action(self) -> ConfigAction {
        match self {
            ConfigSubcommand::Usage => ConfigAction::Usage,
            ConfigSubcommand::List => ConfigAction::List,
            ConfigSubcommand::Get { key } => ConfigAction::Get { key },
            ConfigSubcommand::Set { key, value, file } => ConfigAction::Set { key, value, file },
            ConfigSubcommand::Dump { output } => ConfigAction::Dump { output },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    use crate::fixtures::test::new_test_config;

    /// Wrapper so we can use `try_parse_from` on the flags and subcommand.
    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ConfigArgs,

        #[command(subcommand)]
        command: Option<ConfigSubcommand>,
    }

    fn parse(args: &[&str]) -> TestCli {
        TestCli::try_parse_from(args).unwrap()
    }

    fn file(path: &str) -> ConfigSource {
        ConfigSource::File(PathBuf::from(path))
    }

    fn assignment(expr: &str) -> ConfigSource {
        ConfigSource::Assignment(expr.into())
    }

    fn flush_bar(args: &[&str]) -> i32 {
        let cli = parse(args);
        let strict = cli.config.strict();
        let buffer = cli.config.into_buffer().unwrap();
        let mut config = new_test_config();
        buffer.flush(&mut config, strict).unwrap();
        config.bar
    }

    #[test]
    fn no_flags() {
        let cli = parse(&["test"]);
        assert!(cli.config.sources.is_empty());
        assert!(cli.config.strict());
        assert!(cli.command.is_none());
    }

    #[test]
    fn repeated_flags_keep_order() {
        let cli = parse(&[
            "test",
            "-f",
            "a.toml",
            "--config",
            "b.toml",
            "-c",
            "bar=1",
            "--set",
            "foo.key1=true",
        ]);
        assert_eq!(
            cli.config.sources,
            [
                file("a.toml"),
                file("b.toml"),
                assignment("bar=1"),
                assignment("foo.key1=true"),
            ]
        );
    }

    #[test]
    fn interleaved_flags_keep_command_line_order() {
        let cli = parse(&[
            "test", "-c", "bar=1", "-f", "a.toml", "--set", "bar=2", "--config", "b.toml",
        ]);
        assert_eq!(
            cli.config.sources,
            [
                assignment("bar=1"),
                file("a.toml"),
                assignment("bar=2"),
                file("b.toml"),
            ]
        );
    }

    #[test]
    fn ignore_unknown_flag() {
        let cli = parse(&["test", "--ignore-unknown"]);
        assert!(!cli.config.strict());
    }

    #[test]
    fn later_file_overrides_earlier_assignment() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.toml");
        fs::write(&path, "bar = 1\n").unwrap();
        let path_arg = path.to_string_lossy().into_owned();

        assert_eq!(flush_bar(&["test", "-c", "bar=2", "-f", &path_arg]), 1);
    }

    #[test]
    fn later_assignment_overrides_earlier_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.toml");
        fs::write(&path, "bar = 1\n").unwrap();
        let path_arg = path.to_string_lossy().into_owned();

        assert_eq!(flush_bar(&["test", "-f", &path_arg, "-c", "bar=2"]), 2);
    }

    #[test]
    fn extend_buffer_appends_after_defaults() {
        let dir = TempDir::new().unwrap();
        let defaults = dir.path().join("defaults.toml");
        fs::write(&defaults, "bar = 1\nfoo.key4 = 7\n").unwrap();

        let cli = parse(&["test", "-c", "bar=3"]);
        let mut buffer = Buffer::new();
        buffer.add_file(defaults.clone()).unwrap();
        cli.config.extend_buffer(&mut buffer).unwrap();

        let mut config = new_test_config();
        buffer.flush(&mut config, true).unwrap();
        assert_eq!(config.bar, 3);
        assert_eq!(config.foo.key4, 7);
    }

    #[test]
    fn empty_assignment_is_rejected() {
        let cli = parse(&["test", "-c", ""]);
        assert!(matches!(
            cli.config.into_buffer(),
            Err(DotfigError::EmptyInput(_))
        ));
    }

    #[test]
    fn parse_usage_and_list() {
        assert_eq!(
            parse(&["test", "usage"]).command.unwrap().into_action(),
            ConfigAction::Usage
        );
        assert_eq!(
            parse(&["test", "list"]).command.unwrap().into_action(),
            ConfigAction::List
        );
    }

    #[test]
    fn parse_get() {
        let action = parse(&["test", "get", "baz.interval"]).command.unwrap().into_action();
        assert_eq!(
            action,
            ConfigAction::Get {
                key: "baz.interval".into()
            }
        );
    }

    #[test]
    fn parse_set() {
        let action = parse(&["test", "set", "bar", "3000"]).command.unwrap().into_action();
        assert_eq!(
            action,
            ConfigAction::Set {
                key: "bar".into(),
                value: "3000".into(),
                file: None,
            }
        );
    }

    #[test]
    fn parse_set_with_file() {
        let action = parse(&["test", "set", "bar", "3000", "--file", "app.toml"])
            .command
            .unwrap()
            .into_action();
        assert_eq!(
            action,
            ConfigAction::Set {
                key: "bar".into(),
                value: "3000".into(),
                file: Some(PathBuf::from("app.toml")),
            }
        );
    }

    #[test]
    fn parse_dump_with_output() {
        let action = parse(&["test", "dump", "-o", "out.toml"])
            .command
            .unwrap()
            .into_action();
        assert_eq!(
            action,
            ConfigAction::Dump {
                output: Some(PathBuf::from("out.toml"))
            }
        );
    }

    #[test]
    fn invalid_subcommand_errors() {
        let result = TestCli::try_parse_from(["test", "nope"]);
        assert!(result.is_err());
    }
}
