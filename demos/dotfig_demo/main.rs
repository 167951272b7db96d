//! # dotfig demo application
//!
//! A sample CLI tool that shows how to wire [dotfig](https://docs.rs/dotfig)
//! into an application. It exists purely to demonstrate and manually verify
//! dotfig's features.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example dotfig_demo -- echo
//! cargo run --example dotfig_demo -- config usage
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature                  | How to exercise it                                                          |
//! |--------------------------|-----------------------------------------------------------------------------|
//! | Compiled defaults        | `cargo run --example dotfig_demo -- echo`                                   |
//! | Default directory        | Put `*.toml` files in `./dotfig-demo.d/`, then run `echo`                   |
//! | Explicit file            | `cargo run --example dotfig_demo -- -f my.toml echo`                        |
//! | Assignment               | `cargo run --example dotfig_demo -- -c server.port=8080 echo`               |
//! | Inline field             | `cargo run --example dotfig_demo -- -c display.color=red echo`              |
//! | Plugin map entry         | `cargo run --example dotfig_demo -- -c plugins.echo.prefix=">>" echo`       |
//! | Lenient mode             | `cargo run --example dotfig_demo -- --ignore-unknown -c nope=1 echo`        |
//! | `config usage`           | `cargo run --example dotfig_demo -- config usage`                           |
//! | `config list`            | `cargo run --example dotfig_demo -- config list`                            |
//! | `config get`             | `cargo run --example dotfig_demo -- config get server.timeout`              |
//! | `config set`             | `cargo run --example dotfig_demo -- config set server.port 8080 --file a.toml` |
//! | `config dump`            | `cargo run --example dotfig_demo -- config dump -o out.toml`                |
//! | Debug logging            | `cargo run --example dotfig_demo -- --log-level debug echo`                 |

mod config;

use clap::{Parser, Subcommand};
use tracing_subscriber::fmt;

use dotfig::{Buffer, ConfigArgs, ConfigSubcommand, Value, handle, list_values};

use config::DemoConfig;

/// dotfig demo: a sample CLI app for showcasing dotfig integration.
#[derive(Parser, Debug)]
#[command(name = "dotfig-demo")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Log level for dotfig's diagnostics (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the resolved configuration.
    Echo,
    /// Inspect or modify the configuration.
    Config {
        #[command(subcommand)]
        action: ConfigSubcommand,
    },
}

fn init_logging(level: tracing::Level) {
    // Logs go to stderr so stdout stays usable for command output.
    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn load(args: ConfigArgs) -> Result<DemoConfig, dotfig::DotfigError> {
    let strict = args.strict();
    let mut buffer = Buffer::with_defaults(["dotfig-demo.d/*.toml"]);
    args.extend_buffer(&mut buffer)?;

    let mut config = DemoConfig::default();
    buffer.flush(&mut config, strict)?;
    Ok(config)
}

fn echo(config: &DemoConfig) {
    if config.verbose {
        println!("[verbose] resolved configuration for {:?}", config.name);
    }
    println!("{} listening on {}:{}", config.name, config.server.host, config.server.port);
    println!(
        "timeout {}, colour {}",
        Value::from(config.server.timeout),
        config.display.palette.color
    );
    println!("{}", list_values(config));
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let mut config = load(cli.config).unwrap_or_else(|e| {
        eprintln!("Failed to load config:\n{e}");
        std::process::exit(1);
    });

    match cli.command {
        Commands::Echo => echo(&config),
        Commands::Config { action } => {
            let result = handle(&mut config, &action.into_action()).unwrap_or_else(|e| {
                eprintln!("Config error:\n{e}");
                std::process::exit(1);
            });
            println!("{result}");
        }
    }
}
