//! Configuration structs for the dotfig demo application.
//!
//! The hierarchy covers every field class dotfig understands:
//!
//! | Key                       | Class                          |
//! |---------------------------|--------------------------------|
//! | `name`, `verbose`         | top-level leaves               |
//! | `server.*`                | nested record                  |
//! | `server.timeout`          | duration leaf                  |
//! | `server.tls.*`            | optional record (unset)        |
//! | `display.*`               | nested record                  |
//! | `display.color`           | promoted from an inline record |
//! | `plugins.<name>.*`        | dynamic map of plugin records  |

use dotfig::{RecordMap, TimeDelta, record};

/// Root configuration for the demo application.
pub struct DemoConfig {
    pub name: String,
    pub verbose: bool,
    pub server: ServerConfig,
    pub display: DisplayConfig,
    pub plugins: RecordMap,
}

record!(DemoConfig {
    name,
    verbose,
    server: nested,
    display: nested,
    plugins: map,
});

impl Default for DemoConfig {
    fn default() -> Self {
        let mut plugins = RecordMap::new();
        plugins.insert("echo", EchoPlugin::default());
        plugins.insert("metrics", MetricsPlugin::default());
        Self {
            name: "dotfig-demo".into(),
            verbose: false,
            server: ServerConfig::default(),
            display: DisplayConfig::default(),
            plugins,
        }
    }
}

/// Server-related configuration, under `[server]`.
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub timeout: TimeDelta,
    pub allowed: Vec<String>,
    /// Only reachable once allocated; the demo leaves it unset.
    pub tls: Option<Box<TlsConfig>>,
}

record!(ServerConfig {
    host,
    port,
    timeout,
    allowed,
    tls: optional,
});

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            timeout: TimeDelta::seconds(30),
            allowed: vec!["localhost".into()],
            tls: None,
        }
    }
}

#[derive(Default)]
pub struct TlsConfig {
    pub cert: String,
    pub key: String,
}

record!(TlsConfig { cert, key });

/// Display settings, under `[display]`.
pub struct DisplayConfig {
    pub format: String,
    pub palette: Palette,
}

record!(DisplayConfig {
    format,
    palette: inline,
});

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: "table".into(),
            palette: Palette {
                color: "yellow".into(),
            },
        }
    }
}

/// Shared colour settings; its fields appear directly under `display`.
#[derive(Default)]
pub struct Palette {
    pub color: String,
}

record!(Palette { color });

#[derive(Default)]
pub struct EchoPlugin {
    pub prefix: String,
}

record!(EchoPlugin { prefix });

#[derive(Default)]
pub struct MetricsPlugin {
    pub interval: TimeDelta,
    pub enabled: bool,
}

record!(MetricsPlugin { interval, enabled });
