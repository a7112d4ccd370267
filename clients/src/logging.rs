//! Logging setup for the command-line tools.
//!
//! Libraries only emit `tracing` events; the binaries decide where they go.
//!
//! # Log Levels
//!
//! - `error`: install failures
//! - `warn`: soft navigations that fell back to a full load, failed fetches
//! - `info`: lifecycle progress (install, activate, cache eviction)
//! - `debug`: transition phases, cache hits, revalidation outcomes
//! - `trace`: link filter decisions, state changes

use std::io;

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crates whose events follow the verbosity flag.
const CRATES: [&str; 5] = [
    "danis_net",
    "danis_navigation",
    "danis_worker",
    "danis_conformance",
    "danis_clients",
];

/// How log output looks.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level for the site crates.
    pub level: Level,
    /// Include the module path of each event.
    pub with_target: bool,
    /// Use ANSI colors.
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            with_target: false,
            with_ansi: true,
        }
    }
}

impl LogConfig {
    /// Level from a `-v` count: none is `warn`, then `info`, `debug`, `trace`.
    /// Module paths are shown at `trace`.
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            with_target: level == Level::TRACE,
            ..Self::default()
        }
    }
}

/// Installs the global subscriber, writing to stderr. `RUST_LOG` overrides
/// the configured level.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let layer = fmt::layer()
        .compact()
        .without_time()
        .with_writer(io::stderr)
        .with_ansi(config.with_ansi)
        .with_target(config.with_target);

    tracing_subscriber::registry()
        .with(build_env_filter(config.level))
        .with(layer)
        .try_init()?;
    Ok(())
}

/// Every site crate at `level`, everything else at `warn`.
fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(level)))
}

fn directives(level: Level) -> String {
    let level = level.as_str().to_lowercase();
    std::iter::once("warn".to_string())
        .chain(CRATES.iter().map(|krate| format!("{krate}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}
