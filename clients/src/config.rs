//! `site.toml`: runtime settings shared by every client.
//!
//! ```toml
//! [navigation]
//! transition_duration_ms = 250
//!
//! [worker]
//! version = "v2"
//! ```
//!
//! Both tables are optional and every key has a default.

use std::path::Path;

use anyhow::{Context, Result};
use danis_navigation::NavigationConfig;
use danis_worker::WorkerConfig;
use serde::Deserialize;

/// Parsed `site.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// `[navigation]` table.
    pub navigation: NavigationConfig,
    /// `[worker]` table.
    pub worker: WorkerConfig,
}

impl SiteConfig {
    /// Parses TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid TOML, unknown tables or mistyped keys.
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid site configuration")
    }

    /// Loads `path`, or the defaults when no path is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config =
            Self::parse(&text).with_context(|| format!("loading {}", path.display()))?;
        tracing::debug!(path = %path.display(), cache = %config.worker.cache_name(), "site configuration loaded");
        Ok(config)
    }
}
