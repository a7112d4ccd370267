//! Shared plumbing for the site command-line tools: `site.toml` loading and
//! logging setup.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod logging;

pub use config::SiteConfig;
pub use logging::{init_logging, LogConfig};
