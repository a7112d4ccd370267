//! `site-precache` — Installs and activates the offline worker against a live
//! origin.
//!
//! Fetches the whole precache manifest (all or nothing), activates the
//! worker, and prints what was cached and which stale caches were evicted.
//! When the configuration disables automatic skip-waiting, the tool posts
//! the skip-waiting message itself, as a page would.
//!
//! **Usage:**
//! ```text
//! site-precache --origin <url> [--config <site.toml>] [--timeout <secs>] [-v]
//! ```
//!
//! Exits non-zero if the install fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use danis_clients::{init_logging, LogConfig, SiteConfig};
use danis_net::HttpNetwork;
use danis_worker::ServiceWorker;
use url::Url;

/// Precache a site the way its offline worker does.
#[derive(Parser)]
#[command(
    name = "site-precache",
    about = "Install and activate the offline worker against a live origin"
)]
struct Args {
    /// Site origin, e.g. https://danisphotography.com/
    #[arg(long)]
    origin: Url,

    /// Runtime settings (`site.toml`); defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 15)]
    timeout: u64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&LogConfig::from_verbosity(args.verbose))?;
    let config = SiteConfig::load(args.config.as_deref())?;

    let network = HttpNetwork::new(Duration::from_secs(args.timeout))?;
    let worker = ServiceWorker::new(args.origin.clone(), config.worker, network);

    let report = match worker
        .start()
        .await
        .with_context(|| format!("precaching {}", args.origin))?
    {
        Some(report) => report,
        None => {
            worker.handle_message(r#"{"type":"SKIP_WAITING"}"#)?;
            worker.activate()?
        }
    };

    let cache = worker.storage().open(&worker.config().cache_name());
    println!("Cache {} ({} entries)", cache.name(), cache.len());
    for key in cache.keys() {
        println!("  {key}");
    }
    if report.evicted.is_empty() {
        println!("No stale caches.");
    } else {
        for name in &report.evicted {
            println!("Evicted {name}");
        }
    }
    Ok(())
}
