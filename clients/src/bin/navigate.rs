//! `site-navigate` — Performs one soft navigation in a headless window.
//!
//! Loads the `--from` page into a headless window, installs the
//! soft-navigation engine with the offline worker as its transport, clicks a
//! link to `--to`, and prints what the engine did: outcome, swap mode, title,
//! metadata and history.
//!
//! **Usage:**
//! ```text
//! site-navigate --origin <url> --from <path> --to <href> [--config <site.toml>] [-v]
//! ```
//!
//! Exits non-zero if the starting page cannot be loaded or the window does
//! not support soft navigation.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use danis_clients::{init_logging, LogConfig, SiteConfig};
use danis_navigation::{
    Anchor, Document, HeadlessPage, MetaTag, NavigationOutcome, SessionHistory, SoftNavigator,
};
use danis_net::{HttpNetwork, Network, Request};
use danis_worker::ServiceWorker;
use parking_lot::Mutex;
use url::Url;

/// Soft-navigate between two pages of a live site.
#[derive(Parser)]
#[command(
    name = "site-navigate",
    about = "Perform one soft navigation in a headless window"
)]
struct Args {
    /// Site origin, e.g. https://danisphotography.com/
    #[arg(long)]
    origin: Url,

    /// Path of the page the window starts on.
    #[arg(long, default_value = "/")]
    from: String,

    /// `href` of the link to click.
    #[arg(long)]
    to: String,

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
    let worker = Arc::new(ServiceWorker::new(
        args.origin.clone(),
        config.worker,
        network,
    ));
    if let Err(err) = worker.start().await {
        tracing::warn!(error = %err, "offline worker not installed, fetching directly");
    }

    let start = args
        .origin
        .join(&args.from)
        .with_context(|| format!("resolving {}", args.from))?;
    let first = worker
        .fetch(&Request::get(start.clone()).with_header("accept", "text/html"))
        .await
        .with_context(|| format!("loading {start}"))?;
    if !first.is_ok() {
        bail!("{start} answered with status {}", first.status);
    }

    let window = Arc::new(Mutex::new(HeadlessPage::new(start, first.text())));
    let navigator =
        SoftNavigator::install(config.navigation, Arc::clone(&window), Arc::clone(&worker))?;

    let outcome = navigator.click(&Anchor::new(&args.to)).await;
    worker.settle().await;

    println!("Outcome: {outcome:?}");
    let page = window.lock();
    match outcome {
        NavigationOutcome::Completed(_) => {
            println!("Title: {}", page.title());
            for tag in MetaTag::ALL {
                if let Some(content) = page.meta_content(tag) {
                    println!("  {}: {content}", tag.selector().1);
                }
            }
        }
        NavigationOutcome::HardNavigation => {
            if let Some(url) = page.assigned() {
                println!("Full page load of {url}");
            }
        }
        NavigationOutcome::Native => println!("{} is not intercepted", args.to),
        NavigationOutcome::Busy | NavigationOutcome::Ignored => {}
    }
    println!("Location: {}", page.location());
    println!(
        "History: {} entries, at {}",
        page.history().len(),
        page.history().index()
    );
    Ok(())
}
