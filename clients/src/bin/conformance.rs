//! `site-conformance` — Checks a built site against what the runtime relies on.
//!
//! Validates page titles and landmarks, metadata tags, the precache
//! manifest, the offline fallback, and every link the soft-navigation engine
//! would intercept.
//!
//! **Usage:**
//! ```text
//! site-conformance [--public <dir>] [--config <site.toml>] [-v]
//! ```
//!
//! Exits non-zero if any check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use danis_clients::{init_logging, LogConfig, SiteConfig};
use danis_conformance::{run_all, SiteTree};

/// Run the site conformance suite.
#[derive(Parser)]
#[command(
    name = "site-conformance",
    about = "Check a built site against the soft-navigation engine and offline worker"
)]
struct Args {
    /// Directory holding the site as served.
    #[arg(long, default_value = "public")]
    public: PathBuf,

    /// Runtime settings (`site.toml`); defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&LogConfig::from_verbosity(args.verbose))?;
    let config = SiteConfig::load(args.config.as_deref())?;

    let site = SiteTree {
        public: args.public,
        navigation: config.navigation,
        worker: config.worker,
    };
    let report = run_all(&site)?;

    println!("Site Conformance Report");
    println!("=======================");
    println!();
    println!("{report}");

    let failed = report.failure_count();
    if failed > 0 {
        eprintln!("Conformance FAILED: {failed} check(s) did not pass.");
        process::exit(1);
    }

    println!("Conformance PASSED.");
    Ok(())
}
