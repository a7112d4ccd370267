//! Site conformance suite.
//!
//! Checks a built static site against what the runtime assumes about it.
//!
//! # Conformance Scope
//!
//! | Check | Requirement | Severity when violated |
//! |-------|-------------|------------------------|
//! | `site/title` | every page has a `<title>` | failure |
//! | `site/landmark` | every page has the primary-content landmark | warning |
//! | `site/metadata` | every page carries description and Open Graph tags | warning |
//! | `site/manifest` | every precached path exists | failure |
//! | `site/offline-fallback` | the offline document exists and is precached | failure / warning |
//! | `site/links` | every intercepted link resolves to a served page | failure |
//!
//! # Entry Point
//!
//! ```no_run
//! use danis_conformance::{run_all, SiteTree};
//! use std::path::PathBuf;
//!
//! let site = SiteTree::new(PathBuf::from("public"));
//! let report = run_all(&site).expect("Failed to run conformance");
//! assert!(report.all_passed());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod report;
pub mod validators;

use std::path::PathBuf;

use danis_navigation::NavigationConfig;
use danis_worker::WorkerConfig;

pub use report::{CheckResult, ConformanceReport, Severity};

/// A built site and the runtime configuration it is deployed with.
#[derive(Debug, Clone)]
pub struct SiteTree {
    /// Directory holding the site as served (`public/`).
    pub public: PathBuf,
    /// Soft-navigation settings.
    pub navigation: NavigationConfig,
    /// Offline worker settings.
    pub worker: WorkerConfig,
}

impl SiteTree {
    /// `public` with default runtime settings.
    pub fn new(public: PathBuf) -> Self {
        Self {
            public,
            navigation: NavigationConfig::default(),
            worker: WorkerConfig::default(),
        }
    }
}

/// Runs every validator and returns the aggregated report.
///
/// Validators run in this order:
/// 1. Page titles and landmarks
/// 2. Metadata tags
/// 3. Precache manifest and offline fallback
/// 4. Intercepted links
///
/// # Errors
///
/// Returns an error if `public` does not exist or a page cannot be read.
pub fn run_all(site: &SiteTree) -> anyhow::Result<ConformanceReport> {
    if !site.public.is_dir() {
        anyhow::bail!("{} is not a directory", site.public.display());
    }
    let pages = validators::pages(&site.public)?;
    let files = validators::site_files(&site.public);

    let mut report = ConformanceReport::new();
    report.extend(validators::landmark::validate(&pages, &site.navigation.landmark));
    report.extend(validators::metadata::validate(&pages));
    report.extend(validators::manifest::validate(&files, &site.worker));
    report.extend(validators::links::validate(&pages, &files, &site.navigation)?);
    Ok(report)
}
