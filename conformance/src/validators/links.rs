//! Intercepted links: every link the engine would soft-navigate must lead to
//! a page the host serves, or the click ends in a hard navigation to a 404.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use danis_navigation::dom::Dom;
use danis_navigation::{link, NavigationConfig};
use url::Url;

use crate::report::{CheckResult, ConformanceReport};
use crate::validators::{served_file, Page};

const CHECK: &str = "site/links";

/// Origin the pages are resolved against; only same-origin links matter.
const LOCAL_ORIGIN: &str = "https://site.invalid/";

/// Checks every intercepted link on every page.
///
/// # Errors
///
/// Returns an error if a page path cannot be turned into a URL.
pub fn validate(
    pages: &[Page],
    files: &BTreeSet<String>,
    navigation: &NavigationConfig,
) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    let origin = Url::parse(LOCAL_ORIGIN).context("parsing the local origin")?;

    let mut intercepted = 0usize;
    let mut broken = Vec::new();
    for page in pages {
        let location = origin
            .join(&page.path)
            .with_context(|| format!("resolving page {}", page.path))?;
        for anchor in Dom::parse(&page.html).anchors() {
            let Ok(target) = link::classify(&anchor, &location, navigation) else {
                continue;
            };
            intercepted += 1;
            if served_file(files, target.path()).is_none() {
                let href = anchor.href.unwrap_or_default();
                broken.push(format!("{}: {href}", page.path));
            }
        }
    }

    if broken.is_empty() {
        report.push(CheckResult::pass(
            CHECK,
            format!("all {intercepted} intercepted links resolve"),
        ));
    } else {
        report.push(
            CheckResult::fail(
                CHECK,
                format!("{} intercepted link(s) lead nowhere", broken.len()),
            )
            .with_details(broken),
        );
    }

    Ok(report)
}
