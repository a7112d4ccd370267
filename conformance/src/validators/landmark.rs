//! Page structure: every page has a title and the primary-content landmark.
//!
//! A page without a title fails: the swapper would blank the tab title. A
//! page without the landmark only warns, since soft navigation to or from it
//! falls back to replacing the whole body.

use danis_navigation::dom::Dom;

use crate::report::{CheckResult, ConformanceReport};
use crate::validators::Page;

const TITLE: &str = "site/title";
const LANDMARK: &str = "site/landmark";

/// Checks titles and landmarks of `pages`.
pub fn validate(pages: &[Page], landmark: &str) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    if pages.is_empty() {
        report.push(CheckResult::warn(LANDMARK, "no HTML pages found"));
        return report;
    }

    let mut untitled = Vec::new();
    let mut bare = Vec::new();
    for page in pages {
        let dom = Dom::parse(&page.html);
        if dom.title().is_empty() {
            untitled.push(page.path.clone());
        }
        if dom.find(landmark).is_none() {
            bare.push(page.path.clone());
        }
    }

    if untitled.is_empty() {
        report.push(CheckResult::pass(TITLE, format!("all {} pages have a title", pages.len())));
    } else {
        report.push(
            CheckResult::fail(TITLE, format!("{} page(s) without a title", untitled.len()))
                .with_details(untitled),
        );
    }

    if bare.is_empty() {
        report.push(CheckResult::pass(
            LANDMARK,
            format!("all {} pages have a <{landmark}> landmark", pages.len()),
        ));
    } else {
        report.push(
            CheckResult::warn(
                LANDMARK,
                format!(
                    "{} page(s) without <{landmark}>; transitions there replace the whole body",
                    bare.len()
                ),
            )
            .with_details(bare),
        );
    }

    report
}
