//! Metadata tags: the swapper only updates tags present on both pages, so a
//! tag missing from some pages keeps a stale value after soft navigation.

use danis_navigation::dom::Dom;
use danis_navigation::MetaTag;

use crate::report::{CheckResult, ConformanceReport};
use crate::validators::Page;

const CHECK: &str = "site/metadata";

/// Checks that every page carries every [`MetaTag`].
pub fn validate(pages: &[Page]) -> ConformanceReport {
    let mut report = ConformanceReport::new();

    let mut gaps = Vec::new();
    for page in pages {
        let dom = Dom::parse(&page.html);
        let missing: Vec<&str> = MetaTag::ALL
            .iter()
            .filter(|tag| dom.find_meta(**tag).is_none())
            .map(|tag| tag.selector().1)
            .collect();
        if !missing.is_empty() {
            gaps.push(format!("{}: missing {}", page.path, missing.join(", ")));
        }
    }

    if gaps.is_empty() {
        report.push(CheckResult::pass(
            CHECK,
            format!("all {} pages carry the full metadata set", pages.len()),
        ));
    } else {
        report.push(
            CheckResult::warn(
                CHECK,
                format!("{} page(s) lack metadata tags that soft navigation updates", gaps.len()),
            )
            .with_details(gaps),
        );
    }

    report
}
