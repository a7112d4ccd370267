//! Precache manifest: every path the worker seeds on install must exist,
//! since one missing asset fails the whole install.

use std::collections::BTreeSet;

use danis_worker::WorkerConfig;

use crate::report::{CheckResult, ConformanceReport};
use crate::validators::served_file;

const MANIFEST: &str = "site/manifest";
const FALLBACK: &str = "site/offline-fallback";

/// Checks the manifest and the offline fallback against the site's files.
pub fn validate(files: &BTreeSet<String>, worker: &WorkerConfig) -> ConformanceReport {
    let mut report = ConformanceReport::new();

    let missing: Vec<String> = worker
        .manifest
        .iter()
        .filter(|path| served_file(files, path).is_none())
        .cloned()
        .collect();
    if missing.is_empty() {
        report.push(CheckResult::pass(
            MANIFEST,
            format!(
                "all {} precached paths exist for cache {}",
                worker.manifest.len(),
                worker.cache_name()
            ),
        ));
    } else {
        report.push(
            CheckResult::fail(
                MANIFEST,
                format!("{} precached path(s) missing; install would fail", missing.len()),
            )
            .with_details(missing),
        );
    }

    let fallback = &worker.offline_fallback;
    if served_file(files, fallback).is_none() {
        report.push(CheckResult::fail(
            FALLBACK,
            format!("offline fallback {fallback} does not exist"),
        ));
    } else if !worker.manifest.contains(fallback) {
        report.push(CheckResult::warn(
            FALLBACK,
            format!("offline fallback {fallback} is not precached and will only be served once visited"),
        ));
    } else {
        report.push(CheckResult::pass(
            FALLBACK,
            format!("offline fallback {fallback} is precached"),
        ));
    }

    report
}
