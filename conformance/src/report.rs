//! Check results and report aggregation.

use std::fmt;

/// Outcome class of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The check passed.
    Pass,
    /// The runtime degrades gracefully, but the site loses something.
    Warning,
    /// The runtime cannot rely on the site as built.
    Failure,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pass => "PASS",
            Self::Warning => "WARN",
            Self::Failure => "FAIL",
        })
    }
}

/// One check result.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Check identifier, e.g. `site/landmark`.
    pub check: String,
    /// One-line outcome.
    pub message: String,
    /// Outcome class.
    pub severity: Severity,
    /// Offending pages or paths, one per line.
    pub details: Vec<String>,
}

impl CheckResult {
    fn new(check: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            check: check.into(),
            message: message.into(),
            severity,
            details: Vec::new(),
        }
    }

    /// A passing result.
    pub fn pass(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(check, message, Severity::Pass)
    }

    /// A warning.
    pub fn warn(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(check, message, Severity::Warning)
    }

    /// A failure.
    pub fn fail(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(check, message, Severity::Failure)
    }

    /// Attaches detail lines, builder style.
    #[must_use]
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    /// True for [`Severity::Failure`].
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.check, self.message)?;
        for detail in &self.details {
            write!(f, "\n    {detail}")?;
        }
        Ok(())
    }
}

/// Every result of a conformance run, in check order.
#[derive(Debug, Default)]
pub struct ConformanceReport {
    /// Individual results.
    pub results: Vec<CheckResult>,
}

impl ConformanceReport {
    /// An empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one result.
    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    /// Appends every result of `other`.
    pub fn extend(&mut self, other: ConformanceReport) {
        self.results.extend(other.results);
    }

    /// Results produced by `check`.
    pub fn results_for<'a>(&'a self, check: &'a str) -> impl Iterator<Item = &'a CheckResult> {
        self.results.iter().filter(move |r| r.check == check)
    }

    /// Number of results with `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.results.iter().filter(|r| r.severity == severity).count()
    }

    /// Number of failures.
    pub fn failure_count(&self) -> usize {
        self.count(Severity::Failure)
    }

    /// True when nothing failed. Warnings do not count.
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            writeln!(f, "{result}")?;
        }
        write!(
            f,
            "{} passed, {} warnings, {} failed",
            self.count(Severity::Pass),
            self.count(Severity::Warning),
            self.count(Severity::Failure)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_do_not_fail_the_report() {
        let mut report = ConformanceReport::new();
        report.push(CheckResult::pass("site/manifest", "ok"));
        report.push(CheckResult::warn("site/metadata", "thin"));
        assert!(report.all_passed());

        report.push(CheckResult::fail("site/links", "broken").with_details(vec!["a.html".into()]));
        assert_eq!(report.failure_count(), 1);
        assert!(!report.all_passed());
    }

    #[test]
    fn display_lists_details_and_totals() {
        let mut report = ConformanceReport::new();
        report.push(
            CheckResult::fail("site/links", "1 broken link")
                .with_details(vec!["index.html: /nope.html".into()]),
        );
        let text = report.to_string();
        assert!(text.contains("[FAIL] site/links: 1 broken link\n    index.html: /nope.html"));
        assert!(text.ends_with("0 passed, 0 warnings, 1 failed"));
    }
}
