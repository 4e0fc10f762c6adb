//! The outcome of a comparison.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::compare::{Finding, FindingKind};

/// Ordered findings of a comparison together with the number of errors among them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    findings: Vec<Finding>,
    error_count: usize,
}

impl Report {
    /// An empty report
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finding
    pub fn push(&mut self, finding: Finding) {
        if finding.is_error() {
            self.error_count += 1;
        }
        self.findings.push(finding);
    }

    /// Append all findings of `other`, keeping their order
    pub fn append(&mut self, other: Report) {
        self.error_count += other.error_count;
        self.findings.extend(other.findings);
    }

    /// The findings in the order they were made
    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Number of findings counting as errors
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Returns true if no finding counts as an error
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.error_count == 0
    }

    /// Number of findings
    #[must_use]
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// Returns true if there are no findings at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Number of findings per kind
    #[must_use]
    pub fn counts(&self) -> BTreeMap<FindingKind, usize> {
        let mut counts = BTreeMap::new();
        for finding in &self.findings {
            *counts.entry(finding.kind()).or_insert(0) += 1;
        }
        counts
    }

    /// Consume the report, returning its findings
    #[must_use]
    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}

impl From<Finding> for Report {
    fn from(finding: Finding) -> Self {
        let mut report = Report::new();
        report.push(finding);
        report
    }
}

impl FromIterator<Finding> for Report {
    fn from_iter<I: IntoIterator<Item = Finding>>(iter: I) -> Self {
        let mut report = Report::new();
        for finding in iter {
            report.push(finding);
        }
        report
    }
}
