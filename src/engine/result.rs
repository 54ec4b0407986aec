//! Result aggregation and reporting.
//!
//! Collects check records as workers finish them and restores registry
//! order for the final report.

use crate::{GradingMode, Verdict, VerdictKind};
use serde::Serialize;

/// One finished check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRecord {
    pub id: String,
    pub title: String,
    /// Arguments the submission was invoked with
    pub arguments: Vec<String>,
    pub verdict: Verdict,
    pub duration_ms: u64,
}

/// Result summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub passed: u32,
    pub mismatched: u32,
    pub timed_out: u32,
    pub execution_failures: u32,
    pub total: u32,
}

impl ResultSummary {
    pub fn failed(&self) -> u32 {
        self.mismatched + self.timed_out + self.execution_failures
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}

/// Grading report containing every check of one run
#[derive(Debug, Clone, Serialize)]
pub struct GradingReport {
    pub mode: GradingMode,
    pub submission: String,
    /// Records in registry order
    pub checks: Vec<CheckRecord>,
    pub total_duration_ms: u64,
}

impl GradingReport {
    /// Calculate summary statistics
    pub fn summary(&self) -> ResultSummary {
        let mut summary = ResultSummary::default();

        for check in &self.checks {
            summary.total += 1;
            match check.verdict.kind {
                VerdictKind::Pass => summary.passed += 1,
                VerdictKind::Mismatch => summary.mismatched += 1,
                VerdictKind::Timeout => summary.timed_out += 1,
                VerdictKind::ExecutionFailure => summary.execution_failures += 1,
            }
        }

        summary
    }

    /// Find a record by check ID
    pub fn get(&self, id: &str) -> Option<&CheckRecord> {
        self.checks.iter().find(|c| c.id == id)
    }
}

/// Result aggregator for collecting records out of order
#[derive(Debug, Default)]
pub struct ResultAggregator {
    records: Vec<(usize, CheckRecord)>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record with its position in the run
    pub fn add_result(&mut self, index: usize, record: CheckRecord) {
        self.records.push((index, record));
    }

    /// Take over the records another aggregator collected
    pub fn merge(&mut self, other: ResultAggregator) {
        self.records.extend(other.records);
    }

    /// Create final report, ordered by position
    pub fn into_report(
        mut self,
        mode: GradingMode,
        submission: String,
        total_duration_ms: u64,
    ) -> GradingReport {
        self.records.sort_by_key(|(index, _)| *index);
        GradingReport {
            mode,
            submission,
            checks: self.records.into_iter().map(|(_, r)| r).collect(),
            total_duration_ms,
        }
    }
}
