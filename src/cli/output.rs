//! Output formatting for autograde.
//!
//! Provides terminal and JSON-lines formatters for verdict blocks and the
//! run summary.
//!
//! # Graceful Degradation
//!
//! - Non-TTY output: color disabled automatically, or via NO_COLOR / --no-color
//! - Multi-line submission output: printed as-is inside the block
//! - Empty reports: produce a valid summary with zero checks
//!
//! No function in this module will panic.

use crate::cli::args::OutputFormat;
use crate::engine::result::{CheckRecord, GradingReport};
use crate::{Verdict, VerdictKind};
use serde_json::json;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format one finished check as a self-contained block
    fn format_check(&self, record: &CheckRecord) -> String;

    /// Format the summary printed after every check has finished
    fn format_summary(&self, report: &GradingReport) -> String;
}

/// Terminal (human-readable) formatter
pub struct TerminalFormatter {
    color: bool,
}

impl TerminalFormatter {
    pub fn new(color: bool) -> Self {
        TerminalFormatter { color }
    }

    fn colorize(&self, text: &str, color_code: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", color_code, text)
        } else {
            text.to_string()
        }
    }

    fn green(&self, text: &str) -> String {
        self.colorize(text, "32")
    }

    fn red(&self, text: &str) -> String {
        self.colorize(text, "31")
    }

    fn verdict_line(&self, verdict: &Verdict) -> String {
        match verdict.kind {
            VerdictKind::Pass => format!("{} {}", self.green(Verdict::PASS_MARKER), verdict.detail),
            VerdictKind::Mismatch => format!("{} {}", self.red(Verdict::FAIL_MARKER), verdict.detail),
            VerdictKind::Timeout | VerdictKind::ExecutionFailure => verdict.detail.clone(),
        }
    }
}

impl OutputFormatter for TerminalFormatter {
    fn format_check(&self, record: &CheckRecord) -> String {
        format!(
            "\nRunning check: {}\n{}\n",
            record.title,
            self.verdict_line(&record.verdict)
        )
    }

    fn format_summary(&self, report: &GradingReport) -> String {
        let summary = report.summary();
        let mut output = String::new();

        output.push_str("\n--------------------------------------------------------------------------------\n");
        output.push_str(&format!(
            "SUMMARY ({}): {} passed, {} mismatched, {} timed out, {} failed to run\n",
            report.mode,
            summary.passed,
            summary.mismatched,
            summary.timed_out,
            summary.execution_failures
        ));
        output.push_str(&format!(
            "Total time: {:.1}s\n",
            report.total_duration_ms as f64 / 1000.0
        ));
        output.push_str("--------------------------------------------------------------------------------\n");

        output
    }
}

/// JSON-lines formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_check(&self, record: &CheckRecord) -> String {
        let line = json!({
            "id": record.id,
            "title": record.title,
            "arguments": record.arguments,
            "status": record.verdict.kind,
            "passed": record.verdict.passed(),
            "result": record.verdict.to_string(),
            "duration_ms": record.duration_ms,
        });
        format!("{}\n", line)
    }

    fn format_summary(&self, report: &GradingReport) -> String {
        let line = json!({
            "mode": report.mode,
            "submission": report.submission,
            "summary": report.summary(),
            "total_duration_ms": report.total_duration_ms,
        });
        format!("{}\n", line)
    }
}

/// Get a formatter for the selected output format
pub fn get_formatter(format: OutputFormat, color: bool) -> Box<dyn OutputFormatter + Send + Sync> {
    match format {
        OutputFormat::Text => Box::new(TerminalFormatter::new(color)),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
