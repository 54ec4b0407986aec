//! Output formatting tests.
//!
//! Tests for the terminal and JSON-lines formatters.

use autograde::cli::args::OutputFormat;
use autograde::cli::output::{get_formatter, JsonFormatter, OutputFormatter, TerminalFormatter};
use autograde::engine::result::{CheckRecord, GradingReport};
use autograde::{GradingMode, Verdict};

fn record(id: &str, title: &str, args: &[&str], verdict: Verdict) -> CheckRecord {
    CheckRecord {
        id: id.to_string(),
        title: title.to_string(),
        arguments: args.iter().map(|a| a.to_string()).collect(),
        verdict,
        duration_ms: 40,
    }
}

fn create_sample_report() -> GradingReport {
    GradingReport {
        mode: GradingMode::Relational,
        submission: "submission.js".to_string(),
        checks: vec![
            record(
                "REL-004",
                "related: related artists",
                &["related", "The Beatles", "The Beach Boys"],
                Verdict::pass("Expected: true | Received true"),
            ),
            record(
                "REL-001",
                "related: both name not exist",
                &["related", "xxxx", "xxxx"],
                Verdict::mismatch("Expected: false | Received yes"),
            ),
            record(
                "SRCH-002",
                "search: correct output for artist",
                &["search", "The Beatles", "39"],
                Verdict::timeout(
                    r#"["node", "submission.js", "search", "The Beatles", "39"] fails because of timeout after 120 seconds"#,
                ),
            ),
            record(
                "SRCH-001",
                "search: artist not exist",
                &["search", "xxxxx", "5"],
                Verdict::execution_failure(
                    r#"["node", "submission.js", "search", "xxxxx", "5"] fails because of an error in execution ECONNREFUSED"#,
                ),
            ),
        ],
        total_duration_ms: 2500,
    }
}

// Terminal formatter

#[test]
fn test_terminal_check_block() {
    let formatter = TerminalFormatter::new(false);
    let report = create_sample_report();

    assert_eq!(
        formatter.format_check(&report.checks[0]),
        "\nRunning check: related: related artists\n[O] Expected: true | Received true\n"
    );
    assert_eq!(
        formatter.format_check(&report.checks[1]),
        "\nRunning check: related: both name not exist\n[X] Expected: false | Received yes\n"
    );
}

#[test]
fn test_terminal_failure_block_is_verbatim() {
    let formatter = TerminalFormatter::new(false);
    let report = create_sample_report();

    let block = formatter.format_check(&report.checks[2]);
    assert!(block.ends_with("fails because of timeout after 120 seconds\n"));
    assert!(!block.contains("[X]"));
    assert!(!block.contains("[O]"));
}

#[test]
fn test_terminal_color_wraps_marker_only() {
    let formatter = TerminalFormatter::new(true);
    let report = create_sample_report();

    let pass = formatter.format_check(&report.checks[0]);
    assert!(pass.contains("\x1b[32m[O]\x1b[0m Expected: true | Received true"));

    let fail = formatter.format_check(&report.checks[1]);
    assert!(fail.contains("\x1b[31m[X]\x1b[0m Expected: false"));

    let timeout = formatter.format_check(&report.checks[2]);
    assert!(!timeout.contains("\x1b["));
}

#[test]
fn test_terminal_summary() {
    let formatter = TerminalFormatter::new(false);
    let summary = formatter.format_summary(&create_sample_report());

    assert!(summary.contains(
        "SUMMARY (mysql): 1 passed, 1 mismatched, 1 timed out, 1 failed to run"
    ));
    assert!(summary.contains("Total time: 2.5s"));
}

#[test]
fn test_terminal_empty_report() {
    let formatter = TerminalFormatter::new(false);
    let report = GradingReport {
        mode: GradingMode::Mongo,
        submission: "submission.js".to_string(),
        checks: vec![],
        total_duration_ms: 0,
    };

    let summary = formatter.format_summary(&report);
    assert!(summary.contains("SUMMARY (mongo): 0 passed"));
}

// JSON formatter

#[test]
fn test_json_check_line() {
    let formatter = JsonFormatter;
    let report = create_sample_report();

    let line = formatter.format_check(&report.checks[1]);
    assert!(line.ends_with('\n'));
    assert_eq!(line.matches('\n').count(), 1);

    let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
    assert_eq!(value["id"], "REL-001");
    assert_eq!(value["status"], "mismatch");
    assert_eq!(value["passed"], false);
    assert_eq!(value["result"], "[X] Expected: false | Received yes");
    assert_eq!(value["arguments"][0], "related");
    assert_eq!(value["duration_ms"], 40);
}

#[test]
fn test_json_failure_status() {
    let formatter = JsonFormatter;
    let report = create_sample_report();

    let timeout: serde_json::Value =
        serde_json::from_str(formatter.format_check(&report.checks[2]).trim_end()).unwrap();
    assert_eq!(timeout["status"], "timeout");

    let failure: serde_json::Value =
        serde_json::from_str(formatter.format_check(&report.checks[3]).trim_end()).unwrap();
    assert_eq!(failure["status"], "execution_failure");
}

#[test]
fn test_json_summary() {
    let formatter = JsonFormatter;
    let line = formatter.format_summary(&create_sample_report());

    let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
    assert_eq!(value["mode"], "mysql");
    assert_eq!(value["submission"], "submission.js");
    assert_eq!(value["summary"]["total"], 4);
    assert_eq!(value["summary"]["passed"], 1);
    assert_eq!(value["total_duration_ms"], 2500);
}

// Formatter selection

#[test]
fn test_get_formatter() {
    let report = create_sample_report();

    let text = get_formatter(OutputFormat::Text, false);
    assert!(text.format_check(&report.checks[0]).starts_with("\nRunning check: "));

    let json = get_formatter(OutputFormat::Json, false);
    assert!(json.format_check(&report.checks[0]).starts_with('{'));
}
