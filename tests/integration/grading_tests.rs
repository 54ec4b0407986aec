//! End-to-end grading tests.
//!
//! Grade mock submissions through `run_checks` and inspect both the printed
//! verdict blocks and the returned report.

use crate::mocks::{MockBehavior, MockSubmission};
use autograde::cli::output::TerminalFormatter;
use autograde::engine::orchestrator::VerdictSink;
use autograde::engine::result::GradingReport;
use autograde::{run_checks, AutogradeConfig, GradingMode, VerdictKind};
use std::time::Duration;

const CHECK_COUNT: usize = 7;

fn grade(config: &AutogradeConfig) -> (GradingReport, String) {
    let sink = VerdictSink::new(Vec::new(), Box::new(TerminalFormatter::new(false)));
    let report = run_checks(config, &sink).expect("grading run");
    let output = String::from_utf8(sink.into_inner()).expect("utf8 output");
    (report, output)
}

/// Printed blocks, sorted so runs can be compared regardless of completion order
fn sorted_blocks(output: &str) -> Vec<String> {
    let mut blocks: Vec<String> = output
        .split("\nRunning check: ")
        .filter(|b| !b.is_empty())
        .map(|b| b.to_string())
        .collect();
    blocks.sort();
    blocks
}

#[test]
fn test_correct_mongo_submission_passes_everything() {
    let submission = MockSubmission::new(MockBehavior::Correct(GradingMode::Mongo));
    let (report, output) = grade(&submission.config(GradingMode::Mongo));

    let summary = report.summary();
    assert_eq!(summary.total as usize, CHECK_COUNT);
    assert_eq!(summary.passed as usize, CHECK_COUNT, "{}", output);
    assert_eq!(output.matches("[O]").count(), CHECK_COUNT);
    assert!(!output.contains("[X]"));
}

#[test]
fn test_correct_mysql_submission_passes_everything() {
    let submission = MockSubmission::new(MockBehavior::Correct(GradingMode::Relational));
    let (report, output) = grade(&submission.config(GradingMode::Relational));

    assert!(report.summary().all_passed(), "{}", output);
    let full = report.get("SRCH-002").unwrap();
    assert_eq!(full.arguments, vec!["search", "The Beatles", "39"]);
}

#[test]
fn test_mode_selects_reference_set() {
    let submission = MockSubmission::new(MockBehavior::Correct(GradingMode::Mongo));
    let (report, _) = grade(&submission.config(GradingMode::Relational));

    for id in ["REL-001", "REL-002", "REL-003", "REL-004", "SRCH-001"] {
        assert!(report.get(id).unwrap().verdict.passed(), "{} should pass", id);
    }
    assert_eq!(report.get("SRCH-002").unwrap().verdict.kind, VerdictKind::Mismatch);
    assert_eq!(report.get("SRCH-003").unwrap().verdict.kind, VerdictKind::Mismatch);
}

#[test]
fn test_wrong_related_answer_names_both_values() {
    let submission = MockSubmission::new(MockBehavior::AnswersYes);
    let (report, output) = grade(&submission.config(GradingMode::Mongo));

    let verdict = &report.get("REL-001").unwrap().verdict;
    assert_eq!(verdict.to_string(), "[X] Expected: false | Received yes");
    assert!(output.contains(
        "Running check: related: both name not exist\n[X] Expected: false | Received yes\n"
    ));

    // Empty search output is exactly what the missing-artist check wants
    assert!(report.get("SRCH-001").unwrap().verdict.passed());
    // and trivially a subset of the reference set
    assert!(report.get("SRCH-003").unwrap().verdict.passed());
}

#[test]
fn test_extra_artist_is_reported() {
    let submission = MockSubmission::new(MockBehavior::ExtraArtist(GradingMode::Mongo));
    let (report, _) = grade(&submission.config(GradingMode::Mongo));

    let full = &report.get("SRCH-002").unwrap().verdict;
    assert!(!full.passed());
    assert!(full
        .detail
        .contains("| Not An Artist is in actual output but not expected output"));
    assert!(full
        .detail
        .contains("| Timber Timbre is in expected output but not actual output"));

    let limited = &report.get("SRCH-003").unwrap().verdict;
    assert!(limited
        .detail
        .ends_with(": Not An Artist does not belong to expected output"));
}

#[test]
fn test_crashing_submission_yields_one_failure_per_check() {
    let submission = MockSubmission::new(MockBehavior::Crashes);
    let (report, output) = grade(&submission.config(GradingMode::Mongo));

    assert_eq!(report.checks.len(), CHECK_COUNT);
    assert_eq!(output.matches("Running check: ").count(), CHECK_COUNT);
    for record in &report.checks {
        assert_eq!(record.verdict.kind, VerdictKind::ExecutionFailure);
        assert!(record.verdict.detail.contains(
            "fails because of an error in execution TypeError: cannot read properties of undefined"
        ));
    }
}

#[test]
fn test_hanging_submission_times_out_every_check() {
    let submission = MockSubmission::new(MockBehavior::Hangs);
    let config = AutogradeConfig {
        timeout: Duration::from_secs(1),
        jobs: CHECK_COUNT,
        ..submission.config(GradingMode::Relational)
    };
    let (report, output) = grade(&config);

    assert_eq!(report.summary().timed_out as usize, CHECK_COUNT);
    assert_eq!(output.matches("fails because of timeout after 1 seconds").count(), CHECK_COUNT);
}

#[test]
fn test_failure_message_names_full_command() {
    let submission = MockSubmission::new(MockBehavior::Crashes);
    let (report, _) = grade(&submission.config(GradingMode::Mongo));

    let detail = &report.get("REL-001").unwrap().verdict.detail;
    let expected_prefix = format!(
        r#"["/bin/sh", "{}", "related", "xxxx", "xxxx"] fails"#,
        submission.path().display()
    );
    assert!(detail.starts_with(&expected_prefix), "{}", detail);
}

#[test]
fn test_repeated_runs_are_identical() {
    let submission = MockSubmission::new(MockBehavior::ExtraArtist(GradingMode::Relational));
    let config = submission.config(GradingMode::Relational);

    let (first, first_output) = grade(&config);
    let (second, second_output) = grade(&config);

    let verdicts = |report: &GradingReport| {
        report
            .checks
            .iter()
            .map(|c| (c.id.clone(), c.verdict.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(verdicts(&first), verdicts(&second));
    assert_eq!(sorted_blocks(&first_output), sorted_blocks(&second_output));
}

#[test]
fn test_only_and_skip_select_checks() {
    let submission = MockSubmission::new(MockBehavior::Correct(GradingMode::Mongo));

    let only = AutogradeConfig {
        only_checks: vec!["REL-004".to_string(), "SRCH-001".to_string()],
        ..submission.config(GradingMode::Mongo)
    };
    let (report, output) = grade(&only);
    let ids: Vec<_> = report.checks.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["REL-004", "SRCH-001"]);
    assert_eq!(output.matches("Running check: ").count(), 2);

    let skip = AutogradeConfig {
        skip_checks: vec!["SRCH-002".to_string()],
        ..submission.config(GradingMode::Mongo)
    };
    let (report, _) = grade(&skip);
    assert_eq!(report.checks.len(), CHECK_COUNT - 1);
    assert!(report.get("SRCH-002").is_none());
}
