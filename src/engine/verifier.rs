//! Output verification policies.
//!
//! Each policy compares captured stdout with an expected value and explains
//! the difference. Line sets are ordered, so the same output always yields
//! the same diagnostic text.

use crate::Verdict;
use std::collections::BTreeSet;

const SEP: &str = ", ";

/// Trimmed stdout must equal `expected` exactly (case-sensitive).
pub fn check_single_line(stdout: &str, expected: &str) -> Verdict {
    let received = stdout.trim();
    let detail = format!("Expected: {} | Received {}", expected, received);
    if received == expected {
        Verdict::pass(detail)
    } else {
        Verdict::mismatch(detail)
    }
}

/// The set of output lines must equal `expected`.
///
/// Duplicate lines collapse and order is ignored.
pub fn check_set_equality(stdout: &str, expected: &[&str]) -> Verdict {
    let expected = to_set(expected);
    let received = line_set(stdout);

    if received == expected {
        return Verdict::pass(format!(
            "Expected: {} | Received {}",
            join(&expected),
            join(&received)
        ));
    }

    let missing: BTreeSet<&str> = expected.difference(&received).copied().collect();
    let unexpected: BTreeSet<&str> = received.difference(&expected).copied().collect();
    Verdict::mismatch(format!(
        "Expected: {} | Received {} | {} is in expected output but not actual output | {} is in actual output but not expected output",
        join(&expected),
        join(&received),
        join(&missing),
        join(&unexpected)
    ))
}

/// Every output line must belong to `expected`; an empty output passes.
pub fn check_is_subset(stdout: &str, expected: &[&str]) -> Verdict {
    let expected = to_set(expected);
    let received = line_set(stdout);

    if received.is_subset(&expected) {
        return Verdict::pass(format!(
            "{} is subset of {}",
            join(&received),
            join(&expected)
        ));
    }

    let offending: BTreeSet<&str> = received.difference(&expected).copied().collect();
    Verdict::mismatch(format!(
        "{} is not subset of {}: {} does not belong to expected output",
        join(&received),
        join(&expected),
        join(&offending)
    ))
}

/// Stdout must be blank once surrounding whitespace is trimmed.
pub fn check_empty(stdout: &str) -> Verdict {
    let detail = format!("Expected: EMPTY OUTPUT | Received {}", stdout);
    if stdout.trim().is_empty() {
        Verdict::pass(detail)
    } else {
        Verdict::mismatch(detail)
    }
}

fn line_set(stdout: &str) -> BTreeSet<&str> {
    stdout.lines().collect()
}

fn to_set<'a>(items: &[&'a str]) -> BTreeSet<&'a str> {
    items.iter().copied().collect()
}

fn join(set: &BTreeSet<&str>) -> String {
    set.iter().copied().collect::<Vec<_>>().join(SEP)
}
