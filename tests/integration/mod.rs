//! Integration tests for autograde.
//!
//! These tests drive the grader against mock submissions and shell targets.

#[cfg(unix)]
pub mod grading_tests;
pub mod output_tests;
