//! Grading check registry.
//!
//! Checks are organized by the submission verb they exercise:
//! - Related: `related <artist> <artist>` must print `true` or `false`
//! - Search: `search <artist> <limit>` must print matching artist names
//!
//! Every check is independent; none reads another's result.

use crate::data::reference;
use crate::engine::orchestrator::{ArgumentSource, RegisteredCheck};
use crate::engine::verifier;
use crate::GradingMode;

/// Arguments for the full search: the limit is the size of the mode's reference set
fn search_correct_arguments(mode: GradingMode) -> Vec<String> {
    vec![
        "search".to_string(),
        "The Beatles".to_string(),
        reference::full_search_limit(mode).to_string(),
    ]
}

/// Create all registered checks, in reporting order
pub fn create_all_checks() -> Vec<RegisteredCheck> {
    let mut checks = Vec::new();

    // Related checks
    checks.push(RegisteredCheck {
        id: "REL-001".to_string(),
        title: "related: both name not exist".to_string(),
        description: "prints false".to_string(),
        arguments: ArgumentSource::literal(["related", "xxxx", "xxxx"]),
        verify: Box::new(|stdout: &str, _: GradingMode| {
            verifier::check_single_line(stdout, "false")
        }),
    });

    checks.push(RegisteredCheck {
        id: "REL-002".to_string(),
        title: "related: one name not exists".to_string(),
        description: "prints false".to_string(),
        arguments: ArgumentSource::literal(["related", "xxxx", "The Beatles"]),
        verify: Box::new(|stdout: &str, _: GradingMode| {
            verifier::check_single_line(stdout, "false")
        }),
    });

    checks.push(RegisteredCheck {
        id: "REL-003".to_string(),
        title: "related: unrelated artists".to_string(),
        description: "prints false".to_string(),
        arguments: ArgumentSource::literal(["related", "Pink Floyd", "Lang Lang"]),
        verify: Box::new(|stdout: &str, _: GradingMode| {
            verifier::check_single_line(stdout, "false")
        }),
    });

    checks.push(RegisteredCheck {
        id: "REL-004".to_string(),
        title: "related: related artists".to_string(),
        description: "prints true".to_string(),
        arguments: ArgumentSource::literal(["related", "The Beatles", "The Beach Boys"]),
        verify: Box::new(|stdout: &str, _: GradingMode| {
            verifier::check_single_line(stdout, "true")
        }),
    });

    // Search checks
    checks.push(RegisteredCheck {
        id: "SRCH-001".to_string(),
        title: "search: artist not exist".to_string(),
        description: "prints nothing".to_string(),
        arguments: ArgumentSource::literal(["search", "xxxxx", "5"]),
        verify: Box::new(|stdout: &str, _: GradingMode| verifier::check_empty(stdout)),
    });

    checks.push(RegisteredCheck {
        id: "SRCH-002".to_string(),
        title: "search: correct output for artist".to_string(),
        description: "prints exactly the reference artists".to_string(),
        arguments: ArgumentSource::Computed(search_correct_arguments),
        verify: Box::new(|stdout: &str, mode: GradingMode| {
            verifier::check_set_equality(stdout, reference::search_answers(mode))
        }),
    });

    checks.push(RegisteredCheck {
        id: "SRCH-003".to_string(),
        title: "search: correct LIMIT for artist".to_string(),
        description: "prints only reference artists".to_string(),
        arguments: ArgumentSource::literal(["search", "The Beatles", "5"]),
        verify: Box::new(|stdout: &str, mode: GradingMode| {
            verifier::check_is_subset(stdout, reference::search_answers(mode))
        }),
    });

    checks
}
