//! autograde library
//!
//! Black-box grader for the database lab submissions.
//!
//! The grader runs a submitted script as a subprocess once per check, with
//! the arguments that check prescribes, and compares what the script prints
//! against the expected answer:
//! - Invocation with a wall-clock timeout and failure capture
//! - Four verification policies (exact line, set equality, subset, empty)
//! - A fixed registry of checks, one argument list resolved per grading mode
//! - A parallel scheduler that prints each verdict as one atomic block
//!
//! # Example
//!
//! ```no_run
//! use autograde::cli::output::TerminalFormatter;
//! use autograde::engine::orchestrator::VerdictSink;
//! use autograde::{run_checks, AutogradeConfig, GradingMode};
//!
//! let config = AutogradeConfig {
//!     submission: "submission.js".into(),
//!     interpreter: Some("node".to_string()),
//!     mode: GradingMode::Mongo,
//!     ..Default::default()
//! };
//! let sink = VerdictSink::new(std::io::stdout(), Box::new(TerminalFormatter::new(false)));
//! let report = run_checks(&config, &sink).expect("grading run aborted");
//! println!("Checks passed: {}", report.summary().passed);
//! ```

pub mod checks;
pub mod cli;
pub mod data;
pub mod engine;
pub mod version;

use cli::args::{Args, LabType};
use engine::invoker::{Target, DEFAULT_TIMEOUT};
use engine::orchestrator::{CheckOrchestrator, OrchestratorConfig, VerdictSink};
use engine::result::GradingReport;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

// Re-exports for public API
pub use engine::orchestrator::CheckOrchestrator as Orchestrator;
pub use engine::result::{GradingReport as Report, ResultSummary};

/// Which lab variant the submission targets.
///
/// Selects the reference answer set and the result-count argument of the
/// full search check. Fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GradingMode {
    /// Submission backed by MongoDB
    Mongo,
    /// Submission backed by MySQL
    #[serde(rename = "mysql")]
    Relational,
}

impl fmt::Display for GradingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradingMode::Mongo => write!(f, "mongo"),
            GradingMode::Relational => write!(f, "mysql"),
        }
    }
}

/// How a check ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    /// Output matched the expectation
    Pass,
    /// Submission ran but its output did not match
    Mismatch,
    /// Submission exceeded the wall-clock budget
    Timeout,
    /// Submission exited nonzero or could not be started
    ExecutionFailure,
}

/// Outcome of one check.
///
/// Verified outcomes render as `[O] ...` or `[X] ...`. Timeouts and
/// execution failures render as the invoker's message, verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub kind: VerdictKind,
    pub detail: String,
}

impl Verdict {
    pub const PASS_MARKER: &'static str = "[O]";
    pub const FAIL_MARKER: &'static str = "[X]";

    pub fn pass(detail: impl Into<String>) -> Self {
        Verdict {
            kind: VerdictKind::Pass,
            detail: detail.into(),
        }
    }

    pub fn mismatch(detail: impl Into<String>) -> Self {
        Verdict {
            kind: VerdictKind::Mismatch,
            detail: detail.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Verdict {
            kind: VerdictKind::Timeout,
            detail: message.into(),
        }
    }

    pub fn execution_failure(message: impl Into<String>) -> Self {
        Verdict {
            kind: VerdictKind::ExecutionFailure,
            detail: message.into(),
        }
    }

    pub fn passed(&self) -> bool {
        self.kind == VerdictKind::Pass
    }

    /// Marker prefix, if this outcome carries one
    pub fn marker(&self) -> Option<&'static str> {
        match self.kind {
            VerdictKind::Pass => Some(Self::PASS_MARKER),
            VerdictKind::Mismatch => Some(Self::FAIL_MARKER),
            VerdictKind::Timeout | VerdictKind::ExecutionFailure => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.marker() {
            Some(marker) => write!(f, "{} {}", marker, self.detail),
            None => f.write_str(&self.detail),
        }
    }
}

/// Harness errors.
///
/// Per-check outcomes are never errors; these cover problems with the
/// harness itself or its configuration.
#[derive(Debug, thiserror::Error)]
pub enum AutogradeError {
    /// A check descriptor is malformed
    #[error("invalid check '{id}': {reason}")]
    InvalidCheck { id: String, reason: String },
    /// The submission path does not point at a file
    #[error("submission not found: {}", path.display())]
    SubmissionNotFound { path: PathBuf },
    /// The submission could not be started
    #[error("could not start {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    /// I/O error
    #[error("I/O error in {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration for a grading run.
#[derive(Debug, Clone)]
pub struct AutogradeConfig {
    /// Path of the submission under test
    pub submission: PathBuf,
    /// Program that runs the submission (e.g. `node`); None executes it directly
    pub interpreter: Option<String>,
    /// Lab variant
    pub mode: GradingMode,
    /// Wall-clock budget per invocation
    pub timeout: Duration,
    /// Worker pool size
    pub jobs: usize,
    /// Specific checks to run (by ID)
    pub only_checks: Vec<String>,
    /// Specific checks to skip (by ID)
    pub skip_checks: Vec<String>,
}

impl Default for AutogradeConfig {
    fn default() -> Self {
        AutogradeConfig {
            submission: PathBuf::new(),
            interpreter: None,
            mode: GradingMode::Mongo,
            timeout: DEFAULT_TIMEOUT,
            jobs: OrchestratorConfig::default().max_parallel,
            only_checks: Vec::new(),
            skip_checks: Vec::new(),
        }
    }
}

impl AutogradeConfig {
    /// Create configuration from command line arguments
    pub fn from_args(args: &Args) -> Self {
        let mode = match args.lab_type {
            LabType::Mongo => GradingMode::Mongo,
            LabType::Mysql => GradingMode::Relational,
        };

        let defaults = AutogradeConfig::default();
        AutogradeConfig {
            submission: args.filepath.clone().unwrap_or_default(),
            interpreter: args.interpreter.clone(),
            mode,
            timeout: Duration::from_secs(args.timeout),
            jobs: args.jobs.map(|n| n.get()).unwrap_or(defaults.jobs),
            only_checks: args.only.clone(),
            skip_checks: args.skip.clone(),
        }
    }

    /// The invocation target described by this configuration
    pub fn target(&self) -> Target {
        let target = Target::new(&self.submission);
        match &self.interpreter {
            Some(interpreter) => target.with_interpreter(interpreter),
            None => target,
        }
    }
}

/// Grade a submission.
///
/// Runs the registered checks selected by `config` against the submission,
/// writing one verdict block per check to `sink` as checks finish. Returns
/// after every check has completed.
///
/// # Errors
///
/// Fails before running anything if the submission file is missing or a
/// check descriptor is malformed. A write error on the sink is reported
/// after all checks have completed.
pub fn run_checks<W: Write + Send>(
    config: &AutogradeConfig,
    sink: &VerdictSink<W>,
) -> Result<GradingReport, AutogradeError> {
    if !config.submission.is_file() {
        return Err(AutogradeError::SubmissionNotFound {
            path: config.submission.clone(),
        });
    }

    let orch_config = OrchestratorConfig {
        max_parallel: config.jobs.max(1),
        timeout: config.timeout,
    };

    let mut orchestrator = CheckOrchestrator::new(orch_config);
    orchestrator.register_checks(checks::create_all_checks())?;

    let target = config.target();

    if !config.only_checks.is_empty() {
        orchestrator.run_specific(&config.only_checks, &target, config.mode, sink)
    } else if !config.skip_checks.is_empty() {
        orchestrator.run_excluding(&config.skip_checks, &target, config.mode, sink)
    } else {
        orchestrator.run_all(&target, config.mode, sink)
    }
}
