//! Check execution orchestrator.
//!
//! Manages check registration and runs checks on a worker pool.
//!
//! # Graceful Degradation
//!
//! Every selected check produces exactly one verdict:
//! - Submission timeout: timeout message stands in as the verdict
//! - Submission exits nonzero: failure message with stderr
//! - Submission cannot be started: failure message with the OS error
//! - Sink write error: logged, remaining checks still run, first error returned
//! - Invalid check ID in run_specific/run_excluding: logged and skipped
//! - Empty check list: returns empty report (not an error)
//!
//! Checks share nothing except the sink. Verdicts print in completion order;
//! the returned report is in registry order.

use crate::cli::output::OutputFormatter;
use crate::engine::invoker::{self, InvocationResult, Target, DEFAULT_TIMEOUT};
use crate::engine::result::{CheckRecord, GradingReport, ResultAggregator};
use crate::{AutogradeError, GradingMode, Verdict};
use std::collections::HashSet;
use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Worker pool size; 1 runs checks one after another
    pub max_parallel: usize,
    /// Wall-clock budget per invocation
    pub timeout: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        OrchestratorConfig {
            max_parallel: thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Where a check's argument list comes from
#[derive(Clone)]
pub enum ArgumentSource {
    /// Same arguments in every mode
    Literal(Vec<String>),
    /// Arguments that depend on the grading mode
    Computed(fn(GradingMode) -> Vec<String>),
}

impl ArgumentSource {
    pub fn literal<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ArgumentSource::Literal(args.into_iter().map(Into::into).collect())
    }

    /// Resolve the argument list for `mode`
    pub fn resolve(&self, mode: GradingMode) -> Vec<String> {
        match self {
            ArgumentSource::Literal(args) => args.clone(),
            ArgumentSource::Computed(f) => f(mode),
        }
    }
}

impl fmt::Debug for ArgumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentSource::Literal(args) => f.debug_tuple("Literal").field(args).finish(),
            ArgumentSource::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Verification function: captured stdout and mode in, verdict out
pub type VerifyFn = Box<dyn Fn(&str, GradingMode) -> Verdict + Send + Sync>;

/// A registered check with its verification function
pub struct RegisteredCheck {
    pub id: String,
    pub title: String,
    /// What a correct submission prints
    pub description: String,
    pub arguments: ArgumentSource,
    pub verify: VerifyFn,
}

impl RegisteredCheck {
    /// Reject descriptors that could never produce a meaningful verdict
    pub fn validate(&self) -> Result<(), AutogradeError> {
        let invalid = |reason: &str| AutogradeError::InvalidCheck {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(invalid("empty id"));
        }
        if self.title.trim().is_empty() {
            return Err(invalid("empty title"));
        }
        if let ArgumentSource::Literal(ref args) = self.arguments {
            if args.is_empty() {
                return Err(invalid("empty argument list"));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for RegisteredCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredCheck")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// Serialized output for verdict blocks.
///
/// The mutex is held for exactly one block, so concurrent checks never
/// interleave their output.
pub struct VerdictSink<W: Write> {
    writer: Mutex<W>,
    formatter: Box<dyn OutputFormatter + Send + Sync>,
}

impl<W: Write> VerdictSink<W> {
    pub fn new(writer: W, formatter: Box<dyn OutputFormatter + Send + Sync>) -> Self {
        VerdictSink {
            writer: Mutex::new(writer),
            formatter,
        }
    }

    /// Write one check's block
    pub fn emit(&self, record: &CheckRecord) -> Result<(), AutogradeError> {
        let block = self.formatter.format_check(record);
        self.write_block(&block, "writing verdict")
    }

    /// Write the run summary
    pub fn emit_summary(&self, report: &GradingReport) -> Result<(), AutogradeError> {
        let block = self.formatter.format_summary(report);
        self.write_block(&block, "writing summary")
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_block(&self, block: &str, context: &str) -> Result<(), AutogradeError> {
        // A poisoned lock only means another writer panicked mid-block
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        writer
            .write_all(block.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|source| AutogradeError::Io {
                context: context.to_string(),
                source,
            })
    }
}

/// Check orchestrator
pub struct CheckOrchestrator {
    config: OrchestratorConfig,
    checks: Vec<RegisteredCheck>,
}

impl CheckOrchestrator {
    /// Create a new orchestrator with the given configuration
    pub fn new(config: OrchestratorConfig) -> Self {
        CheckOrchestrator {
            config,
            checks: Vec::new(),
        }
    }

    /// Register checks for execution
    pub fn register_checks(&mut self, checks: Vec<RegisteredCheck>) -> Result<(), AutogradeError> {
        for check in checks {
            self.register_check(check)?;
        }
        Ok(())
    }

    /// Register a single check
    pub fn register_check(&mut self, check: RegisteredCheck) -> Result<(), AutogradeError> {
        check.validate()?;
        if self.checks.iter().any(|c| c.id == check.id) {
            return Err(AutogradeError::InvalidCheck {
                id: check.id,
                reason: "duplicate id".to_string(),
            });
        }
        self.checks.push(check);
        Ok(())
    }

    /// Registered checks, in registration order
    pub fn checks(&self) -> &[RegisteredCheck] {
        &self.checks
    }

    /// Run all registered checks
    pub fn run_all<W: Write + Send>(
        &self,
        target: &Target,
        mode: GradingMode,
        sink: &VerdictSink<W>,
    ) -> Result<GradingReport, AutogradeError> {
        let selected: Vec<&RegisteredCheck> = self.checks.iter().collect();
        self.run_checks(&selected, target, mode, sink)
    }

    /// Run specific checks by ID
    pub fn run_specific<W: Write + Send>(
        &self,
        check_ids: &[String],
        target: &Target,
        mode: GradingMode,
        sink: &VerdictSink<W>,
    ) -> Result<GradingReport, AutogradeError> {
        self.warn_unknown(check_ids);
        let selected: Vec<&RegisteredCheck> = self
            .checks
            .iter()
            .filter(|c| check_ids.contains(&c.id))
            .collect();
        self.run_checks(&selected, target, mode, sink)
    }

    /// Run all checks except specified IDs
    pub fn run_excluding<W: Write + Send>(
        &self,
        skip_ids: &[String],
        target: &Target,
        mode: GradingMode,
        sink: &VerdictSink<W>,
    ) -> Result<GradingReport, AutogradeError> {
        self.warn_unknown(skip_ids);
        let selected: Vec<&RegisteredCheck> = self
            .checks
            .iter()
            .filter(|c| !skip_ids.contains(&c.id))
            .collect();
        self.run_checks(&selected, target, mode, sink)
    }

    /// Execute the selected checks on the worker pool.
    ///
    /// Workers pull the next check from a shared cursor until none are left;
    /// the scope joins every worker before the report is built.
    fn run_checks<W: Write + Send>(
        &self,
        selected: &[&RegisteredCheck],
        target: &Target,
        mode: GradingMode,
        sink: &VerdictSink<W>,
    ) -> Result<GradingReport, AutogradeError> {
        let start = Instant::now();
        let cursor = AtomicUsize::new(0);
        let workers = self.config.max_parallel.max(1).min(selected.len());

        let outcomes: Vec<(ResultAggregator, Option<AutogradeError>)> = thread::scope(|s| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    s.spawn(|| {
                        let mut aggregator = ResultAggregator::new();
                        let mut sink_error = None;
                        loop {
                            let index = cursor.fetch_add(1, Ordering::Relaxed);
                            let Some(check) = selected.get(index) else {
                                break;
                            };
                            let record = self.execute_check(check, target, mode);
                            if let Err(e) = sink.emit(&record) {
                                warn!(check = %record.id, error = %e, "could not print verdict");
                                sink_error.get_or_insert(e);
                            }
                            aggregator.add_result(index, record);
                        }
                        (aggregator, sink_error)
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        });

        let mut aggregator = ResultAggregator::new();
        let mut first_error = None;
        for (worker_results, sink_error) in outcomes {
            aggregator.merge(worker_results);
            if first_error.is_none() {
                first_error = sink_error;
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        let total_duration_ms = start.elapsed().as_millis() as u64;
        Ok(aggregator.into_report(
            mode,
            target.program().display().to_string(),
            total_duration_ms,
        ))
    }

    /// Invoke the submission for one check and verify what it printed
    fn execute_check(
        &self,
        check: &RegisteredCheck,
        target: &Target,
        mode: GradingMode,
    ) -> CheckRecord {
        let start = Instant::now();
        let arguments = check.arguments.resolve(mode);
        let command = target.describe(&arguments);

        let verdict = match invoker::invoke(target, &arguments, self.config.timeout) {
            Ok(InvocationResult::Ok(stdout)) => (check.verify)(&stdout, mode),
            Ok(InvocationResult::TimedOut(timeout)) => {
                Verdict::timeout(invoker::timeout_message(&command, timeout))
            }
            Ok(InvocationResult::Failed(stderr)) => {
                Verdict::execution_failure(invoker::failure_message(&command, &stderr))
            }
            Err(e) => {
                warn!(check = %check.id, error = %e, "submission could not be run");
                Verdict::execution_failure(invoker::failure_message(&command, &e.to_string()))
            }
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(check = %check.id, kind = ?verdict.kind, duration_ms, "check finished");

        CheckRecord {
            id: check.id.clone(),
            title: check.title.clone(),
            arguments,
            verdict,
            duration_ms,
        }
    }

    fn warn_unknown(&self, check_ids: &[String]) {
        let known: HashSet<&str> = self.checks.iter().map(|c| c.id.as_str()).collect();
        for id in check_ids.iter().filter(|id| !known.contains(id.as_str())) {
            warn!(check = %id, "unknown check id ignored");
        }
    }
}
