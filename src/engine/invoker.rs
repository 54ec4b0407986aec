//! Submission invocation.
//!
//! Runs the submission once with a given argument list, bounded by a
//! wall-clock timeout, and classifies how it ended.
//!
//! # Graceful Degradation
//!
//! None of the outcomes of the submission itself are errors:
//! - Exceeds the timeout: process group is killed, `InvocationResult::TimedOut`
//! - Exits but leaves a descendant holding stdout/stderr past the timeout:
//!   same as above
//! - Exits nonzero or dies by signal: `InvocationResult::Failed` with stderr
//! - Non-UTF8 output: lossy conversion
//!
//! Only failing to start the child (or to talk to it) returns an error.

use crate::AutogradeError;
use std::io::{self, Read};
#[cfg(unix)]
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Default wall-clock budget per invocation
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How an invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationResult {
    /// Exited zero; stdout exactly as produced
    Ok(String),
    /// Killed after exceeding the timeout
    TimedOut(Duration),
    /// Exited nonzero; captured stderr
    Failed(String),
}

/// The program under test, optionally run through an interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    program: PathBuf,
    interpreter: Option<String>,
}

impl Target {
    pub fn new(program: impl AsRef<Path>) -> Self {
        Target {
            program: program.as_ref().to_path_buf(),
            interpreter: None,
        }
    }

    /// Run the program as `<interpreter> <program> args...`
    pub fn with_interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = Some(interpreter.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Full argv for an invocation with `arguments`
    pub fn argv(&self, arguments: &[String]) -> Vec<String> {
        let mut argv = Vec::with_capacity(arguments.len() + 2);
        if let Some(ref interpreter) = self.interpreter {
            argv.push(interpreter.clone());
        }
        argv.push(self.program.to_string_lossy().into_owned());
        argv.extend(arguments.iter().cloned());
        argv
    }

    /// Command line as it appears in failure messages
    pub fn describe(&self, arguments: &[String]) -> String {
        format!("{:?}", self.argv(arguments))
    }

    fn command(&self, arguments: &[String]) -> Command {
        let mut cmd = match self.interpreter {
            Some(ref interpreter) => {
                let mut cmd = Command::new(interpreter);
                cmd.arg(&self.program);
                cmd
            }
            None => Command::new(&self.program),
        };
        cmd.args(arguments);
        cmd
    }
}

/// Message reported when an invocation times out
pub fn timeout_message(command: &str, timeout: Duration) -> String {
    format!(
        "{} fails because of timeout after {} seconds",
        command,
        timeout.as_secs_f64()
    )
}

/// Message reported when an invocation exits nonzero
pub fn failure_message(command: &str, stderr: &str) -> String {
    format!("{} fails because of an error in execution {}", command, stderr)
}

/// Run `target` once with `arguments`.
///
/// Stdin is closed. Stdout and stderr are drained on their own threads so a
/// child that fills one pipe cannot stall on it while we wait. The timeout
/// bounds the whole invocation: a child that exits while something it
/// started still holds its output open is reported as timed out too.
pub fn invoke(
    target: &Target,
    arguments: &[String],
    timeout: Duration,
) -> Result<InvocationResult, AutogradeError> {
    let command_line = target.describe(arguments);
    debug!(command = %command_line, ?timeout, "spawning submission");

    let deadline = Instant::now().checked_add(timeout);

    let mut command = target.command(arguments);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    // Own process group, so a timeout takes down everything the submission started
    #[cfg(unix)]
    command.process_group(0);

    let mut child = command.spawn().map_err(|source| AutogradeError::Spawn {
        command: command_line.clone(),
        source,
    })?;

    let stdout = child.stdout.take().ok_or_else(|| pipe_missing("stdout"))?;
    let stderr = child.stderr.take().ok_or_else(|| pipe_missing("stderr"))?;
    let (tx, rx) = mpsc::channel();
    spawn_reader(Stream::Stdout, stdout, tx.clone());
    spawn_reader(Stream::Stderr, stderr, tx);

    let status = match wait_with_deadline(&mut child, deadline)? {
        Some(status) => status,
        None => {
            warn!(command = %command_line, ?timeout, "submission timed out");
            return Ok(InvocationResult::TimedOut(timeout));
        }
    };

    let (stdout, stderr) = match drain_with_deadline(&rx, deadline)? {
        Some(output) => output,
        None => {
            // Readers are left behind; killing the group closes their pipes.
            kill_process_group(&mut child);
            warn!(command = %command_line, ?timeout, "submission output still open at timeout");
            return Ok(InvocationResult::TimedOut(timeout));
        }
    };

    if status.success() {
        Ok(InvocationResult::Ok(stdout))
    } else {
        debug!(?status, "submission exited unsuccessfully");
        Ok(InvocationResult::Failed(stderr))
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn name(self) -> &'static str {
        match self {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }
}

type Captured = (Stream, io::Result<String>);

fn spawn_reader<R: Read + Send + 'static>(stream: Stream, reader: R, tx: Sender<Captured>) {
    thread::spawn(move || {
        // The receiver is gone only when the invocation already timed out
        let _ = tx.send((stream, read_lossy(reader)));
    });
}

/// Poll the child until it exits or `deadline` passes.
///
/// Returns `None` after killing and reaping a child that ran too long.
fn wait_with_deadline(
    child: &mut Child,
    deadline: Option<Instant>,
) -> Result<Option<ExitStatus>, AutogradeError> {
    loop {
        let polled = child.try_wait().map_err(|source| AutogradeError::Io {
            context: "waiting for submission".to_string(),
            source,
        })?;
        if let Some(status) = polled {
            return Ok(Some(status));
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            kill_process_group(child);
            child.wait().map_err(|source| AutogradeError::Io {
                context: "reaping timed out submission".to_string(),
                source,
            })?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Collect both captured streams, giving up at `deadline`.
///
/// Returns `None` if either pipe is still open when the deadline passes.
fn drain_with_deadline(
    rx: &Receiver<Captured>,
    deadline: Option<Instant>,
) -> Result<Option<(String, String)>, AutogradeError> {
    let mut stdout = None;
    let mut stderr = None;

    while stdout.is_none() || stderr.is_none() {
        let received = match deadline {
            Some(d) => rx.recv_timeout(d.saturating_duration_since(Instant::now())),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        let (stream, captured) = match received {
            Ok(message) => message,
            Err(RecvTimeoutError::Timeout) => return Ok(None),
            Err(RecvTimeoutError::Disconnected) => {
                return Err(AutogradeError::Io {
                    context: "capturing submission output".to_string(),
                    source: io::Error::other("output reader stopped"),
                })
            }
        };
        let text = captured.map_err(|source| AutogradeError::Io {
            context: format!("reading submission {}", stream.name()),
            source,
        })?;
        match stream {
            Stream::Stdout => stdout = Some(text),
            Stream::Stderr => stderr = Some(text),
        }
    }

    Ok(stdout.zip(stderr))
}

/// Kill the child and everything in its process group
#[cfg(unix)]
fn kill_process_group(child: &mut Child) {
    // The child leads its own group, so its pid is the group id
    let pgid = child.id() as libc::pid_t;
    let rc = unsafe { libc::kill(-pgid, libc::SIGKILL) };
    if rc != 0 {
        // kill fails only if the child already exited
        let _ = child.kill();
    }
}

#[cfg(not(unix))]
fn kill_process_group(child: &mut Child) {
    let _ = child.kill();
}

fn read_lossy<R: Read>(mut reader: R) -> io::Result<String> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn pipe_missing(name: &str) -> AutogradeError {
    AutogradeError::Io {
        context: format!("capturing submission {}", name),
        source: io::Error::other("pipe was not created"),
    }
}
