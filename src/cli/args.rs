//! Command line arguments for autograde.

use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Lab variant the submission was written for
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabType {
    /// Submission queries MongoDB
    Mongo,
    /// Submission queries MySQL
    Mysql,
}

/// Output format selection
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable verdict blocks
    #[default]
    Text,
    /// One JSON object per verdict, one per line
    Json,
}

/// Parsed command line arguments
#[derive(Parser, Debug, Clone)]
#[command(
    name = "autograde",
    version,
    about = "Autograde Student CS132 Database Lab"
)]
pub struct Args {
    /// Specify whether student use Mongo database or MySQL database
    #[arg(short = 't', long = "type", value_enum, env = "AUTOGRADE_TYPE")]
    pub lab_type: LabType,

    /// Path to student's script
    #[arg(required_unless_present = "list")]
    pub filepath: Option<PathBuf>,

    /// Program that runs the script, e.g. `node` for a JavaScript lab
    ///
    /// Without it the script itself is executed, so it must be executable and
    /// carry a shebang line. Use `--interpreter node` to grade a plain `.js` file.
    #[arg(long, env = "AUTOGRADE_INTERPRETER", value_name = "PROGRAM")]
    pub interpreter: Option<String>,

    /// Per-invocation timeout in seconds
    #[arg(
        long,
        default_value_t = 120,
        env = "AUTOGRADE_TIMEOUT",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Number of checks run at once (default: available CPUs)
    #[arg(short = 'j', long, env = "AUTOGRADE_JOBS")]
    pub jobs: Option<NonZeroUsize>,

    /// Output format
    #[arg(long, value_enum, default_value_t, env = "AUTOGRADE_FORMAT")]
    pub format: OutputFormat,

    /// Run only this check (repeatable)
    #[arg(long, value_name = "ID")]
    pub only: Vec<String>,

    /// Skip this check (repeatable)
    #[arg(long, value_name = "ID", conflicts_with = "only")]
    pub skip: Vec<String>,

    /// Exit with status 1 when any check fails
    #[arg(long)]
    pub strict: bool,

    /// List the checks for the selected lab type and exit
    #[arg(long)]
    pub list: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Log each invocation to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
