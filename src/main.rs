//! autograde CLI entry point
//!
//! Grades a database lab submission by running it once per check.

use anyhow::Context;
use autograde::checks::create_all_checks;
use autograde::cli::args::Args;
use autograde::cli::output::get_formatter;
use autograde::engine::orchestrator::VerdictSink;
use autograde::version::long_version;
use autograde::{run_checks, AutogradeConfig, GradingMode};
use clap::{CommandFactory, FromArgMatches};
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let matches = Args::command()
        .long_version(long_version())
        .get_matches();
    let args = match Args::from_arg_matches(&matches) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    init_tracing(args.verbose);

    let config = AutogradeConfig::from_args(&args);

    if args.list {
        print_check_list(config.mode);
        return ExitCode::SUCCESS;
    }

    match grade(&args, &config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(3)
        }
    }
}

/// Logs go to stderr so they never mix with verdicts
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn print_check_list(mode: GradingMode) {
    println!("Available checks ({}):", mode);
    println!();
    for check in create_all_checks() {
        println!("  {:<9}{}", check.id, check.title);
        println!("           args: {:?}", check.arguments.resolve(mode));
        println!("           expects: {}", check.description);
    }
}

fn grade(args: &Args, config: &AutogradeConfig) -> anyhow::Result<ExitCode> {
    let stdout = io::stdout();
    let color = !args.no_color && std::env::var_os("NO_COLOR").is_none() && stdout.is_terminal();
    let sink = VerdictSink::new(stdout, get_formatter(args.format, color));

    let report = run_checks(config, &sink)
        .with_context(|| format!("grading {} aborted", config.submission.display()))?;
    sink.emit_summary(&report).context("printing summary")?;

    // Verdicts are advisory unless --strict asks for a gate
    if args.strict && !report.summary().all_passed() {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}
