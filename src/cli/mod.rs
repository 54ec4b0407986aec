//! CLI module for argument parsing and output formatting.
//!
//! Arguments are parsed with clap; formatters render verdict blocks.

pub mod args;
pub mod output;
