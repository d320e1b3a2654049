//! CLI module: argument parsing and subcommand rendering.
//!
//! - `clap_parser`: clap-based parser and config layering
//! - `render`: plain-text and JSON output for each subcommand

mod clap_parser;
pub mod render;

pub use clap_parser::{Cli, Command, OutputArgs, ProcessArgs, StatsArgs};
