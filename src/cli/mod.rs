//! Command-line interface for nutrition-aggregator.
//!
//! This module provides CLI commands for barcode lookups, text search and
//! food details. Results are printed to stdout as JSON; logs go to stderr.

mod commands;

pub use commands::{Cli, Commands, run_command};
