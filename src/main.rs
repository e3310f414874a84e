//! Nutrition Aggregator - product and nutrient lookups across public food databases.
//!
//! Barcodes are resolved through Open Food Facts (Russian catalog first for
//! Russian-prefixed codes), text search through FatSecret and USDA
//! FoodData Central. Results are normalized to one nutrient vocabulary and
//! printed as JSON.

pub mod cli;
pub mod config;
pub mod error;
pub mod nutrition;
#[cfg(test)]
pub mod test_utils;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<ExitCode> {
    let args = cli::Cli::parse();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("nutrition_aggregator=info".parse()?))
        .init();

    cli::run_command(&args)
}
