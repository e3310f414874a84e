//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `lookup`: Barcode lookups and FatSecret food details
//! - `search`: Free-text search
//! - `init`: Writing a starter config file

mod init;
mod lookup;
mod search;

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::runtime::Runtime;

use crate::config::{self, Config};
use crate::error::{Error, Result, ResultExt};
use crate::nutrition::{Aggregator, ClassifiedError, ReqwestTransport};

pub use init::cmd_init_config;
pub use lookup::{cmd_food, cmd_lookup};
pub use search::cmd_search;

/// Nutrition Aggregator CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of the standard location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// FatSecret OAuth2 client id (or set FATSECRET_CLIENT_ID env var)
    #[arg(long, global = true, env = "FATSECRET_CLIENT_ID", hide_env_values = true)]
    pub fatsecret_client_id: Option<String>,

    /// FatSecret OAuth2 client secret (or set FATSECRET_CLIENT_SECRET env var)
    #[arg(long, global = true, env = "FATSECRET_CLIENT_SECRET", hide_env_values = true)]
    pub fatsecret_client_secret: Option<String>,

    /// USDA FoodData Central API key (or set USDA_API_KEY env var)
    #[arg(long, global = true, env = "USDA_API_KEY", hide_env_values = true)]
    pub usda_api_key: Option<String>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Look up a product by EAN-8/EAN-13 barcode
    Lookup {
        /// Barcode digits
        barcode: String,
    },
    /// Search products by name
    Search {
        /// Search expression
        query: String,
        /// Results per page (1-50)
        #[arg(long, default_value_t = 20)]
        max_results: i64,
        /// Zero-based page number
        #[arg(long, default_value_t = 0)]
        page: i64,
        /// Region code (defaults to the configured region)
        #[arg(long)]
        region: Option<String>,
        /// Result language
        #[arg(long)]
        language: Option<String>,
    },
    /// Fetch a FatSecret food by id
    Food {
        /// FatSecret food id
        id: String,
    },
    /// Write a config file with default settings
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the specified CLI command.
///
/// Returns a failing exit code when a lookup fails; the error body has
/// already been printed by then.
pub fn run_command(cli: &Cli) -> anyhow::Result<ExitCode> {
    // Credentials from flags/env only apply to lookups, never to the saved file
    let code = match &cli.command {
        Commands::InitConfig { force } => {
            cmd_init_config(&load_config(cli), cli.config.as_deref(), *force)?;
            ExitCode::SUCCESS
        }
        Commands::Lookup { barcode } => {
            let rt = Runtime::new()?;
            cmd_lookup(&rt, &build_aggregator(&resolve_config(cli))?, barcode)?
        }
        Commands::Search {
            query,
            max_results,
            page,
            region,
            language,
        } => {
            let config = resolve_config(cli);
            let rt = Runtime::new()?;
            let region = region.as_deref().unwrap_or(&config.providers.region);
            cmd_search(
                &rt,
                &build_aggregator(&config)?,
                query,
                *max_results,
                *page,
                region,
                language.as_deref(),
            )?
        }
        Commands::Food { id } => {
            let rt = Runtime::new()?;
            cmd_food(&rt, &build_aggregator(&resolve_config(cli))?, id)?
        }
    };
    Ok(code)
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Load the config file named on the command line, or the standard one
fn load_config(cli: &Cli) -> Config {
    match &cli.config {
        Some(path) => config::load_from(path),
        None => config::load(),
    }
}

/// Load the config file and apply credential overrides from flags/env
fn resolve_config(cli: &Cli) -> Config {
    let mut config = load_config(cli);
    apply_overrides(&mut config, cli);
    config
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    let credentials = &mut config.credentials;
    if let Some(id) = &cli.fatsecret_client_id {
        credentials.fatsecret_client_id = Some(id.clone());
    }
    if let Some(secret) = &cli.fatsecret_client_secret {
        credentials.fatsecret_client_secret = Some(secret.clone());
    }
    if let Some(key) = &cli.usda_api_key {
        credentials.usda_api_key = Some(key.clone());
    }
}

fn build_aggregator(config: &Config) -> Result<Aggregator> {
    let transport = ReqwestTransport::new()
        .map_err(Error::from)
        .with_context("creating HTTP client")?;
    Ok(Aggregator::from_config(config, Arc::new(transport)))
}

/// Print a result as pretty JSON on stdout.
///
/// Failures print the API error body instead and yield a failing exit code.
pub(crate) fn print_outcome<T: Serialize>(
    outcome: std::result::Result<T, ClassifiedError>,
) -> Result<ExitCode> {
    match outcome {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            let (code, status) = error.status_pair();
            tracing::error!(code, status, "{}", error);
            println!("{}", serde_json::to_string_pretty(&error.to_api_error())?);
            Ok(ExitCode::FAILURE)
        }
    }
}
