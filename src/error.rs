//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`
//! ([`ClassifiedError`] for provider failures, [`ConfigError`] for the
//! config file), while CLI/main uses `anyhow` for convenient error
//! propagation.
//!
//! # Example
//!
//! ```ignore
//! use nutrition_aggregator::error::{Result, ResultExt};
//!
//! fn write_output(path: &Path, product: &NormalizedProduct) -> Result<()> {
//!     let json = serde_json::to_string_pretty(product)?;
//!     std::fs::write(path, json).with_context("writing product")?;
//!     Ok(())
//! }
//! ```

use crate::config::ConfigError;
use crate::nutrition::ClassifiedError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A lookup that failed across every provider
    #[error("Aggregation error: {0}")]
    Aggregation(#[from] ClassifiedError),

    /// Output serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client setup error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}
