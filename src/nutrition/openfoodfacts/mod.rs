//! Open Food Facts integration
//!
//! Open Food Facts is a free, crowd-sourced product catalog keyed by barcode.
//! API docs: https://openfoodfacts.github.io/openfoodfacts-server/api/

mod adapter;
mod client;
pub mod dto;

pub use client::{DEFAULT_LANGUAGE, OpenFoodFactsClient};
