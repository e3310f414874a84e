//! Barcode lookup and food details commands.

use std::process::ExitCode;
use tokio::runtime::Runtime;

use crate::error::Result;
use crate::nutrition::{Aggregator, NormalizedProduct, NutrientKey};

use super::print_outcome;

/// Look up a product by barcode
pub fn cmd_lookup(rt: &Runtime, aggregator: &Aggregator, barcode: &str) -> Result<ExitCode> {
    let outcome = rt.block_on(aggregator.lookup_barcode(barcode));
    if let Ok(product) = &outcome {
        log_product(product);
    }
    print_outcome(outcome)
}

/// Fetch a single FatSecret food
pub fn cmd_food(rt: &Runtime, aggregator: &Aggregator, id: &str) -> Result<ExitCode> {
    let outcome = rt.block_on(aggregator.food_details(id));
    if let Ok(product) = &outcome {
        log_product(product);
    }
    print_outcome(outcome)
}

fn log_product(product: &NormalizedProduct) {
    tracing::info!(
        id = product.barcode(),
        name = product.name().primary.as_deref(),
        calories = product.nutrient(NutrientKey::Calories),
        source = %product.source(),
        "Product found"
    );
}
