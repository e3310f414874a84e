//! USDA FoodData Central integration
//!
//! Public-domain nutrient data for generic and branded foods.
//! API docs: https://fdc.nal.usda.gov/api-guide

mod adapter;
mod client;
pub mod dto;

pub use client::{DEFAULT_BASE_URL, DEFAULT_DATA_TYPE, UsdaClient};
