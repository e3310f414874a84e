//! USDA FoodData Central API Data Transfer Objects
//!
//! These types match what `GET /foods/search` returns.
//! DO NOT use these types outside the usda module - convert to domain types.
//!
//! API Reference: https://fdc.nal.usda.gov/api-guide

use serde::Deserialize;

/// Top-level search response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub total_hits: Option<u32>,
    /// 1-based
    pub current_page: Option<u32>,
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub foods: Vec<SearchFood>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFood {
    pub fdc_id: u64,
    pub description: Option<String>,
    pub data_type: Option<String>,
    pub brand_name: Option<String>,
    pub brand_owner: Option<String>,
    pub ingredients: Option<String>,
    pub food_category: Option<String>,
    pub serving_size: Option<f64>,
    pub serving_size_unit: Option<String>,
    #[serde(default)]
    pub food_nutrients: Vec<FoodNutrient>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodNutrient {
    pub nutrient_id: Option<u64>,
    pub nutrient_name: Option<String>,
    pub unit_name: Option<String>,
    /// Usually a number, occasionally missing
    #[serde(default)]
    pub value: serde_json::Value,
}
