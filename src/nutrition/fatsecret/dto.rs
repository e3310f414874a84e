//! FatSecret Platform API Data Transfer Objects
//!
//! These types match what the `server.api` endpoint returns with
//! `format=json`.
//! DO NOT use these types outside the fatsecret module - convert to domain types.
//!
//! API Reference: https://platform.fatsecret.com/docs/v1/foods.search
//!
//! Quirks handled here:
//! - every number is sent as a string (`"total_results": "2"`)
//! - a list with one element is sent as a bare object
//! - errors arrive as `{"error": {"code": 13, "message": "..."}}`, often
//!   with HTTP 200

use serde::{Deserialize, Deserializer};

/// `foods.search` response
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub foods: Option<Foods>,
    /// Error envelope, classified by the client
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Foods {
    #[serde(default, deserialize_with = "one_or_many")]
    pub food: Vec<Food>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub max_results: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub total_results: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub page_number: Option<u32>,
}

/// A search hit
#[derive(Debug, Clone, Deserialize)]
pub struct Food {
    pub food_id: Option<String>,
    pub food_name: Option<String>,
    pub brand_name: Option<String>,
    pub food_type: Option<String>,
    pub food_url: Option<String>,
    /// e.g. `"Per 100g - Calories: 165kcal | Fat: 3.57g | Carbs: 0.00g | Protein: 31.02g"`
    pub food_description: Option<String>,
}

/// `food.get` response
#[derive(Debug, Clone, Deserialize)]
pub struct FoodResponse {
    pub food: Option<FoodDetails>,
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FoodDetails {
    pub food_id: Option<String>,
    pub food_name: Option<String>,
    pub brand_name: Option<String>,
    pub food_type: Option<String>,
    pub food_url: Option<String>,
    pub servings: Option<Servings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Servings {
    #[serde(default, deserialize_with = "one_or_many")]
    pub serving: Vec<Serving>,
}

/// Nutrient values for one serving size, all numeric strings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Serving {
    pub serving_id: Option<String>,
    pub serving_description: Option<String>,
    pub metric_serving_amount: Option<String>,
    pub metric_serving_unit: Option<String>,
    /// `"1"` for the serving FatSecret shows by default
    pub is_default: Option<String>,
    pub calories: Option<String>,
    pub carbohydrate: Option<String>,
    pub protein: Option<String>,
    pub fat: Option<String>,
    pub saturated_fat: Option<String>,
    pub polyunsaturated_fat: Option<String>,
    pub monounsaturated_fat: Option<String>,
    pub cholesterol: Option<String>,
    pub sodium: Option<String>,
    pub potassium: Option<String>,
    pub fiber: Option<String>,
    pub sugar: Option<String>,
    pub calcium: Option<String>,
    pub iron: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
        None => Vec::new(),
    })
}

/// Accept `"20"`, `20` or null
fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
