//! Open Food Facts API Data Transfer Objects
//!
//! These types match what the product endpoint returns.
//! DO NOT use these types outside the openfoodfacts module - convert to domain types.
//!
//! API Reference: https://openfoodfacts.github.io/openfoodfacts-server/api/
//!
//! Example response:
//! ```json
//! {
//!   "code": "4601234567890",
//!   "status": 1,
//!   "status_verbose": "product found",
//!   "product": {
//!     "product_name": "Milk",
//!     "product_name_ru": "Молоко",
//!     "brands": "Простоквашино",
//!     "nutriments": {"energy-kcal_100g": 64, "proteins_100g": "3,2"}
//!   }
//! }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// Top-level product lookup response
#[derive(Debug, Clone, Deserialize)]
pub struct ProductResponse {
    pub code: Option<String>,
    /// 1 when the product exists, 0 otherwise (even with HTTP 200)
    pub status: Option<i64>,
    pub status_verbose: Option<String>,
    pub product: Option<Product>,
}

/// Product record.
///
/// Translations live in language-suffixed keys (`product_name_ru`,
/// `ingredients_text_ru`, `categories_ru`) which are collected in `extra`.
///
/// Community-edited text fields sometimes carry numbers or arrays; those
/// decode as absent instead of failing the whole product.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub brands: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub quantity: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ingredients_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub categories: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub nutriscore_grade: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ecoscore_grade: Option<String>,
    /// Nutrient slugs to numbers or numeric strings
    #[serde(default)]
    pub nutriments: serde_json::Map<String, serde_json::Value>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Product {
    /// Language-suffixed variant of a text field, e.g. `product_name_ru`
    pub fn translated(&self, field: &str, language: &str) -> Option<&str> {
        self.extra
            .get(&format!("{field}_{language}"))
            .and_then(|v| v.as_str())
    }
}

/// Accept a string; any other JSON type becomes `None`
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Some(s),
        _ => None,
    })
}
