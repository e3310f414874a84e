//! Test fixtures for nutrition-aggregator tests.
//!
//! Response bodies here mirror what the upstream APIs actually send,
//! including their quirks (numbers as strings, comma decimals, single
//! objects where a list is expected). Pair them with
//! [`ScriptedTransport`](crate::nutrition::transport::mocks::ScriptedTransport)
//! to exercise clients and the orchestrator without a network.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{OFF_MILK, OFF_NOT_FOUND};
//!
//! let transport = ScriptedTransport::new()
//!     .route("ru.openfoodfacts.org", 200, OFF_NOT_FOUND)
//!     .route("world.openfoodfacts.org", 200, OFF_MILK);
//! ```

use std::sync::Arc;

use crate::nutrition::token::{OAuthCredentials, TokenCache};
use crate::nutrition::transport::HttpTransport;

/// Token endpoint response with a one-day lifetime
pub const TOKEN_OK: &str =
    r#"{"access_token":"fresh-token","expires_in":86400,"token_type":"Bearer","scope":"basic"}"#;

/// Token endpoint response with a custom token and lifetime
pub fn token_body(token: &str, expires_in: u64) -> String {
    serde_json::json!({
        "access_token": token,
        "expires_in": expires_in,
        "token_type": "Bearer",
        "scope": "basic",
    })
    .to_string()
}

/// Token endpoint rejecting the client credentials
pub const TOKEN_INVALID_CLIENT: &str =
    r#"{"error":"invalid_client","error_description":"Invalid client credentials"}"#;

/// Open Food Facts "product not found" (sent with HTTP 200)
pub const OFF_NOT_FOUND: &str =
    r#"{"code":"4601234567890","status":0,"status_verbose":"product not found"}"#;

/// Open Food Facts product with a Russian translation and messy nutriments
pub const OFF_MILK: &str = r#"{
  "code": "4601234567890",
  "status": 1,
  "status_verbose": "product found",
  "product": {
    "product_name": "Milk",
    "product_name_ru": "Молоко",
    "brands": "Простоквашино",
    "quantity": "930 ml",
    "ingredients_text": "pasteurized milk",
    "ingredients_text_ru": "молоко питьевое пастеризованное",
    "categories": "Dairies, Milks",
    "nutriscore_grade": "b",
    "ecoscore_grade": "c",
    "nutriments": {
      "energy-kcal_100g": 64,
      "proteins_100g": "3,2",
      "fat_100g": 3.6,
      "carbohydrates_100g": "abc",
      "saturated-fat_100g": "2,1",
      "calcium_100g": 0.12,
      "sugars_100g": 4.7
    }
  }
}"#;

/// FatSecret `foods.search` response with two hits
pub const FATSECRET_SEARCH: &str = r#"{
  "foods": {
    "food": [
      {
        "food_id": "33691",
        "food_name": "Chicken Breast",
        "food_type": "Generic",
        "food_description": "Per 100g - Calories: 165kcal | Fat: 3.57g | Carbs: 0.00g | Protein: 31.02g",
        "food_url": "https://www.fatsecret.com/calories-nutrition/generic/chicken-breast"
      },
      {
        "food_id": "1641",
        "food_name": "Grilled Chicken Breast",
        "brand_name": "Tyson",
        "food_type": "Brand",
        "food_description": "Per 1 piece - Calories: 110kcal | Fat: 2,50g | Carbs: 1.00g | Protein: 21.00g"
      }
    ],
    "max_results": "20",
    "page_number": "0",
    "total_results": "2"
  }
}"#;

/// FatSecret `foods.search` response where `food` is a single object
pub const FATSECRET_SEARCH_SINGLE: &str = r#"{
  "foods": {
    "food": {
      "food_id": "33691",
      "food_name": "Chicken Breast",
      "food_type": "Generic",
      "food_description": "Per 100g - Calories: 165kcal | Fat: 3.57g | Carbs: 0.00g | Protein: 31.02g"
    },
    "max_results": "20",
    "page_number": "0",
    "total_results": "1"
  }
}"#;

/// FatSecret `foods.search` response with no hits
pub const FATSECRET_SEARCH_EMPTY: &str =
    r#"{"foods":{"max_results":"20","page_number":"0","total_results":"0"}}"#;

/// FatSecret `food.get` response with a non-default and a default serving
pub const FATSECRET_FOOD: &str = r#"{
  "food": {
    "food_id": "33691",
    "food_name": "Chicken Breast",
    "food_type": "Generic",
    "servings": {
      "serving": [
        {
          "serving_id": "50321",
          "serving_description": "100 g",
          "is_default": "0",
          "calories": "165",
          "protein": "31.02",
          "carbohydrate": "0",
          "fat": "3.57"
        },
        {
          "serving_id": "34208",
          "serving_description": "1 medium breast",
          "is_default": "1",
          "calories": "284",
          "protein": "53.37",
          "carbohydrate": "0",
          "fat": "6.14",
          "saturated_fat": "1.737",
          "sodium": "127",
          "potassium": "440",
          "fiber": "0",
          "iron": "1.79"
        }
      ]
    }
  }
}"#;

/// FatSecret error envelope (sent with HTTP 200)
pub const FATSECRET_INVALID_TOKEN: &str =
    r#"{"error":{"code":13,"message":"Invalid token: 'expired'"}}"#;

/// USDA FoodData Central search response
pub const USDA_SEARCH: &str = r#"{
  "totalHits": 1,
  "currentPage": 1,
  "totalPages": 1,
  "foods": [
    {
      "fdcId": 171077,
      "description": "Chicken, broilers or fryers, breast, meat only, cooked, roasted",
      "dataType": "SR Legacy",
      "foodCategory": "Poultry Products",
      "foodNutrients": [
        {"nutrientId": 1003, "nutrientName": "Protein", "unitName": "G", "value": 31.0},
        {"nutrientId": 1004, "nutrientName": "Total lipid (fat)", "unitName": "G", "value": 3.57},
        {"nutrientId": 1062, "nutrientName": "Energy", "unitName": "kJ", "value": 690},
        {"nutrientId": 1008, "nutrientName": "Energy", "unitName": "KCAL", "value": 165},
        {"nutrientId": 1093, "nutrientName": "Sodium, Na", "unitName": "MG", "value": 74}
      ]
    }
  ]
}"#;

/// OAuth credentials pointing at a fake token endpoint
pub fn test_credentials() -> OAuthCredentials {
    OAuthCredentials {
        token_url: "https://oauth.example.com/connect/token".to_string(),
        client_id: "client-1".to_string(),
        client_secret: "secret-1".to_string(),
        scope: "basic".to_string(),
    }
}

/// Token cache over the given transport with [`test_credentials`]
pub fn test_token_cache(transport: Arc<dyn HttpTransport>) -> Arc<TokenCache> {
    Arc::new(TokenCache::new(test_credentials(), transport))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_are_valid_json() {
        for body in [
            TOKEN_OK,
            TOKEN_INVALID_CLIENT,
            OFF_NOT_FOUND,
            OFF_MILK,
            FATSECRET_SEARCH,
            FATSECRET_SEARCH_SINGLE,
            FATSECRET_SEARCH_EMPTY,
            FATSECRET_FOOD,
            FATSECRET_INVALID_TOKEN,
            USDA_SEARCH,
        ] {
            assert!(
                serde_json::from_str::<serde_json::Value>(body).is_ok(),
                "invalid fixture: {body}"
            );
        }
    }

    #[test]
    fn test_token_body() {
        let body: serde_json::Value = serde_json::from_str(&token_body("abc", 30)).unwrap();
        assert_eq!(body["access_token"], "abc");
        assert_eq!(body["expires_in"], 30);
    }
}
