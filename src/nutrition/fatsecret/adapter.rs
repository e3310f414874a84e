//! Adapter layer: Convert FatSecret DTOs to domain models
//!
//! This is the ONLY place where FatSecret DTO types are converted to
//! domain types.

use super::dto;
use crate::nutrition::domain::{
    ProviderId, RawNutrient, RawProviderDocument, RawRecord, TextVariants,
};

/// Convert a search response into a document with one record per hit
pub fn to_search_document(response: dto::SearchResponse) -> RawProviderDocument {
    let Some(foods) = response.foods else {
        return RawProviderDocument::empty(ProviderId::FatSecret);
    };

    let records: Vec<RawRecord> = foods.food.into_iter().filter_map(search_record).collect();

    RawProviderDocument {
        provider: ProviderId::FatSecret,
        total_results: foods.total_results.or(Some(records.len() as u32)),
        page_number: foods.page_number,
        records,
    }
}

/// Convert a `food.get` response into a single-record document.
///
/// Nutrients come from the default serving, or the first one listed.
pub fn to_food_document(response: dto::FoodResponse) -> RawProviderDocument {
    let Some(food) = response.food else {
        return RawProviderDocument::empty(ProviderId::FatSecret);
    };
    let Some(identifier) = food.food_id else {
        return RawProviderDocument::empty(ProviderId::FatSecret);
    };

    let servings = food.servings.map(|s| s.serving).unwrap_or_default();
    let serving = servings
        .iter()
        .find(|s| s.is_default.as_deref() == Some("1"))
        .or_else(|| servings.first());

    let record = RawRecord {
        identifier,
        name: TextVariants::canonical(food.food_name),
        brand: food.brand_name,
        quantity: serving.and_then(|s| s.serving_description.clone()),
        nutrients: serving.map(serving_nutrients).unwrap_or_default(),
        ..Default::default()
    };

    RawProviderDocument {
        provider: ProviderId::FatSecret,
        records: vec![record],
        total_results: Some(1),
        page_number: None,
    }
}

fn search_record(food: dto::Food) -> Option<RawRecord> {
    let identifier = food.food_id?;
    let (quantity, nutrients) = food
        .food_description
        .as_deref()
        .map(parse_description)
        .unwrap_or_default();

    Some(RawRecord {
        identifier,
        name: TextVariants::canonical(food.food_name),
        brand: food.brand_name,
        quantity,
        nutrients,
        ..Default::default()
    })
}

fn serving_nutrients(serving: &dto::Serving) -> Vec<RawNutrient> {
    [
        ("calories", &serving.calories),
        ("carbohydrate", &serving.carbohydrate),
        ("protein", &serving.protein),
        ("fat", &serving.fat),
        ("saturated_fat", &serving.saturated_fat),
        ("polyunsaturated_fat", &serving.polyunsaturated_fat),
        ("monounsaturated_fat", &serving.monounsaturated_fat),
        ("cholesterol", &serving.cholesterol),
        ("sodium", &serving.sodium),
        ("potassium", &serving.potassium),
        ("fiber", &serving.fiber),
        ("sugar", &serving.sugar),
        ("calcium", &serving.calcium),
        ("iron", &serving.iron),
    ]
    .into_iter()
    .filter_map(|(name, value)| {
        value
            .as_ref()
            .map(|v| RawNutrient::new(name, serde_json::Value::String(v.clone())))
    })
    .collect()
}

/// Split a search description into its serving and nutrient values.
///
/// `"Per 100g - Calories: 165kcal | Fat: 3.57g | Carbs: 0.00g | Protein: 31.02g"`
/// yields quantity `"100g"` and nutrients `calories`, `fat`, `carbs`,
/// `protein` with their numeric part. Malformed segments are skipped.
pub fn parse_description(description: &str) -> (Option<String>, Vec<RawNutrient>) {
    let (serving, facts) = match description.split_once(" - ") {
        Some((serving, facts)) => (Some(serving), facts),
        None => (None, description),
    };

    let quantity = serving
        .map(|s| s.trim().trim_start_matches("Per ").trim().to_string())
        .filter(|s| !s.is_empty());

    let nutrients = facts
        .split('|')
        .filter_map(|segment| {
            let (label, amount) = segment.split_once(':')?;
            let label = label.trim().to_lowercase();
            let unit_start = amount
                .trim()
                .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
                .unwrap_or(amount.trim().len());
            let (number, unit) = amount.trim().split_at(unit_start);
            if label.is_empty() || number.is_empty() {
                return None;
            }
            Some(
                RawNutrient::new(label, serde_json::Value::String(number.to_string()))
                    .with_unit(Some(unit.trim().to_string()).filter(|u| !u.is_empty())),
            )
        })
        .collect();

    (quantity, nutrients)
}
