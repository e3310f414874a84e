//! Adapter layer: Convert USDA DTOs to domain models

use super::dto;
use crate::nutrition::domain::{
    ProviderId, RawNutrient, RawProviderDocument, RawRecord, TextVariants,
};

/// Convert a search response into a document with one record per food.
///
/// `page_number` is reported 0-based, matching the request side.
pub fn to_document(response: dto::SearchResponse) -> RawProviderDocument {
    RawProviderDocument {
        provider: ProviderId::Usda,
        total_results: response.total_hits,
        page_number: response.current_page.map(|p| p.saturating_sub(1)),
        records: response.foods.into_iter().map(to_record).collect(),
    }
}

fn to_record(food: dto::SearchFood) -> RawRecord {
    let quantity = match (food.serving_size, food.serving_size_unit) {
        (Some(size), Some(unit)) => Some(format!("{size} {unit}")),
        _ => None,
    };

    RawRecord {
        identifier: food.fdc_id.to_string(),
        name: TextVariants::canonical(food.description),
        brand: food.brand_name.or(food.brand_owner),
        quantity,
        ingredients: TextVariants::canonical(food.ingredients),
        categories: TextVariants::canonical(food.food_category),
        nutrients: food
            .food_nutrients
            .into_iter()
            .filter_map(|n| {
                let name = n.nutrient_name?;
                Some(RawNutrient::new(name, n.value).with_unit(n.unit_name))
            })
            .collect(),
        ..Default::default()
    }
}
