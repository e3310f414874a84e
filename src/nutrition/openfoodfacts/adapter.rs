//! Adapter layer: Convert Open Food Facts DTOs to domain models
//!
//! This is the ONLY place where Open Food Facts DTO types are converted to
//! domain types.

use super::dto;
use crate::nutrition::domain::{
    Catalog, ClassifiedError, ProviderId, RawNutrient, RawProviderDocument, RawRecord,
    TextVariants,
};
use crate::nutrition::request::Barcode;

/// Convert a product response into a single-record document.
///
/// A body-level `status` other than 1, or a missing product, is `NotFound`
/// regardless of the HTTP status it arrived with.
pub fn to_document(
    response: dto::ProductResponse,
    catalog: Catalog,
    barcode: &Barcode,
    language: &str,
) -> Result<RawProviderDocument, ClassifiedError> {
    let product = match (response.status, response.product) {
        (Some(1), Some(product)) => product,
        (status, _) => {
            let mut error = ClassifiedError::not_found(format!(
                "Product {barcode} not found in {}",
                catalog.host()
            ));
            if let Some(verbose) = response.status_verbose {
                error = error.with_detail(format!("status {}: {verbose}", status.unwrap_or(0)));
            }
            return Err(error);
        }
    };

    let text = |field: &str, canonical: Option<String>| TextVariants {
        localized: product.translated(field, language).map(String::from),
        canonical,
    };

    let record = RawRecord {
        identifier: response.code.unwrap_or_else(|| barcode.to_string()),
        name: text("product_name", product.product_name.clone()),
        brand: product.brands.clone(),
        quantity: product.quantity.clone(),
        ingredients: text("ingredients_text", product.ingredients_text.clone()),
        categories: text("categories", product.categories.clone()),
        nutriscore: product.nutriscore_grade.clone(),
        ecoscore: product.ecoscore_grade.clone(),
        nutrients: product
            .nutriments
            .iter()
            .map(|(slug, value)| RawNutrient::new(slug.clone(), value.clone()))
            .collect(),
    };

    Ok(RawProviderDocument {
        provider: ProviderId::OpenFoodFacts(catalog),
        records: vec![record],
        total_results: Some(1),
        page_number: None,
    })
}
