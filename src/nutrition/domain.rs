//! Internal domain models for product lookup and nutrient aggregation.
//!
//! These types are OUR types - they don't change when provider APIs change.
//! Every provider response gets converted into a [`RawProviderDocument`] by
//! its adapter, and the orchestrator turns that into [`NormalizedProduct`]s.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

/// Open Food Facts catalog a barcode lookup was served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Catalog {
    /// `ru.openfoodfacts.org`, preferred for Russian (46x) barcodes
    Russia,
    /// `world.openfoodfacts.org`
    World,
}

impl Catalog {
    pub fn host(self) -> &'static str {
        match self {
            Catalog::Russia => "ru.openfoodfacts.org",
            Catalog::World => "world.openfoodfacts.org",
        }
    }
}

/// Provider that produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    FatSecret,
    OpenFoodFacts(Catalog),
    Usda,
}

impl ProviderId {
    /// Label used in the `source` field of the output contract
    pub fn label(self) -> &'static str {
        match self {
            ProviderId::FatSecret => "FatSecret",
            ProviderId::OpenFoodFacts(catalog) => catalog.host(),
            ProviderId::Usda => "USDA",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ProviderId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Canonical, provider-independent nutrient identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum NutrientKey {
    #[serde(rename = "calories")]
    Calories,
    #[serde(rename = "proteins")]
    Protein,
    #[serde(rename = "carbohydrates")]
    Carbohydrates,
    #[serde(rename = "fats")]
    Fat,
    #[serde(rename = "fiber")]
    Fiber,
    #[serde(rename = "calcium")]
    Calcium,
    #[serde(rename = "omega3")]
    Omega3,
    #[serde(rename = "saturatedFat")]
    SaturatedFat,
    #[serde(rename = "iron")]
    Iron,
    #[serde(rename = "sodium")]
    Sodium,
    #[serde(rename = "potassium")]
    Potassium,
    #[serde(rename = "choline")]
    Choline,
    #[serde(rename = "caffeine")]
    Caffeine,
}

/// A text attribute as the provider delivered it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextVariants {
    /// Provider's default-language value
    pub canonical: Option<String>,
    /// Region-specific translation of the same attribute
    pub localized: Option<String>,
}

impl TextVariants {
    pub fn canonical(value: Option<String>) -> Self {
        Self {
            canonical: value,
            localized: None,
        }
    }
}

/// A text attribute after merging (see [`super::merge`])
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizedField {
    pub primary: Option<String>,
    /// Only set when it differs from `primary`
    pub secondary: Option<String>,
}

/// One nutrient entry exactly as a provider named it
#[derive(Debug, Clone, PartialEq)]
pub struct RawNutrient {
    pub name: String,
    pub unit: Option<String>,
    pub value: serde_json::Value,
}

impl RawNutrient {
    pub fn new(name: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            unit: None,
            value,
        }
    }

    pub fn with_unit(mut self, unit: Option<String>) -> Self {
        self.unit = unit;
        self
    }
}

/// A single product/food inside a provider document, not yet normalized
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    /// Barcode, FatSecret food id or USDA fdcId
    pub identifier: String,
    pub name: TextVariants,
    pub brand: Option<String>,
    pub quantity: Option<String>,
    pub ingredients: TextVariants,
    pub categories: TextVariants,
    pub nutriscore: Option<String>,
    pub ecoscore: Option<String>,
    pub nutrients: Vec<RawNutrient>,
}

/// Decoded provider response, consumed by the orchestrator within one call
#[derive(Debug, Clone)]
pub struct RawProviderDocument {
    pub provider: ProviderId,
    pub records: Vec<RawRecord>,
    pub total_results: Option<u32>,
    pub page_number: Option<u32>,
}

impl RawProviderDocument {
    pub fn empty(provider: ProviderId) -> Self {
        Self {
            provider,
            records: Vec::new(),
            total_results: Some(0),
            page_number: None,
        }
    }
}

/// Normalized product record returned to callers.
///
/// Built once per successful aggregation; fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedProduct {
    barcode: String,
    name: LocalizedField,
    brand: Option<String>,
    quantity: Option<String>,
    nutrients: BTreeMap<NutrientKey, f64>,
    ingredients: LocalizedField,
    categories: LocalizedField,
    nutriscore: Option<String>,
    ecoscore: Option<String>,
    source: ProviderId,
}

/// Fields of a [`NormalizedProduct`], consumed by [`NormalizedProduct::new`]
#[derive(Debug, Clone)]
pub struct ProductParts {
    pub barcode: String,
    pub name: LocalizedField,
    pub brand: Option<String>,
    pub quantity: Option<String>,
    pub nutrients: BTreeMap<NutrientKey, f64>,
    pub ingredients: LocalizedField,
    pub categories: LocalizedField,
    pub nutriscore: Option<String>,
    pub ecoscore: Option<String>,
}

impl NormalizedProduct {
    pub fn new(parts: ProductParts, source: ProviderId) -> Self {
        Self {
            barcode: parts.barcode,
            name: parts.name,
            brand: parts.brand,
            quantity: parts.quantity,
            nutrients: parts.nutrients,
            ingredients: parts.ingredients,
            categories: parts.categories,
            nutriscore: parts.nutriscore,
            ecoscore: parts.ecoscore,
            source,
        }
    }

    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    pub fn name(&self) -> &LocalizedField {
        &self.name
    }

    pub fn nutrient(&self, key: NutrientKey) -> Option<f64> {
        self.nutrients.get(&key).copied()
    }

    pub fn source(&self) -> ProviderId {
        self.source
    }
}

/// Wire shape of [`NormalizedProduct`]
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductBody<'a> {
    barcode: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name_canonical: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    brand: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quantity: Option<&'a str>,
    #[serde(flatten)]
    nutrients: &'a BTreeMap<NutrientKey, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ingredients: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ingredients_canonical: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    categories: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    categories_canonical: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nutriscore: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ecoscore: Option<&'a str>,
    source: ProviderId,
}

impl Serialize for NormalizedProduct {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ProductBody {
            barcode: &self.barcode,
            name: self.name.primary.as_deref(),
            name_canonical: self.name.secondary.as_deref(),
            brand: self.brand.as_deref(),
            quantity: self.quantity.as_deref(),
            nutrients: &self.nutrients,
            ingredients: self.ingredients.primary.as_deref(),
            ingredients_canonical: self.ingredients.secondary.as_deref(),
            categories: self.categories.primary.as_deref(),
            categories_canonical: self.categories.secondary.as_deref(),
            nutriscore: self.nutriscore.as_deref(),
            ecoscore: self.ecoscore.as_deref(),
            source: self.source,
        }
        .serialize(serializer)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Boundary code for a missing required parameter
pub const CODE_MISSING_PARAMETER: u32 = 101;
/// Boundary code for a value outside its allowed range
pub const CODE_OUT_OF_RANGE: u32 = 107;
/// Boundary code for an invalid or expired access token
pub const CODE_INVALID_TOKEN: u32 = 13;
/// Boundary code for a token lacking the required scope
pub const CODE_MISSING_SCOPE: u32 = 14;

/// Shared error taxonomy for the token cache and the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range input; never retried, never falls back
    Validation,
    /// Credential or token rejected upstream
    Auth,
    /// Upstream explicitly reports absence
    NotFound,
    /// Timeouts, 5xx, throttling, malformed responses
    UpstreamUnavailable,
    Unknown,
}

/// A failure carrying its [`ErrorKind`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub message: String,
    pub upstream_detail: Option<String>,
    /// Numeric code reported by the provider or assigned at validation
    pub api_code: Option<u32>,
}

impl ClassifiedError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            upstream_detail: None,
            api_code: None,
        }
    }

    pub fn validation(code: u32, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message).with_code(code)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Auth, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UpstreamUnavailable, message)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.upstream_detail = Some(detail.into());
        self
    }

    pub fn with_code(mut self, code: u32) -> Self {
        self.api_code = Some(code);
        self
    }

    /// NotFound and UpstreamUnavailable are recoverable by the next provider
    pub fn is_fallbackable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::NotFound | ErrorKind::UpstreamUnavailable
        )
    }

    /// Boundary code and HTTP status for this error
    pub fn status_pair(&self) -> (u32, u16) {
        match self.kind {
            ErrorKind::Validation => match self.api_code {
                Some(CODE_OUT_OF_RANGE) => (CODE_OUT_OF_RANGE, 400),
                Some(code) if code >= 100 => (code, 400),
                _ => (CODE_MISSING_PARAMETER, 400),
            },
            ErrorKind::Auth => match self.api_code {
                Some(CODE_MISSING_SCOPE) => (CODE_MISSING_SCOPE, 403),
                _ => (CODE_INVALID_TOKEN, 401),
            },
            ErrorKind::NotFound => (404, 404),
            ErrorKind::UpstreamUnavailable => (503, 503),
            ErrorKind::Unknown => (500, 500),
        }
    }

    pub fn http_status(&self) -> u16 {
        self.status_pair().1
    }

    pub fn to_api_error(&self) -> ApiErrorBody {
        ApiErrorBody {
            code: self.status_pair().0,
            message: self.message.clone(),
            details: self.upstream_detail.clone(),
        }
    }
}

/// Error body of the output contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub code: u32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
