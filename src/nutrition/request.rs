//! Validated lookup requests.
//!
//! Inputs are checked once, here; providers can assume every request they
//! receive is well-formed.

use std::fmt;

use super::domain::{CODE_MISSING_PARAMETER, CODE_OUT_OF_RANGE, ClassifiedError};

/// Upper bound for `max_results` accepted by the search providers
pub const MAX_RESULTS_LIMIT: i64 = 50;
pub const DEFAULT_MAX_RESULTS: u32 = 20;
pub const DEFAULT_REGION: &str = "US";

/// An EAN-8 to EAN-13 barcode (8-13 ASCII digits)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Barcode(String);

impl Barcode {
    pub fn parse(raw: &str) -> Result<Self, ClassifiedError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ClassifiedError::validation(
                CODE_MISSING_PARAMETER,
                "Missing required parameter: barcode",
            ));
        }
        if !(8..=13).contains(&raw.len()) || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ClassifiedError::validation(
                CODE_OUT_OF_RANGE,
                "Invalid barcode format: expected 8-13 digits",
            )
            .with_detail(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// GS1 prefixes 460-469 are assigned to Russia
    pub fn is_russian(&self) -> bool {
        self.0.starts_with("46")
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-text search with pagination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    expression: String,
    max_results: u32,
    page_number: u32,
    region: String,
    language: Option<String>,
}

impl SearchQuery {
    /// Create a query with default pagination (20 results, first page)
    pub fn new(expression: &str) -> Result<Self, ClassifiedError> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Err(ClassifiedError::validation(
                CODE_MISSING_PARAMETER,
                "Missing required parameter: query",
            ));
        }
        Ok(Self {
            expression: expression.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            page_number: 0,
            region: DEFAULT_REGION.to_string(),
            language: None,
        })
    }

    pub fn with_max_results(mut self, max_results: i64) -> Result<Self, ClassifiedError> {
        if max_results > MAX_RESULTS_LIMIT {
            return Err(ClassifiedError::validation(
                CODE_OUT_OF_RANGE,
                format!("max_results cannot be greater than {MAX_RESULTS_LIMIT}"),
            ));
        }
        if max_results < 1 {
            return Err(ClassifiedError::validation(
                CODE_OUT_OF_RANGE,
                "max_results must be at least 1",
            ));
        }
        self.max_results = max_results as u32;
        Ok(self)
    }

    pub fn with_page_number(mut self, page_number: i64) -> Result<Self, ClassifiedError> {
        let page_number = u32::try_from(page_number).map_err(|_| {
            ClassifiedError::validation(CODE_OUT_OF_RANGE, "page_number must be 0 or greater")
        })?;
        self.page_number = page_number;
        Ok(self)
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Blank values are ignored
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language.filter(|l| !l.trim().is_empty());
        self
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

/// FatSecret food identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodId(String);

impl FoodId {
    pub fn parse(raw: &str) -> Result<Self, ClassifiedError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ClassifiedError::validation(
                CODE_MISSING_PARAMETER,
                "Missing required parameter: food_id",
            ));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A request the orchestrator can route to a provider chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderRequest {
    Barcode(Barcode),
    Search(SearchQuery),
    FoodDetails(FoodId),
}

impl ProviderRequest {
    /// Barcode and food lookups must resolve to exactly one record
    pub fn expects_record(&self) -> bool {
        !matches!(self, ProviderRequest::Search(_))
    }
}

impl fmt::Display for ProviderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderRequest::Barcode(barcode) => write!(f, "barcode {barcode}"),
            ProviderRequest::Search(query) => write!(
                f,
                "search '{}' (max {}, page {})",
                query.expression, query.max_results, query.page_number
            ),
            ProviderRequest::FoodDetails(id) => write!(f, "food {}", id.0),
        }
    }
}
