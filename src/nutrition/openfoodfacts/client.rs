//! Open Food Facts HTTP client
//!
//! One client instance serves one catalog (`ru.` or `world.`). Both expose
//! the same read-only product endpoint and need no credentials.
//!
//! ## API Quirks
//!
//! A missing product is reported in the body (`"status": 0`), usually with
//! HTTP 200 but sometimes with 404. Nutrient values arrive as numbers or
//! strings, and Russian entries often use a comma decimal separator.

use std::sync::Arc;
use std::time::Duration;

use super::{adapter, dto};
use crate::nutrition::classify::{classify_response, truncate};
use crate::nutrition::domain::{Catalog, ClassifiedError, RawProviderDocument};
use crate::nutrition::request::Barcode;
use crate::nutrition::transport::{HttpRequest, HttpTransport};

/// Language whose translated fields are read by default
pub const DEFAULT_LANGUAGE: &str = "ru";

/// Open Food Facts API client for a single catalog
pub struct OpenFoodFactsClient {
    catalog: Catalog,
    base_url: String,
    language: String,
    transport: Arc<dyn HttpTransport>,
    timeout: Option<Duration>,
}

impl OpenFoodFactsClient {
    pub fn new(catalog: Catalog, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            catalog,
            base_url: format!("https://{}", catalog.host()),
            language: DEFAULT_LANGUAGE.to_string(),
            transport,
            timeout: None,
        }
    }

    /// Point the client at a different host (mirrors, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Language suffix used for translated fields
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn catalog(&self) -> Catalog {
        self.catalog
    }

    /// Look up a product by barcode
    pub async fn lookup(&self, barcode: &Barcode) -> Result<RawProviderDocument, ClassifiedError> {
        let url = format!("{}/api/v0/product/{}.json", self.base_url, barcode);
        tracing::debug!(%barcode, catalog = self.catalog.host(), "Looking up product");

        let response = self
            .transport
            .send(HttpRequest::get(url).timeout(self.timeout))
            .await?;

        // Missing products may come back as 404 with a regular body
        if !response.is_success() && response.status != 404 {
            return Err(classify_response(
                self.catalog.host(),
                response.status,
                &response.body,
            ));
        }

        match serde_json::from_str::<dto::ProductResponse>(&response.body) {
            Ok(body) => adapter::to_document(body, self.catalog, barcode, &self.language),
            Err(_) if response.status == 404 => Err(classify_response(
                self.catalog.host(),
                response.status,
                &response.body,
            )),
            Err(e) => Err(ClassifiedError::unavailable(format!(
                "Malformed response from {}: {e}",
                self.catalog.host()
            ))
            .with_detail(truncate(&response.body, 200))),
        }
    }
}
