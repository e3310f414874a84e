//! USDA FoodData Central HTTP client
//!
//! Authenticated by an `api_key` query parameter.
//! See: https://fdc.nal.usda.gov/api-guide
//!
//! FoodData Central pages are 1-based; [`SearchQuery`] pages are 0-based,
//! so the page number is shifted by one on the way out.

use std::sync::Arc;
use std::time::Duration;

use super::{adapter, dto};
use crate::nutrition::classify::classify_response;
use crate::nutrition::domain::{
    CODE_OUT_OF_RANGE, ClassifiedError, ProviderId, RawProviderDocument,
};
use crate::nutrition::request::SearchQuery;
use crate::nutrition::transport::{HttpRequest, HttpTransport};

pub const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";
pub const DEFAULT_DATA_TYPE: &str = "Foundation";

/// USDA FoodData Central API client
pub struct UsdaClient {
    api_key: String,
    base_url: String,
    data_type: String,
    transport: Arc<dyn HttpTransport>,
    timeout: Option<Duration>,
}

impl UsdaClient {
    pub fn new(api_key: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            data_type: DEFAULT_DATA_TYPE.to_string(),
            transport,
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Restrict results to a data type (`Foundation`, `SR Legacy`, `Branded`, ...)
    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = data_type.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Search foods by free text
    pub async fn search(&self, query: &SearchQuery) -> Result<RawProviderDocument, ClassifiedError> {
        tracing::debug!(expression = query.expression(), "Searching USDA");

        let page_number = query.page_number().checked_add(1).ok_or_else(|| {
            ClassifiedError::validation(CODE_OUT_OF_RANGE, "page_number is too large")
        })?;

        let request = HttpRequest::get(format!("{}/foods/search", self.base_url))
            .query("api_key", self.api_key.as_str())
            .query("query", query.expression())
            .query("pageSize", query.max_results().to_string())
            .query("pageNumber", page_number.to_string())
            .query("dataType", self.data_type.as_str())
            .timeout(self.timeout);

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            let error = classify_response("USDA", response.status, &response.body);
            tracing::warn!(status = response.status, kind = ?error.kind, "USDA request failed");
            return Err(error);
        }

        match serde_json::from_str::<dto::SearchResponse>(&response.body) {
            Ok(body) => Ok(adapter::to_document(body)),
            Err(e) => {
                tracing::warn!("Unparseable USDA search response, treating as empty: {}", e);
                Ok(RawProviderDocument::empty(ProviderId::Usda))
            }
        }
    }
}
