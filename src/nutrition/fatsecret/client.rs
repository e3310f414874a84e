//! FatSecret Platform API client
//!
//! Every call carries a bearer token from the shared [`TokenCache`].
//! See: https://platform.fatsecret.com/docs/guides/authentication/oauth2
//!
//! ## API Quirks
//!
//! ### Errors inside successful responses
//! Invalid tokens, missing scopes and bad parameters are usually reported as
//! `{"error": {"code": N, "message": "..."}}` with HTTP 200. The body is
//! checked for that envelope before anything else.
//!
//! ### Unparseable successes
//! A 2xx body that decodes neither as a result nor as an error is treated
//! as "no results" rather than a failure.

use std::sync::Arc;
use std::time::Duration;

use super::{adapter, dto};
use crate::nutrition::classify::classify_response;
use crate::nutrition::domain::{ClassifiedError, ProviderId, RawProviderDocument};
use crate::nutrition::request::{FoodId, SearchQuery};
use crate::nutrition::token::TokenCache;
use crate::nutrition::transport::{HttpRequest, HttpResponse, HttpTransport};

/// Production REST endpoint
pub const DEFAULT_API_URL: &str = "https://platform.fatsecret.com/rest/server.api";

const PROVIDER: &str = "FatSecret";

/// FatSecret API client
pub struct FatSecretClient {
    api_url: String,
    tokens: Arc<TokenCache>,
    transport: Arc<dyn HttpTransport>,
    timeout: Option<Duration>,
}

impl FatSecretClient {
    pub fn new(tokens: Arc<TokenCache>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            tokens,
            transport,
            timeout: None,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Search foods by free text (`foods.search`)
    pub async fn search(&self, query: &SearchQuery) -> Result<RawProviderDocument, ClassifiedError> {
        tracing::debug!(
            expression = query.expression(),
            max_results = query.max_results(),
            page_number = query.page_number(),
            "Searching FatSecret"
        );

        let mut request = HttpRequest::get(&self.api_url)
            .query("method", "foods.search")
            .query("search_expression", query.expression())
            .query("max_results", query.max_results().to_string())
            .query("page_number", query.page_number().to_string())
            .query("format", "json")
            .query("region", query.region());
        if let Some(language) = query.language() {
            request = request.query("language", language);
        }

        let response = self.send(request).await?;
        match serde_json::from_str::<dto::SearchResponse>(&response.body) {
            Ok(body) if body.error.is_some() => {
                Err(classify_response(PROVIDER, response.status, &response.body))
            }
            Ok(body) => Ok(adapter::to_search_document(body)),
            Err(e) => {
                tracing::warn!("Unparseable FatSecret search response, treating as empty: {}", e);
                Ok(RawProviderDocument::empty(ProviderId::FatSecret))
            }
        }
    }

    /// Fetch a single food with its servings (`food.get`)
    pub async fn food_details(&self, id: &FoodId) -> Result<RawProviderDocument, ClassifiedError> {
        tracing::debug!(food_id = id.as_str(), "Fetching FatSecret food");

        let request = HttpRequest::get(&self.api_url)
            .query("method", "food.get")
            .query("food_id", id.as_str())
            .query("format", "json");

        let response = self.send(request).await?;
        match serde_json::from_str::<dto::FoodResponse>(&response.body) {
            Ok(body) if body.error.is_some() => {
                Err(classify_response(PROVIDER, response.status, &response.body))
            }
            Ok(body) => Ok(adapter::to_food_document(body)),
            Err(e) => {
                tracing::warn!("Unparseable FatSecret food response, treating as empty: {}", e);
                Ok(RawProviderDocument::empty(ProviderId::FatSecret))
            }
        }
    }

    /// Forget the cached access token
    pub fn invalidate_token(&self) {
        self.tokens.invalidate();
    }

    /// Authenticate and send; non-2xx statuses become classified errors
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClassifiedError> {
        let token = self.tokens.get_valid_token().await?;
        let request = request
            .bearer(token.as_str())
            .header("Accept", "application/json")
            .timeout(self.timeout);

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            let error = classify_response(PROVIDER, response.status, &response.body);
            tracing::warn!(status = response.status, kind = ?error.kind, "FatSecret request failed");
            return Err(error);
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::domain::ErrorKind;
    use crate::nutrition::transport::mocks::ScriptedTransport;
    use crate::test_utils::{
        FATSECRET_FOOD, FATSECRET_INVALID_TOKEN, FATSECRET_SEARCH, TOKEN_OK, test_token_cache,
    };

    fn client(transport: Arc<ScriptedTransport>) -> FatSecretClient {
        FatSecretClient::new(test_token_cache(transport.clone()), transport)
    }

    fn query() -> SearchQuery {
        SearchQuery::new("chicken breast").unwrap()
    }

    #[tokio::test]
    async fn test_search_sends_bearer_and_parameters() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route("/connect/token", 200, TOKEN_OK)
                .route("server.api", 200, FATSECRET_SEARCH),
        );
        let query = query().with_language(Some("ru".into())).with_region("RU");

        let document = client(Arc::clone(&transport)).search(&query).await.unwrap();
        assert_eq!(document.records.len(), 2);

        let requests = transport.requests();
        let search = requests.iter().find(|r| r.url.contains("server.api")).unwrap();
        assert_eq!(search.query_value("method"), Some("foods.search"));
        assert_eq!(search.query_value("search_expression"), Some("chicken breast"));
        assert_eq!(search.query_value("max_results"), Some("20"));
        assert_eq!(search.query_value("page_number"), Some("0"));
        assert_eq!(search.query_value("format"), Some("json"));
        assert_eq!(search.query_value("region"), Some("RU"));
        assert_eq!(search.query_value("language"), Some("ru"));
        assert!(
            search
                .headers
                .contains(&("Authorization".to_string(), "Bearer fresh-token".to_string()))
        );
    }

    #[tokio::test]
    async fn test_language_omitted_when_unset() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route("/connect/token", 200, TOKEN_OK)
                .route("server.api", 200, FATSECRET_SEARCH),
        );
        client(Arc::clone(&transport)).search(&query()).await.unwrap();

        let requests = transport.requests();
        let search = requests.iter().find(|r| r.url.contains("server.api")).unwrap();
        assert_eq!(search.query_value("language"), None);
    }

    #[tokio::test]
    async fn test_error_envelope_on_200_is_classified() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route("/connect/token", 200, TOKEN_OK)
                .route("server.api", 200, FATSECRET_INVALID_TOKEN),
        );
        let err = client(transport).search(&query()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Auth);
        assert_eq!(err.api_code, Some(13));
    }

    #[tokio::test]
    async fn test_malformed_success_is_empty_result() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route("/connect/token", 200, TOKEN_OK)
                .route("server.api", 200, "<html>oops</html>"),
        );
        let document = client(transport).search(&query()).await.unwrap();
        assert!(document.records.is_empty());
        assert_eq!(document.total_results, Some(0));
    }

    #[tokio::test]
    async fn test_http_error_is_classified() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route("/connect/token", 200, TOKEN_OK)
                .route("server.api", 502, "bad gateway"),
        );
        let err = client(transport).search(&query()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::UpstreamUnavailable);
    }

    #[tokio::test]
    async fn test_token_failure_skips_search() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route("/connect/token", 401, r#"{"error":"invalid_client"}"#)
                .route("server.api", 200, FATSECRET_SEARCH),
        );
        let err = client(Arc::clone(&transport)).search(&query()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Auth);
        assert_eq!(transport.hits("server.api"), 0);
    }

    #[tokio::test]
    async fn test_food_details() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route("/connect/token", 200, TOKEN_OK)
                .route("server.api", 200, FATSECRET_FOOD),
        );
        let id = FoodId::parse("33691").unwrap();
        let document = client(Arc::clone(&transport)).food_details(&id).await.unwrap();
        assert_eq!(document.records.len(), 1);

        let requests = transport.requests();
        let get = requests.iter().find(|r| r.url.contains("server.api")).unwrap();
        assert_eq!(get.query_value("method"), Some("food.get"));
        assert_eq!(get.query_value("food_id"), Some("33691"));
    }

    #[tokio::test]
    async fn test_invalidate_token_forces_new_token() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route("/connect/token", 200, TOKEN_OK)
                .route("server.api", 200, FATSECRET_SEARCH),
        );
        let client = client(Arc::clone(&transport));

        client.search(&query()).await.unwrap();
        client.invalidate_token();
        client.search(&query()).await.unwrap();
        assert_eq!(transport.hits("/connect/token"), 2);
    }
}
