//! Aggregation service - routes lookups through provider chains
//!
//! This is the high-level API for product data:
//! 1. Pick the provider chain for the request (barcode, search, food details)
//! 2. Call providers in order, falling back on `NotFound`/`UpstreamUnavailable`
//! 3. Normalize nutrients and merge localized fields of the winning document
//!
//! Attempts are strictly sequential. Validation, auth and unknown failures
//! stop the chain immediately; an auth failure from a provider with
//! refreshable credentials is retried once first.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use super::domain::{
    Catalog, ClassifiedError, ErrorKind, NormalizedProduct, ProductParts, ProviderId, RawRecord,
    RawProviderDocument,
};
use super::fatsecret::FatSecretClient;
use super::merge::merge_variants;
use super::normalize::normalize;
use super::openfoodfacts::OpenFoodFactsClient;
use super::request::{Barcode, FoodId, ProviderRequest, SearchQuery};
use super::token::{OAuthCredentials, TokenCache};
use super::traits::ProviderClient;
use super::transport::HttpTransport;
use super::usda::UsdaClient;
use crate::config::Config;

/// Configuration for the aggregation service
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Upper bound for a single provider call
    pub call_timeout: Duration,
    /// Pause before retrying a provider whose credentials were rejected
    pub auth_retry_backoff: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(10),
            auth_retry_backoff: Duration::from_millis(250),
        }
    }
}

/// Ordered providers for each kind of request
#[derive(Clone, Default)]
pub struct ProviderChains {
    /// Barcodes with a Russian GS1 prefix
    pub russian_barcode: Vec<Arc<dyn ProviderClient>>,
    pub barcode: Vec<Arc<dyn ProviderClient>>,
    pub search: Vec<Arc<dyn ProviderClient>>,
    pub food_details: Vec<Arc<dyn ProviderClient>>,
}

impl ProviderChains {
    fn for_request(&self, request: &ProviderRequest) -> &[Arc<dyn ProviderClient>] {
        match request {
            ProviderRequest::Barcode(barcode) if barcode.is_russian() => &self.russian_barcode,
            ProviderRequest::Barcode(_) => &self.barcode,
            ProviderRequest::Search(_) => &self.search,
            ProviderRequest::FoodDetails(_) => &self.food_details,
        }
    }
}

/// Outcome of a successful aggregation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregation {
    pub source: ProviderId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    pub products: Vec<NormalizedProduct>,
}

impl Aggregation {
    /// The single product of a barcode or food lookup
    pub fn into_product(self) -> Result<NormalizedProduct, ClassifiedError> {
        let source = self.source;
        self.products
            .into_iter()
            .next()
            .ok_or_else(|| ClassifiedError::not_found(format!("{source} returned no product")))
    }
}

/// Service for looking up products across providers
pub struct Aggregator {
    chains: ProviderChains,
    config: AggregatorConfig,
}

impl Aggregator {
    pub fn new(chains: ProviderChains, config: AggregatorConfig) -> Self {
        Self { chains, config }
    }

    /// Build the standard provider chains from application config.
    ///
    /// Text-search providers without credentials are left out of the chain.
    pub fn from_config(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        let timeout = Duration::from_secs(config.network.timeout_secs);
        let providers = &config.providers;

        let open_food_facts = |catalog: Catalog, base_url: &str| -> Arc<dyn ProviderClient> {
            Arc::new(
                OpenFoodFactsClient::new(catalog, Arc::clone(&transport))
                    .with_base_url(base_url)
                    .with_language(providers.language.as_str())
                    .with_timeout(timeout),
            )
        };
        let russia = open_food_facts(Catalog::Russia, &providers.off_russia_url);
        let world = open_food_facts(Catalog::World, &providers.off_world_url);

        let mut chains = ProviderChains {
            russian_barcode: vec![russia, Arc::clone(&world)],
            barcode: vec![world],
            ..Default::default()
        };

        match config.credentials.fatsecret() {
            Some((client_id, client_secret)) => {
                let credentials = OAuthCredentials {
                    token_url: providers.fatsecret_token_url.clone(),
                    client_id: client_id.to_string(),
                    client_secret: client_secret.to_string(),
                    scope: providers.fatsecret_scope.clone(),
                };
                let tokens = Arc::new(
                    TokenCache::new(credentials, Arc::clone(&transport)).with_timeout(timeout),
                );
                let fatsecret: Arc<dyn ProviderClient> = Arc::new(
                    FatSecretClient::new(tokens, Arc::clone(&transport))
                        .with_api_url(providers.fatsecret_api_url.as_str())
                        .with_timeout(timeout),
                );
                chains.search.push(Arc::clone(&fatsecret));
                chains.food_details.push(fatsecret);
            }
            None => tracing::warn!("FatSecret credentials not configured, skipping FatSecret"),
        }

        match config.credentials.usda() {
            Some(api_key) => chains.search.push(Arc::new(
                UsdaClient::new(api_key, Arc::clone(&transport))
                    .with_base_url(providers.usda_base_url.as_str())
                    .with_data_type(providers.usda_data_type.as_str())
                    .with_timeout(timeout),
            )),
            None => tracing::warn!("USDA API key not configured, skipping USDA"),
        }

        Self::new(
            chains,
            AggregatorConfig {
                call_timeout: timeout,
                auth_retry_backoff: Duration::from_millis(config.network.auth_retry_backoff_ms),
            },
        )
    }

    /// Look up a product by barcode
    pub async fn lookup_barcode(&self, barcode: &str) -> Result<NormalizedProduct, ClassifiedError> {
        let barcode = Barcode::parse(barcode)?;
        tracing::info!(%barcode, russian = barcode.is_russian(), "Looking up barcode");
        self.aggregate(&ProviderRequest::Barcode(barcode))
            .await?
            .into_product()
    }

    /// Search products by free text
    pub async fn search(&self, query: SearchQuery) -> Result<Aggregation, ClassifiedError> {
        tracing::info!(expression = query.expression(), "Searching products");
        self.aggregate(&ProviderRequest::Search(query)).await
    }

    /// Fetch a single food by its FatSecret id
    pub async fn food_details(&self, food_id: &str) -> Result<NormalizedProduct, ClassifiedError> {
        let food_id = FoodId::parse(food_id)?;
        self.aggregate(&ProviderRequest::FoodDetails(food_id))
            .await?
            .into_product()
    }

    /// Run a request through its provider chain
    pub async fn aggregate(&self, request: &ProviderRequest) -> Result<Aggregation, ClassifiedError> {
        let chain = self.chains.for_request(request);
        if chain.is_empty() {
            return Err(ClassifiedError::unavailable(format!(
                "No provider configured for {request}"
            )));
        }

        let mut all_not_found = true;
        let mut last_error: Option<ClassifiedError> = None;

        for provider in chain {
            match self.attempt(provider.as_ref(), request).await {
                Ok(document) => {
                    tracing::info!(
                        provider = %provider.id(),
                        records = document.records.len(),
                        "Aggregation succeeded"
                    );
                    return Ok(build_aggregation(document));
                }
                Err(error) if error.is_fallbackable() => {
                    tracing::warn!(
                        provider = %provider.id(),
                        kind = ?error.kind,
                        "{}, trying next provider",
                        error
                    );
                    all_not_found &= error.kind == ErrorKind::NotFound;
                    last_error = Some(error);
                }
                Err(error) => {
                    tracing::error!(provider = %provider.id(), kind = ?error.kind, "{}", error);
                    return Err(error);
                }
            }
        }

        let error = if all_not_found {
            ClassifiedError::not_found(format!("Product not found for {request}"))
        } else {
            ClassifiedError::unavailable(format!("All providers failed for {request}"))
        };
        Err(match last_error {
            Some(last) => error.with_detail(last.to_string()),
            None => error,
        })
    }

    /// One provider attempt, with a single retry after a credential reset
    async fn attempt(
        &self,
        provider: &dyn ProviderClient,
        request: &ProviderRequest,
    ) -> Result<RawProviderDocument, ClassifiedError> {
        let result = match self.call_with_timeout(provider, request).await {
            Err(error) if error.kind == ErrorKind::Auth && provider.reset_credentials() => {
                tracing::info!(
                    provider = %provider.id(),
                    "Credentials rejected, retrying once with fresh credentials"
                );
                tokio::time::sleep(self.config.auth_retry_backoff).await;
                self.call_with_timeout(provider, request).await
            }
            other => other,
        };

        let document = result?;
        if request.expects_record() && document.records.is_empty() {
            return Err(ClassifiedError::not_found(format!(
                "{} has no record for {request}",
                provider.id()
            )));
        }
        Ok(document)
    }

    async fn call_with_timeout(
        &self,
        provider: &dyn ProviderClient,
        request: &ProviderRequest,
    ) -> Result<RawProviderDocument, ClassifiedError> {
        tokio::time::timeout(self.config.call_timeout, provider.call(request))
            .await
            .map_err(|_| {
                ClassifiedError::unavailable(format!(
                    "{} did not respond within {:?}",
                    provider.id(),
                    self.config.call_timeout
                ))
            })?
    }
}

fn build_aggregation(document: RawProviderDocument) -> Aggregation {
    let source = document.provider;
    Aggregation {
        source,
        total_results: document.total_results,
        page_number: document.page_number,
        products: document
            .records
            .into_iter()
            .map(|record| build_product(record, source))
            .collect(),
    }
}

fn build_product(record: RawRecord, source: ProviderId) -> NormalizedProduct {
    let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
    NormalizedProduct::new(
        ProductParts {
            name: merge_variants(&record.name),
            ingredients: merge_variants(&record.ingredients),
            categories: merge_variants(&record.categories),
            nutrients: normalize(source, &record.nutrients),
            barcode: record.identifier,
            brand: non_blank(record.brand),
            quantity: non_blank(record.quantity),
            nutriscore: non_blank(record.nutriscore),
            ecoscore: non_blank(record.ecoscore),
        },
        source,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::domain::NutrientKey;
    use crate::nutrition::traits::mocks::{MockProvider, document};
    use crate::nutrition::transport::mocks::ScriptedTransport;
    use crate::test_utils::{
        FATSECRET_SEARCH, OFF_MILK, OFF_NOT_FOUND, TOKEN_OK, USDA_SEARCH, test_token_cache,
    };

    const RU: ProviderId = ProviderId::OpenFoodFacts(Catalog::Russia);
    const WORLD: ProviderId = ProviderId::OpenFoodFacts(Catalog::World);

    fn fast_config() -> AggregatorConfig {
        AggregatorConfig {
            call_timeout: Duration::from_secs(5),
            auth_retry_backoff: Duration::from_millis(1),
        }
    }

    fn barcode_aggregator(first: Arc<MockProvider>, second: Arc<MockProvider>) -> Aggregator {
        Aggregator::new(
            ProviderChains {
                russian_barcode: vec![first as Arc<dyn ProviderClient>, second],
                ..Default::default()
            },
            fast_config(),
        )
    }

    fn search_aggregator(providers: Vec<Arc<dyn ProviderClient>>) -> Aggregator {
        Aggregator::new(
            ProviderChains {
                search: providers,
                ..Default::default()
            },
            fast_config(),
        )
    }

    fn search_request() -> SearchQuery {
        SearchQuery::new("chicken breast").unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_stops_chain() {
        let first = Arc::new(MockProvider::with_error(
            RU,
            ClassifiedError::validation(107, "bad parameter"),
        ));
        let second = Arc::new(MockProvider::with_record(WORLD, "Milk"));
        let aggregator = barcode_aggregator(Arc::clone(&first), Arc::clone(&second));

        let err = aggregator.lookup_barcode("4601234567890").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_error_stops_chain() {
        let first = Arc::new(MockProvider::with_error(
            RU,
            ClassifiedError::new(ErrorKind::Unknown, "HTTP 418"),
        ));
        let second = Arc::new(MockProvider::with_record(WORLD, "Milk"));
        let aggregator = barcode_aggregator(Arc::clone(&first), Arc::clone(&second));

        let err = aggregator.lookup_barcode("4601234567890").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unknown);
        assert_eq!(err.status_pair(), (500, 500));
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_barcode_calls_nothing() {
        let first = Arc::new(MockProvider::with_record(RU, "Milk"));
        let second = Arc::new(MockProvider::with_record(WORLD, "Milk"));
        let aggregator = barcode_aggregator(Arc::clone(&first), Arc::clone(&second));

        let err = aggregator.lookup_barcode("46012").await.unwrap_err();
        assert_eq!(err.status_pair(), (107, 400));
        assert_eq!(first.calls() + second.calls(), 0);
    }

    #[tokio::test]
    async fn test_not_found_falls_back_exactly_once() {
        let first = Arc::new(MockProvider::with_error(RU, ClassifiedError::not_found("nope")));
        let second = Arc::new(MockProvider::with_record(WORLD, "Milk"));
        let aggregator = barcode_aggregator(Arc::clone(&first), Arc::clone(&second));

        let product = aggregator.lookup_barcode("4601234567890").await.unwrap();
        assert_eq!(product.source(), WORLD);
        assert_eq!(product.name().primary.as_deref(), Some("Milk"));
        assert_eq!(product.nutrient(NutrientKey::Calories), Some(100.0));
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_barcode_document_falls_back() {
        let first = Arc::new(MockProvider::empty(RU));
        let second = Arc::new(MockProvider::with_record(WORLD, "Milk"));
        let aggregator = barcode_aggregator(Arc::clone(&first), Arc::clone(&second));

        let product = aggregator.lookup_barcode("4601234567890").await.unwrap();
        assert_eq!(product.source(), WORLD);
    }

    #[tokio::test]
    async fn test_unavailable_falls_back() {
        let first = Arc::new(MockProvider::with_error(RU, ClassifiedError::unavailable("503")));
        let second = Arc::new(MockProvider::with_record(WORLD, "Milk"));
        let aggregator = barcode_aggregator(first, second);

        assert!(aggregator.lookup_barcode("4601234567890").await.is_ok());
    }

    #[tokio::test]
    async fn test_exhausted_with_only_not_found_is_not_found() {
        let first = Arc::new(MockProvider::with_error(RU, ClassifiedError::not_found("a")));
        let second = Arc::new(MockProvider::empty(WORLD));
        let aggregator = barcode_aggregator(first, second);

        let err = aggregator.lookup_barcode("4601234567890").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.status_pair(), (404, 404));
    }

    #[tokio::test]
    async fn test_exhausted_with_any_unavailable_is_unavailable() {
        let first = Arc::new(MockProvider::with_error(RU, ClassifiedError::unavailable("down")));
        let second = Arc::new(MockProvider::with_error(WORLD, ClassifiedError::not_found("b")));
        let aggregator = barcode_aggregator(first, second);

        let err = aggregator.lookup_barcode("4601234567890").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::UpstreamUnavailable);
        assert!(err.upstream_detail.is_some());
    }

    #[tokio::test]
    async fn test_auth_error_retries_once_after_reset() {
        let fatsecret = Arc::new(
            MockProvider::with_error(ProviderId::FatSecret, ClassifiedError::auth("expired"))
                .then(Ok(document(ProviderId::FatSecret, "Chicken")))
                .refreshable(),
        );
        let usda = Arc::new(MockProvider::with_record(ProviderId::Usda, "Chicken"));
        let aggregator = search_aggregator(vec![fatsecret.clone() as Arc<dyn ProviderClient>, usda.clone()]);

        let aggregation = aggregator.search(search_request()).await.unwrap();
        assert_eq!(aggregation.source, ProviderId::FatSecret);
        assert_eq!(fatsecret.calls(), 2);
        assert_eq!(fatsecret.resets(), 1);
        assert_eq!(usda.calls(), 0);
    }

    #[tokio::test]
    async fn test_persistent_auth_error_propagates() {
        let fatsecret = Arc::new(
            MockProvider::with_error(ProviderId::FatSecret, ClassifiedError::auth("bad creds"))
                .refreshable(),
        );
        let usda = Arc::new(MockProvider::with_record(ProviderId::Usda, "Chicken"));
        let aggregator = search_aggregator(vec![fatsecret.clone() as Arc<dyn ProviderClient>, usda.clone()]);

        let err = aggregator.search(search_request()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Auth);
        assert_eq!(fatsecret.calls(), 2);
        assert_eq!(usda.calls(), 0);
    }

    #[tokio::test]
    async fn test_auth_error_without_refreshable_credentials_is_not_retried() {
        let usda = Arc::new(MockProvider::with_error(
            ProviderId::Usda,
            ClassifiedError::auth("bad key"),
        ));
        let aggregator = search_aggregator(vec![usda.clone() as Arc<dyn ProviderClient>]);

        let err = aggregator.search(search_request()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Auth);
        assert_eq!(usda.calls(), 1);
    }

    #[tokio::test]
    async fn test_slow_provider_times_out_and_falls_back() {
        let slow = Arc::new(
            MockProvider::with_record(ProviderId::FatSecret, "Chicken")
                .with_delay(Duration::from_millis(500)),
        );
        let usda = Arc::new(MockProvider::with_record(ProviderId::Usda, "Chicken"));
        let aggregator = Aggregator::new(
            ProviderChains {
                search: vec![slow.clone() as Arc<dyn ProviderClient>, usda.clone()],
                ..Default::default()
            },
            AggregatorConfig {
                call_timeout: Duration::from_millis(20),
                auth_retry_backoff: Duration::from_millis(1),
            },
        );

        let aggregation = aggregator.search(search_request()).await.unwrap();
        assert_eq!(aggregation.source, ProviderId::Usda);
        assert_eq!(slow.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_search_is_success_without_fallback() {
        let fatsecret = Arc::new(MockProvider::empty(ProviderId::FatSecret));
        let usda = Arc::new(MockProvider::with_record(ProviderId::Usda, "Rice"));
        let aggregator = search_aggregator(vec![fatsecret as Arc<dyn ProviderClient>, usda.clone()]);

        let aggregation = aggregator.search(search_request()).await.unwrap();
        assert_eq!(aggregation.source, ProviderId::FatSecret);
        assert!(aggregation.products.is_empty());
        assert_eq!(usda.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_chain_is_unavailable() {
        let aggregator = search_aggregator(Vec::new());
        let err = aggregator.search(search_request()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::UpstreamUnavailable);
    }

    #[tokio::test]
    async fn test_barcode_fallback_end_to_end() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route("ru.openfoodfacts.org", 200, OFF_NOT_FOUND)
                .route("world.openfoodfacts.org", 200, OFF_MILK),
        );
        let aggregator = Aggregator::from_config(&Config::default(), transport.clone());

        let product = aggregator.lookup_barcode("4601234567890").await.unwrap();
        assert_eq!(product.name().primary.as_deref(), Some("Молоко"));
        assert_eq!(product.name().secondary.as_deref(), Some("Milk"));
        assert_eq!(product.source(), WORLD);
        assert_eq!(product.nutrient(NutrientKey::Protein), Some(3.2));
        assert_eq!(product.nutrient(NutrientKey::Carbohydrates), None);
        assert_eq!(transport.hits("ru.openfoodfacts.org"), 1);
        assert_eq!(transport.hits("world.openfoodfacts.org"), 1);

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["name"], "Молоко");
        assert_eq!(json["nameCanonical"], "Milk");
        assert_eq!(json["source"], "world.openfoodfacts.org");
    }

    #[tokio::test]
    async fn test_mistyped_product_field_is_dropped_end_to_end() {
        let body = r#"{"code":"3017620422003","status":1,"product":{
            "product_name":"Nutella",
            "quantity":1000,
            "nutriments":{"energy-kcal_100g":539}
        }}"#;
        let transport = Arc::new(ScriptedTransport::new().route("world.openfoodfacts.org", 200, body));
        let aggregator = Aggregator::from_config(&Config::default(), transport);

        let product = aggregator.lookup_barcode("3017620422003").await.unwrap();
        assert_eq!(product.name().primary.as_deref(), Some("Nutella"));
        assert_eq!(product.nutrient(NutrientKey::Calories), Some(539.0));
        assert!(serde_json::to_value(&product).unwrap().get("quantity").is_none());
    }

    #[tokio::test]
    async fn test_non_russian_barcode_skips_russian_catalog() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route("ru.openfoodfacts.org", 200, OFF_MILK)
                .route("world.openfoodfacts.org", 200, OFF_MILK),
        );
        let aggregator = Aggregator::from_config(&Config::default(), transport.clone());

        aggregator.lookup_barcode("3017620422003").await.unwrap();
        assert_eq!(transport.hits("ru.openfoodfacts.org"), 0);
        assert_eq!(transport.hits("world.openfoodfacts.org"), 1);
    }

    #[tokio::test]
    async fn test_search_with_expired_token_end_to_end() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route("/connect/token", 200, TOKEN_OK)
                .route("server.api", 200, FATSECRET_SEARCH),
        );
        let tokens = test_token_cache(transport.clone());
        tokens.seed("expired-token", Duration::from_secs(10));
        let fatsecret = Arc::new(FatSecretClient::new(tokens, transport.clone()));
        let aggregator = search_aggregator(vec![fatsecret as Arc<dyn ProviderClient>]);

        let aggregation = aggregator.search(search_request()).await.unwrap();
        assert_eq!(transport.hits("/connect/token"), 1);
        assert_eq!(transport.hits("server.api"), 1);
        assert_eq!(aggregation.source, ProviderId::FatSecret);
        assert_eq!(aggregation.total_results, Some(2));
        assert!(!aggregation.products.is_empty());

        let first = &aggregation.products[0];
        assert_eq!(first.nutrient(NutrientKey::Calories), Some(165.0));
        assert_eq!(first.nutrient(NutrientKey::Protein), Some(31.02));
        assert_eq!(first.nutrient(NutrientKey::Carbohydrates), Some(0.0));
        assert_eq!(aggregation.products[1].nutrient(NutrientKey::Fat), Some(2.5));
    }

    #[tokio::test]
    async fn test_from_config_skips_providers_without_credentials() {
        let transport = Arc::new(ScriptedTransport::new());

        let bare = Aggregator::from_config(&Config::default(), transport.clone());
        assert!(bare.chains.search.is_empty());
        assert!(bare.chains.food_details.is_empty());
        assert_eq!(bare.chains.russian_barcode.len(), 2);
        assert_eq!(bare.chains.barcode.len(), 1);

        let mut config = Config::default();
        config.credentials.fatsecret_client_id = Some("id".to_string());
        config.credentials.fatsecret_client_secret = Some("secret".to_string());
        config.credentials.usda_api_key = Some("key".to_string());
        let full = Aggregator::from_config(&config, transport);
        let ids: Vec<ProviderId> = full.chains.search.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![ProviderId::FatSecret, ProviderId::Usda]);
        assert_eq!(full.chains.food_details.len(), 1);
    }

    #[tokio::test]
    async fn test_usda_search_after_fatsecret_outage() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .route("/connect/token", 200, TOKEN_OK)
                .route("server.api", 503, "Service Unavailable")
                .route("/foods/search", 200, USDA_SEARCH),
        );
        let mut config = Config::default();
        config.credentials.fatsecret_client_id = Some("id".to_string());
        config.credentials.fatsecret_client_secret = Some("secret".to_string());
        config.credentials.usda_api_key = Some("key".to_string());
        let aggregator = Aggregator::from_config(&config, transport);

        let aggregation = aggregator.search(search_request()).await.unwrap();
        assert_eq!(aggregation.source, ProviderId::Usda);
        let product = &aggregation.products[0];
        assert_eq!(product.barcode(), "171077");
        assert_eq!(product.nutrient(NutrientKey::Calories), Some(165.0));
        assert_eq!(serde_json::to_value(product).unwrap()["categories"], "Poultry Products");
    }
}
