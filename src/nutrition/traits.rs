//! Trait definitions for nutrition data providers.
//!
//! The orchestrator only sees `dyn ProviderClient`, so tests can substitute
//! mock providers for the real HTTP-backed clients.
//!
//! # Example
//!
//! ```ignore
//! use nutrition::traits::ProviderClient;
//!
//! async fn first_record(provider: &dyn ProviderClient, request: &ProviderRequest) {
//!     let document = provider.call(request).await?;
//!     println!("{} returned {} records", provider.id(), document.records.len());
//! }
//! ```

use async_trait::async_trait;

use super::domain::{ClassifiedError, ProviderId, RawProviderDocument};
use super::request::ProviderRequest;

/// A source of raw product documents.
///
/// Implementations decode the upstream response into a
/// [`RawProviderDocument`] and classify every failure; they never mutate
/// state shared with other providers.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Which provider this is
    fn id(&self) -> ProviderId;

    /// Execute one request against the provider.
    ///
    /// Requests the provider does not serve are reported as `NotFound`.
    async fn call(&self, request: &ProviderRequest) -> Result<RawProviderDocument, ClassifiedError>;

    /// Drop cached credentials so the next call re-authenticates.
    ///
    /// Returns `false` for providers without refreshable credentials.
    fn reset_credentials(&self) -> bool {
        false
    }
}

// Implement the trait for real clients

fn unsupported(provider: ProviderId, request: &ProviderRequest) -> ClassifiedError {
    ClassifiedError::not_found(format!("{provider} does not serve {request}"))
}

#[async_trait]
impl ProviderClient for super::openfoodfacts::OpenFoodFactsClient {
    fn id(&self) -> ProviderId {
        ProviderId::OpenFoodFacts(self.catalog())
    }

    async fn call(&self, request: &ProviderRequest) -> Result<RawProviderDocument, ClassifiedError> {
        match request {
            ProviderRequest::Barcode(barcode) => self.lookup(barcode).await,
            other => Err(unsupported(self.id(), other)),
        }
    }
}

#[async_trait]
impl ProviderClient for super::fatsecret::FatSecretClient {
    fn id(&self) -> ProviderId {
        ProviderId::FatSecret
    }

    async fn call(&self, request: &ProviderRequest) -> Result<RawProviderDocument, ClassifiedError> {
        match request {
            ProviderRequest::Search(query) => self.search(query).await,
            ProviderRequest::FoodDetails(id) => self.food_details(id).await,
            other => Err(unsupported(self.id(), other)),
        }
    }

    fn reset_credentials(&self) -> bool {
        self.invalidate_token();
        true
    }
}

#[async_trait]
impl ProviderClient for super::usda::UsdaClient {
    fn id(&self) -> ProviderId {
        ProviderId::Usda
    }

    async fn call(&self, request: &ProviderRequest) -> Result<RawProviderDocument, ClassifiedError> {
        match request {
            ProviderRequest::Search(query) => self.search(query).await,
            other => Err(unsupported(self.id(), other)),
        }
    }
}
