//! Nutrition aggregation module - looks up products and nutrient facts across public food databases.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Internal types that represent our business logic
//! - **API DTOs** (`openfoodfacts/dto.rs`, `fatsecret/dto.rs`, `usda/dto.rs`) - Exact API response shapes
//! - **Adapters** - Convert DTOs to raw provider documents
//! - **Clients** - HTTP clients for external APIs, behind [`traits::ProviderClient`]
//! - **Token** - Single-flight OAuth2 token cache for FatSecret
//! - **Normalize / Merge** - Canonical nutrient keys and localized text fields
//! - **Service** - Provider chains with fallback
//!
//! Every provider failure is classified into an [`domain::ErrorKind`] at the
//! client boundary. The service decides fallback on kinds alone, never on
//! message text.
//!
//! # Usage
//!
//! ```ignore
//! use nutrition::{Aggregator, ReqwestTransport};
//!
//! let transport = Arc::new(ReqwestTransport::new()?);
//! let aggregator = Aggregator::from_config(&config::load(), transport);
//!
//! let product = aggregator.lookup_barcode("4601234567890").await?;
//! println!("{:?} from {}", product.name().primary, product.source());
//! ```

pub mod classify;
pub mod domain;
pub mod fatsecret;
pub mod merge;
pub mod normalize;
pub mod openfoodfacts;
pub mod request;
pub mod service;
pub mod token;
pub mod traits;
pub mod transport;
pub mod usda;

pub use domain::{ClassifiedError, ErrorKind, NormalizedProduct, NutrientKey, ProviderId};
pub use request::{ProviderRequest, SearchQuery};
pub use service::{Aggregation, Aggregator, AggregatorConfig, ProviderChains};
pub use transport::ReqwestTransport;
