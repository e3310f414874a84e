//! FatSecret Platform API integration
//!
//! FatSecret offers text search over a large food database, including
//! branded and regional products. Calls require an OAuth2 access token.
//! API docs: https://platform.fatsecret.com/docs/

mod adapter;
mod client;
pub mod dto;

pub use client::{DEFAULT_API_URL, FatSecretClient};
