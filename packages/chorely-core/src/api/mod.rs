//! Authenticated request pipeline.
//!
//! Provides the HTTP client for the family task API: request descriptors,
//! bearer authorization, transparent access-token refresh, and endpoint
//! configuration.

mod client;
pub mod config;
pub mod endpoints;
mod error;
mod request;

pub use client::{ApiClient, ApiOutcome};
pub use config::{ApiConfig, ConfigSource, load_api_config};
pub use error::ApiError;
pub use request::{ApiRequest, Method};
