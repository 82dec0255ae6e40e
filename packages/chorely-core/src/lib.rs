//! Chorely Core Library
//!
//! This crate provides the client side of the Chorely family task service:
//! - Authenticated request pipeline (bearer auth, transparent token refresh)
//! - Session store, token expiry check and navigation signal
//! - Typed calls for children, task templates, bundles, assignments and task instances
//! - Session persistence (file storage, optional keyring)
//!
//! # Features
//!
//! - `keyring-storage`: Use the platform keyring for session storage, with file fallback
//!
//! # Example
//!
//! ```no_run
//! use chorely_core::api::{self, ApiClient, ApiOutcome};
//! use chorely_core::auth::SessionStore;
//! use chorely_core::models::LoginRequest;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = api::load_api_config();
//!     let client = ApiClient::new(&config, SessionStore::new())?
//!         .with_navigation(|| eprintln!("Please sign in again"));
//!
//!     client
//!         .login(&LoginRequest {
//!             email: "parent@example.com".into(),
//!             password: "secret".into(),
//!         })
//!         .await?;
//!
//!     match client.task_instances_by_children(None).await? {
//!         ApiOutcome::Ok(resp) => println!("{} children", resp.data.len()),
//!         ApiOutcome::SessionExpired => println!("Session expired"),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use api::{ApiClient, ApiConfig, ApiError, ApiOutcome, ApiRequest, ConfigSource, Method};
pub use auth::{JwtExpiryCheck, NavigationSignal, Session, SessionStore, TokenExpiryCheck};
pub use services::ApiResult;
