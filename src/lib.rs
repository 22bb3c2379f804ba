//! # FreshBooks Client
//!
//! A thin client for the FreshBooks accounting API.
//!
//! ## Features
//!
//! - OAuth2 authorization code exchange and token refresh against the
//!   FreshBooks token endpoint, including its JSON body quirk
//! - Optional `update_token` hook to persist refreshed tokens
//! - Loading the authenticated user and activating one of their businesses
//! - Account scoped accessors for reports, clients and currencies
//! - Async ([`application::client::Client`]) and blocking
//!   ([`application::blocking::BlockingClient`]) variants with the same contract
//!
//! ## Example
//!
//! ```ignore
//! use freshbooks_client::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     setup_logger();
//!     let client = Client::new(Config::from_env())?
//!         .with_update_token(|token, _| println!("persist {}", token.access_token));
//!
//!     let auth = client.authorization_url(None)?;
//!     println!("visit {}", auth.url);
//!
//!     client.fetch_access_token("https://my.app/callback?code=...").await?;
//!     client.set_active_business("6f9b8c2e-...").await?;
//!     println!("{:?}", client.get_currencies().await?);
//!     Ok(())
//! }
//! ```

/// Application layer: configuration, token flow, session state and clients
pub mod application;
/// Global constants
pub mod constants;
/// Error types
pub mod error;
/// Data models
pub mod model;
/// Convenient re-exports
pub mod prelude;
/// Helpers: environment, logging, OAuth state, masking
pub mod utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
#[must_use]
pub fn version() -> &'static str {
    VERSION
}
