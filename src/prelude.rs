//! # FreshBooks Client Prelude
//!
//! Commonly used types and traits in one import.
//!
//! ```rust
//! use freshbooks_client::prelude::*;
//!
//! let config = Config::new("client-id", "client-secret", "https://my.app/callback");
//! assert_eq!(config.rest_api.base_url, BASE_URL);
//! ```

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Client configuration
pub use crate::application::config::{Config, Credentials, RestApiConfig};

/// Library version information
pub use crate::{VERSION, version};

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Main error type for the library
pub use crate::error::{AppError, AppResult};

// ============================================================================
// CLIENTS
// ============================================================================

/// Async client
pub use crate::application::client::Client;

/// Blocking client
pub use crate::application::blocking::BlockingClient;

/// Accounting service traits implemented by the async and blocking clients
pub use crate::application::interfaces::accounting::{AccountingService, BlockingAccountingService};

/// Token flow helpers
pub use crate::application::auth::{AuthorizationRequest, TokenManager, UpdateTokenHook};

/// Session state
pub use crate::application::session::SessionState;

// ============================================================================
// MODELS
// ============================================================================

/// OAuth models
pub use crate::model::auth::{OAuthToken, TokenGrant, TokenRequest};

/// Token endpoint authentication
pub use crate::model::signing::{
    ClientCredentials, ClientSecretPost, FreshBooksJsonAuth, TokenAuthMethod,
};

/// Identity models
pub use crate::model::identity::{AccountId, Business, BusinessMembership, Identity, Role};

/// Active business context
pub use crate::model::context::BusinessContext;

/// Resource endpoints
pub use crate::model::requests::{QueryParams, Report};

// ============================================================================
// UTILITIES
// ============================================================================

/// Logging utilities
pub use crate::utils::logger::setup_logger;

/// Global constants
pub use crate::constants::*;

/// Re-export commonly used external types
pub use serde::{Deserialize, Serialize};
pub use serde_json::Value;
pub use std::sync::Arc;
pub use tracing::{debug, error, info, warn};
