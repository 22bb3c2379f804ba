//! Error types for the FreshBooks client
//!
//! Every fallible operation in the crate returns [`AppError`]. HTTP 401 and 402
//! get their own variants so callers can drive re-authorization or business
//! re-selection without inspecting status codes.

use crate::model::identity::AccountId;
use reqwest::StatusCode;
use std::fmt;

/// Convenience alias used across the crate
pub type AppResult<T> = Result<T, AppError>;

/// Main error type for the library
#[derive(Debug)]
pub enum AppError {
    /// Transport level failure reported by reqwest
    Network(reqwest::Error),
    /// JSON (de)serialization failure
    Json(serde_json::Error),
    /// A URL could not be parsed
    Url(url::ParseError),
    /// I/O failure
    Io(std::io::Error),
    /// The API answered 401
    Unauthenticated,
    /// The API answered 402, the active business is not in good standing
    InactiveBusiness,
    /// Any other non-2xx answer from an authenticated call
    Unexpected {
        /// HTTP status returned by the API
        status: StatusCode,
        /// Raw response body
        body: String,
    },
    /// The token endpoint refused an exchange or refresh
    TokenRejected {
        /// HTTP status returned by the token endpoint
        status: StatusCode,
        /// Raw response body
        body: String,
    },
    /// The authorization redirect reported an error or carried no code
    OAuth(String),
    /// An authenticated call was attempted before a token was obtained
    MissingAccessToken,
    /// A refresh was requested but no refresh token is stored
    MissingRefreshToken,
    /// No business membership matches the requested business uuid
    BusinessNotFound(String),
    /// No role matches the account id of the selected membership
    RoleNotFound(AccountId),
    /// The role matched for the selected account carries no system id
    RoleWithoutSystem(AccountId),
    /// A resource accessor was called before a business was activated
    NoActiveBusiness,
    /// A documented key is absent from a response body
    MissingField(String),
    /// Caller supplied an unusable value
    InvalidInput(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Network(e) => write!(f, "network error: {e}"),
            AppError::Json(e) => write!(f, "json error: {e}"),
            AppError::Url(e) => write!(f, "url error: {e}"),
            AppError::Io(e) => write!(f, "io error: {e}"),
            AppError::Unauthenticated => write!(f, "unauthenticated"),
            AppError::InactiveBusiness => write!(f, "payment required: business is inactive"),
            AppError::Unexpected { status, body } => {
                write!(f, "unexpected http status {status}: {body}")
            }
            AppError::TokenRejected { status, body } => {
                write!(f, "token endpoint rejected request with status {status}: {body}")
            }
            AppError::OAuth(msg) => write!(f, "oauth error: {msg}"),
            AppError::MissingAccessToken => write!(f, "no access token available"),
            AppError::MissingRefreshToken => write!(f, "no refresh token available"),
            AppError::BusinessNotFound(uuid) => write!(f, "business not found: {uuid}"),
            AppError::RoleNotFound(account_id) => {
                write!(f, "no role found for account: {account_id}")
            }
            AppError::RoleWithoutSystem(account_id) => {
                write!(f, "role for account {account_id} has no system id")
            }
            AppError::NoActiveBusiness => write!(f, "no active business selected"),
            AppError::MissingField(path) => write!(f, "missing field in response: {path}"),
            AppError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Network(e) => Some(e),
            AppError::Json(e) => Some(e),
            AppError::Url(e) => Some(e),
            AppError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl AppError {
    /// True for failures that call for a new authorization round
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            AppError::Unauthenticated
                | AppError::TokenRejected { .. }
                | AppError::MissingAccessToken
                | AppError::MissingRefreshToken
        )
    }

    /// True for failures that call for selecting another business
    #[must_use]
    pub fn is_business_state(&self) -> bool {
        matches!(
            self,
            AppError::InactiveBusiness
                | AppError::BusinessNotFound(_)
                | AppError::RoleNotFound(_)
                | AppError::RoleWithoutSystem(_)
                | AppError::NoActiveBusiness
        )
    }

    /// HTTP status carried by the error, if any
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AppError::Unauthenticated => Some(StatusCode::UNAUTHORIZED),
            AppError::InactiveBusiness => Some(StatusCode::PAYMENT_REQUIRED),
            AppError::Unexpected { status, .. } | AppError::TokenRejected { status, .. } => {
                Some(*status)
            }
            AppError::Network(e) => e.status(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Network(e)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Json(e)
    }
}

impl From<url::ParseError> for AppError {
    fn from(e: url::ParseError) -> Self {
        AppError::Url(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e)
    }
}
