//! Transport-independent pieces of an authenticated call
//!
//! Both the async and the blocking client build the same header set, join
//! URLs the same way and map statuses to [`AppError`] through this module.

use crate::constants::API_VERSION;
use crate::error::AppError;
use reqwest::StatusCode;
use tracing::{error, warn};

/// Headers sent on every authenticated request
#[must_use]
pub fn api_headers(bearer_token: &str) -> Vec<(&'static str, String)> {
    vec![
        ("Api-Version", API_VERSION.to_string()),
        ("Content-Type", "application/json".to_string()),
        ("Authorization", format!("Bearer {bearer_token}")),
    ]
}

/// Joins the base URL and a path, leaving absolute URLs untouched
#[must_use]
pub fn join_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Maps a non-success status of an authenticated call to its error kind
///
/// Returns `None` for 2xx statuses.
#[must_use]
pub fn status_error(status: StatusCode, body: &str) -> Option<AppError> {
    if status.is_success() {
        return None;
    }
    match status {
        StatusCode::UNAUTHORIZED => {
            warn!("Unauthenticated: {}", body);
            Some(AppError::Unauthenticated)
        }
        StatusCode::PAYMENT_REQUIRED => {
            warn!("Business inactive: {}", body);
            Some(AppError::InactiveBusiness)
        }
        _ => {
            error!("Request failed with status {}: {}", status, body);
            Some(AppError::Unexpected {
                status,
                body: body.to_string(),
            })
        }
    }
}

/// Maps a non-success status of a token endpoint call
#[must_use]
pub fn token_status_error(status: StatusCode, body: &str) -> Option<AppError> {
    if status.is_success() {
        return None;
    }
    error!("Token endpoint returned {}: {}", status, body);
    Some(AppError::TokenRejected {
        status,
        body: body.to_string(),
    })
}
