//! OAuth2 models: tokens, grants and token endpoint requests

use crate::constants::TOKEN_EXPIRY_LEEWAY_SECS;
use crate::error::{AppError, AppResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;
use url::form_urlencoded;

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// OAuth token pair returned by the token endpoint
///
/// Fields the provider returns beyond the standard ones are kept in `extra`
/// so that persisting and reloading a token loses nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthToken {
    /// Bearer token sent on every authenticated request
    pub access_token: String,
    /// Long lived token used to obtain a new access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Token type (usually "Bearer")
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime in seconds as reported by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    /// Unix timestamp (seconds) after which the access token is expired
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    /// Granted scope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Any other field returned by the provider
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OAuthToken {
    /// Creates a token from an access/refresh pair with no expiry information
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            token_type: default_token_type(),
            expires_in: None,
            expires_at: None,
            scope: None,
            extra: Map::new(),
        }
    }

    /// Fills `expires_at` from `expires_in` when the provider did not send it
    ///
    /// A lifetime too large to represent leaves the token without expiry.
    #[must_use]
    pub fn stamp_expiry(mut self) -> Self {
        if self.expires_at.is_none() {
            let now = Utc::now().timestamp();
            self.expires_at = self
                .expires_in
                .and_then(|secs| i64::try_from(secs).ok())
                .and_then(|secs| now.checked_add(secs));
        }
        self
    }

    /// Checks if the access token is expired or will expire within the margin
    ///
    /// Tokens without expiry information never count as expired.
    #[must_use]
    pub fn is_expired(&self, margin_seconds: Option<i64>) -> bool {
        let margin = margin_seconds.unwrap_or(TOKEN_EXPIRY_LEEWAY_SECS);
        match self.expires_at {
            Some(expires_at) => Utc::now().timestamp() >= expires_at.saturating_sub(margin),
            None => false,
        }
    }
}

/// Grant sent to the token endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenGrant {
    /// Exchange of an authorization code
    AuthorizationCode {
        /// Code taken from the redirect
        code: String,
    },
    /// Exchange of a refresh token
    RefreshToken {
        /// Stored refresh token
        refresh_token: String,
    },
}

impl TokenGrant {
    /// Value of the `grant_type` parameter
    #[must_use]
    pub fn grant_type(&self) -> &'static str {
        match self {
            TokenGrant::AuthorizationCode { .. } => "authorization_code",
            TokenGrant::RefreshToken { .. } => "refresh_token",
        }
    }

    /// The code or refresh token carried by the grant
    #[must_use]
    pub fn secret(&self) -> &str {
        match self {
            TokenGrant::AuthorizationCode { code } => code,
            TokenGrant::RefreshToken { refresh_token } => refresh_token,
        }
    }

    /// Standard form-encoded body for this grant
    #[must_use]
    pub fn form_body(&self, redirect_uri: &str) -> String {
        let mut form = form_urlencoded::Serializer::new(String::new());
        form.append_pair("grant_type", self.grant_type());
        match self {
            TokenGrant::AuthorizationCode { code } => {
                form.append_pair("code", code);
                form.append_pair("redirect_uri", redirect_uri);
            }
            TokenGrant::RefreshToken { refresh_token } => {
                form.append_pair("refresh_token", refresh_token);
            }
        }
        form.finish()
    }
}

/// Fully prepared token endpoint call, independent of the HTTP transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    /// Token endpoint URL
    pub url: String,
    /// Headers to send
    pub headers: Vec<(String, String)>,
    /// Encoded body
    pub body: String,
}

impl TokenRequest {
    /// Form-encoded request as a standard OAuth2 client would send it
    #[must_use]
    pub fn form(url: &str, body: String) -> Self {
        Self {
            url: url.to_string(),
            headers: vec![
                (
                    "Content-Type".to_string(),
                    "application/x-www-form-urlencoded".to_string(),
                ),
                ("Accept".to_string(), "application/json".to_string()),
            ],
            body,
        }
    }

    /// Sets a header, replacing any existing value (names compare case-insensitively)
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// Value of a header, if set
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Extracts the authorization code from either a bare code or a full redirect
///
/// Accepts `https://app/cb?code=...&state=...`, `code=...&state=...` or the code
/// itself.
///
/// # Errors
/// * `AppError::OAuth` when the redirect carries `error` or has no `code`
/// * `AppError::InvalidInput` for an empty input
pub fn parse_authorization_response(input: &str) -> AppResult<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AppError::InvalidInput(
            "authorization response is empty".to_string(),
        ));
    }

    let query = if let Ok(url) = Url::parse(input) {
        url.query().unwrap_or_default().to_string()
    } else if input.contains('=') {
        input.trim_start_matches('?').to_string()
    } else {
        return Ok(input.to_string());
    };

    let mut code = None;
    let mut error = None;
    let mut description = None;
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            "error_description" => description = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(AppError::OAuth(match description {
            Some(d) => format!("{error}: {d}"),
            None => error,
        }));
    }
    code.ok_or_else(|| AppError::OAuth("authorization response has no code".to_string()))
}

/// Builds the consent URL end users are redirected to
///
/// # Errors
/// `AppError::Url` if `authorization_url` is not a valid URL
pub fn build_authorization_url(
    authorization_url: &str,
    client_id: &str,
    redirect_uri: &str,
    state: &str,
) -> AppResult<String> {
    let mut url = Url::parse(authorization_url)?;
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("state", state);
    Ok(url.into())
}
