//! OAuth2 token handling shared by the async and blocking clients
//!
//! This module provides everything about the token flow that does not touch
//! the network:
//! - Building and signing token endpoint requests
//! - Turning token endpoint answers into [`OAuthToken`]s
//! - Keeping the previous refresh token when the provider omits a new one
//! - Notifying the integrating application through the `update_token` hook

use crate::application::config::Config;
use crate::error::{AppError, AppResult};
use crate::model::auth::{OAuthToken, TokenGrant, TokenRequest, build_authorization_url};
use crate::model::http::token_status_error;
use crate::model::signing::{ClientCredentials, FreshBooksJsonAuth, TokenAuthMethod};
use crate::utils::{generate_state, mask_token};
use reqwest::StatusCode;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Callback invoked with the new token and the refresh token that was spent to get it
pub type UpdateTokenHook = Arc<dyn Fn(&OAuthToken, Option<&str>) + Send + Sync>;

/// Consent URL together with the `state` it carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    /// URL to redirect the end user to
    pub url: String,
    /// State to compare against the redirect
    pub state: String,
}

/// Token flow configuration and hooks
#[derive(Clone)]
pub struct TokenManager {
    credentials: ClientCredentials,
    token_endpoint: String,
    authorization_url: String,
    auth_method: Arc<dyn TokenAuthMethod>,
    update_token: Option<UpdateTokenHook>,
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("client_id", &self.credentials.client_id)
            .field("token_endpoint", &self.token_endpoint)
            .field("auth_method", &self.auth_method.name())
            .field("update_token", &self.update_token.is_some())
            .finish()
    }
}

impl TokenManager {
    /// Creates a manager using the FreshBooks JSON token authentication
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            credentials: ClientCredentials::from(&config.credentials),
            token_endpoint: config.rest_api.token_endpoint.clone(),
            authorization_url: config.rest_api.authorization_url.clone(),
            auth_method: Arc::new(FreshBooksJsonAuth),
            update_token: None,
        }
    }

    /// Replaces the token endpoint authentication method
    pub fn set_auth_method(&mut self, method: Arc<dyn TokenAuthMethod>) {
        self.auth_method = method;
    }

    /// Registers the hook called after every refresh
    pub fn set_update_token(&mut self, hook: UpdateTokenHook) {
        self.update_token = Some(hook);
    }

    /// Builds the consent URL, generating a random state if none is given
    ///
    /// # Errors
    /// `AppError::Url` if the configured authorization URL is invalid
    pub fn authorization_request(&self, state: Option<&str>) -> AppResult<AuthorizationRequest> {
        let state = state.map_or_else(generate_state, str::to_string);
        let url = build_authorization_url(
            &self.authorization_url,
            &self.credentials.client_id,
            &self.credentials.redirect_uri,
            &state,
        )?;
        Ok(AuthorizationRequest { url, state })
    }

    /// Prepares the signed token endpoint request for a grant
    ///
    /// # Errors
    /// Propagates failures of the auth method
    pub fn grant_request(&self, grant: &TokenGrant) -> AppResult<TokenRequest> {
        let request = TokenRequest::form(
            &self.token_endpoint,
            grant.form_body(&self.credentials.redirect_uri),
        );
        debug!(
            "Signing {} request with {}",
            grant.grant_type(),
            self.auth_method.name()
        );
        self.auth_method.sign(&self.credentials, request)
    }

    /// Grant for refreshing `current`
    ///
    /// # Errors
    /// `AppError::MissingRefreshToken` if there is no stored refresh token
    pub fn refresh_grant(&self, current: Option<&OAuthToken>) -> AppResult<TokenGrant> {
        current
            .and_then(|t| t.refresh_token.clone())
            .map(|refresh_token| TokenGrant::RefreshToken { refresh_token })
            .ok_or(AppError::MissingRefreshToken)
    }

    /// Parses a token endpoint answer
    ///
    /// # Errors
    /// * `AppError::TokenRejected` for a non-2xx status
    /// * `AppError::Json` if the body is not a token
    pub fn parse_token(&self, status: StatusCode, body: &str) -> AppResult<OAuthToken> {
        if let Some(err) = token_status_error(status, body) {
            return Err(err);
        }
        let token: OAuthToken = serde_json::from_str(body)?;
        debug!("Received access token {}", mask_token(&token.access_token));
        Ok(token.stamp_expiry())
    }

    /// Finishes a refresh: keeps the spent refresh token if none was issued
    #[must_use]
    pub fn complete_refresh(&self, mut token: OAuthToken, spent_refresh_token: &str) -> OAuthToken {
        if token.refresh_token.is_none() {
            token.refresh_token = Some(spent_refresh_token.to_string());
        }
        info!("✓ Access token refreshed");
        token
    }

    /// Calls the update hook, if any
    ///
    /// Must run after the session lock is released: hooks may read the client.
    pub fn notify_refresh(&self, token: &OAuthToken, spent_refresh_token: &str) {
        if let Some(hook) = &self.update_token {
            hook(token, Some(spent_refresh_token));
        }
    }
}
