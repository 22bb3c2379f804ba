//! Async client for the FreshBooks API
//!
//! This module provides the suspending variant of the client. It handles:
//! - Authorization code exchange and token refresh
//! - Authenticated GET/POST calls with the FreshBooks header set
//! - Loading the current user and selecting the active business
//!
//! # Example
//! ```ignore
//! use freshbooks_client::prelude::*;
//!
//! let client = Client::new(Config::from_env())?;
//! client.fetch_access_token("https://my.app/callback?code=...").await?;
//! client.set_active_business("6f9b...").await?;
//! let currencies = client.get_currencies().await?;
//! ```

use crate::application::auth::{AuthorizationRequest, TokenManager, UpdateTokenHook};
use crate::application::config::Config;
use crate::application::interfaces::accounting::AccountingService;
use crate::application::session::SessionState;
use crate::constants::{CURRENT_USER_PATH, USER_AGENT};
use crate::error::{AppError, AppResult};
use crate::model::auth::{OAuthToken, TokenGrant, TokenRequest, parse_authorization_response};
use crate::model::context::BusinessContext;
use crate::model::http::{api_headers, join_url, status_error};
use crate::model::identity::{AccountId, Identity};
use crate::model::requests::{
    CURRENCY_CODES_PATH, QueryParams, Report, autocomplete_clients_path, clients_path,
    currencies_path,
};
use crate::model::responses::drill_as;
use crate::model::signing::TokenAuthMethod;
use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Async FreshBooks client
///
/// Session state sits behind a `RwLock`, so every method takes `&self`.
/// The client is still meant to be driven from one task at a time.
pub struct Client {
    config: Arc<Config>,
    http_client: HttpClient,
    tokens: TokenManager,
    state: RwLock<SessionState>,
}

impl Client {
    /// Creates a client without any token
    ///
    /// # Errors
    /// `AppError::Network` if the HTTP client cannot be built
    pub fn new(config: Config) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.rest_api.timeout))
            .build()?;
        let tokens = TokenManager::new(&config);

        Ok(Self {
            config: Arc::new(config),
            http_client,
            tokens,
            state: RwLock::new(SessionState::new()),
        })
    }

    /// Starts from a previously persisted token
    #[must_use]
    pub fn with_token(mut self, token: OAuthToken) -> Self {
        self.state.get_mut().set_token(token);
        self
    }

    /// Registers the callback invoked whenever tokens are refreshed
    #[must_use]
    pub fn with_update_token<F>(mut self, hook: F) -> Self
    where
        F: Fn(&OAuthToken, Option<&str>) + Send + Sync + 'static,
    {
        let hook: UpdateTokenHook = Arc::new(hook);
        self.tokens.set_update_token(hook);
        self
    }

    /// Replaces the token endpoint authentication method
    #[must_use]
    pub fn with_auth_method<M: TokenAuthMethod + 'static>(mut self, method: M) -> Self {
        self.tokens.set_auth_method(Arc::new(method));
        self
    }

    /// Uses a custom HTTP client
    #[must_use]
    pub fn with_http_client(mut self, http_client: HttpClient) -> Self {
        self.http_client = http_client;
        self
    }

    /// Gets the client configuration
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds the consent URL end users are redirected to
    ///
    /// # Errors
    /// `AppError::Url` if the configured authorization URL is invalid
    pub fn authorization_url(&self, state: Option<&str>) -> AppResult<AuthorizationRequest> {
        self.tokens.authorization_request(state)
    }

    /// Exchanges an authorization code, or the full redirect URL carrying it,
    /// for a token pair and stores it
    ///
    /// # Errors
    /// * `AppError::OAuth` if the redirect reports an error
    /// * `AppError::TokenRejected` if the token endpoint refuses the code
    pub async fn fetch_access_token(&self, authorization_response: &str) -> AppResult<OAuthToken> {
        let code = parse_authorization_response(authorization_response)?;
        let request = self
            .tokens
            .grant_request(&TokenGrant::AuthorizationCode { code })?;
        let token = self.send_token_request(request).await?;

        self.state.write().await.set_token(token.clone());
        info!("✓ Access token obtained");
        Ok(token)
    }

    /// Exchanges the stored refresh token for a new token pair and stores it
    ///
    /// # Errors
    /// * `AppError::MissingRefreshToken` if no refresh token is stored
    /// * `AppError::TokenRejected` if the token endpoint refuses the refresh
    pub async fn refresh_access_token(&self) -> AppResult<OAuthToken> {
        let (token, spent) = {
            let mut state = self.state.write().await;
            let grant = self.tokens.refresh_grant(state.token())?;
            let spent = grant.secret().to_string();

            let request = self.tokens.grant_request(&grant)?;
            let token = self.send_token_request(request).await?;
            let token = self.tokens.complete_refresh(token, &spent);

            state.set_token(token.clone());
            (token, spent)
        };

        self.tokens.notify_refresh(&token, &spent);
        Ok(token)
    }

    /// Current token pair
    pub async fn token(&self) -> Option<OAuthToken> {
        self.state.read().await.token().cloned()
    }

    /// Cached authenticated user
    pub async fn current_user(&self) -> Option<Arc<Identity>> {
        self.state.read().await.current_user()
    }

    /// Active business context
    pub async fn active_business(&self) -> Option<Arc<BusinessContext>> {
        self.state.read().await.active_business()
    }

    /// Account id of the active business
    ///
    /// # Errors
    /// `AppError::NoActiveBusiness` before activation
    pub async fn active_account_id(&self) -> AppResult<AccountId> {
        self.state.read().await.active_account_id()
    }

    /// Makes a GET request against `base_url + path`
    ///
    /// # Errors
    /// * `AppError::Unauthenticated` on 401
    /// * `AppError::InactiveBusiness` on 402
    /// * `AppError::Unexpected` on any other non-2xx
    pub async fn get(&self, path: &str, params: QueryParams<'_>) -> AppResult<Value> {
        let mut request = self.request(Method::GET, path).await?;
        if !params.is_empty() {
            request = request.query(params);
        }
        self.execute(request).await
    }

    /// Makes a POST request with a JSON body against `base_url + path`
    ///
    /// # Errors
    /// Same as [`Client::get`]
    pub async fn post<B: Serialize + ?Sized + Sync>(&self, path: &str, payload: &B) -> AppResult<Value> {
        let body = serde_json::to_string(payload)?;
        let request = self.request(Method::POST, path).await?.body(body);
        self.execute(request).await
    }

    /// Builds an authenticated request, refreshing an expired token first when enabled
    async fn request(&self, method: Method, path: &str) -> AppResult<RequestBuilder> {
        if self.config.auto_refresh && self.state.read().await.should_refresh() {
            warn!("Access token expired, refreshing before request");
            self.refresh_access_token().await?;
        }

        let state = self.state.read().await;
        let url = join_url(&self.config.rest_api.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self.http_client.request(method, &url);
        for (name, value) in api_headers(state.bearer_token()?) {
            request = request.header(name, value);
        }
        Ok(request)
    }

    /// Sends a request and decodes a JSON answer
    async fn execute(&self, request: RequestBuilder) -> AppResult<Value> {
        let response = request.send().await?;
        let status = response.status();
        debug!("Response status: {}", status);

        let body = response.text().await?;
        if let Some(err) = status_error(status, &body) {
            return Err(err);
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn send_token_request(&self, request: TokenRequest) -> AppResult<OAuthToken> {
        debug!("POST {}", request.url);
        let mut builder = self.http_client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let response = builder.body(request.body).send().await?;
        let status = response.status();
        let body = response.text().await?;
        self.tokens.parse_token(status, &body)
    }

    async fn active_path(&self, build: impl FnOnce(&AccountId) -> String) -> AppResult<String> {
        let account_id = self.active_account_id().await?;
        Ok(build(&account_id))
    }
}

#[async_trait]
impl AccountingService for Client {
    async fn load_current_user(&self) -> Result<Arc<Identity>, AppError> {
        debug!("Loading current user");
        let body = self.get(CURRENT_USER_PATH, &[]).await?;
        let identity = Identity::from_response(body)?;
        info!("Loaded identity {} ({})", identity.id, identity.email);
        Ok(self.state.write().await.set_current_user(identity))
    }

    async fn set_active_business(
        &self,
        business_uuid: &str,
    ) -> Result<Arc<BusinessContext>, AppError> {
        if self.current_user().await.is_none() {
            self.load_current_user().await?;
        }
        self.state.write().await.activate(business_uuid)
    }

    async fn get_currencies(&self) -> Result<Vec<String>, AppError> {
        let path = self.active_path(currencies_path).await?;
        let body = self.get(&path, &[]).await?;
        drill_as(&body, &CURRENCY_CODES_PATH)
    }

    async fn get_invoice_details_report(&self, params: QueryParams<'_>) -> Result<Value, AppError> {
        let path = self.active_path(|id| Report::InvoiceDetails.path(id)).await?;
        self.get(&path, params).await
    }

    async fn get_expense_report(&self, params: QueryParams<'_>) -> Result<Value, AppError> {
        let path = self.active_path(|id| Report::ExpenseDetails.path(id)).await?;
        self.get(&path, params).await
    }

    async fn get_profit_loss_report(&self, params: QueryParams<'_>) -> Result<Value, AppError> {
        let path = self.active_path(|id| Report::ProfitLoss.path(id)).await?;
        self.get(&path, params).await
    }

    async fn get_autocomplete_clients(&self, params: QueryParams<'_>) -> Result<Value, AppError> {
        let path = self.active_path(autocomplete_clients_path).await?;
        self.get(&path, params).await
    }

    async fn get_clients(&self, params: QueryParams<'_>) -> Result<Value, AppError> {
        let path = self.active_path(clients_path).await?;
        self.get(&path, params).await
    }
}
