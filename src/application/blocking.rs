//! Blocking client for the FreshBooks API
//!
//! Same contract as [`crate::application::client::Client`], built on
//! `reqwest::blocking`. Token handling and business activation are shared
//! through [`TokenManager`] and [`SessionState`]; only the transport differs.
//!
//! Do not call this client from inside an async runtime, `reqwest::blocking`
//! panics there.

use crate::application::auth::{AuthorizationRequest, TokenManager, UpdateTokenHook};
use crate::application::config::Config;
use crate::application::interfaces::accounting::BlockingAccountingService;
use crate::application::session::SessionState;
use crate::constants::{CURRENT_USER_PATH, USER_AGENT};
use crate::error::AppResult;
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
use reqwest::Method;
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Lock access that recovers from poisoning instead of panicking
trait RwLockExt<T> {
    fn read_or_recover(&self) -> RwLockReadGuard<'_, T>;
    fn write_or_recover(&self) -> RwLockWriteGuard<'_, T>;
}

impl<T> RwLockExt<T> for RwLock<T> {
    fn read_or_recover(&self) -> RwLockReadGuard<'_, T> {
        self.read().unwrap_or_else(|poisoned| {
            error!("Session lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write_or_recover(&self) -> RwLockWriteGuard<'_, T> {
        self.write().unwrap_or_else(|poisoned| {
            error!("Session lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

/// Blocking FreshBooks client
pub struct BlockingClient {
    config: Arc<Config>,
    http_client: HttpClient,
    tokens: TokenManager,
    state: RwLock<SessionState>,
}

impl BlockingClient {
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
        match self.state.get_mut() {
            Ok(state) => state.set_token(token),
            Err(poisoned) => poisoned.into_inner().set_token(token),
        }
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

    /// Exchanges an authorization code (or the redirect carrying it) for a token pair
    ///
    /// # Errors
    /// * `AppError::OAuth` if the redirect reports an error
    /// * `AppError::TokenRejected` if the token endpoint refuses the code
    pub fn fetch_access_token(&self, authorization_response: &str) -> AppResult<OAuthToken> {
        let code = parse_authorization_response(authorization_response)?;
        let request = self
            .tokens
            .grant_request(&TokenGrant::AuthorizationCode { code })?;
        let token = self.send_token_request(request)?;

        self.state.write_or_recover().set_token(token.clone());
        info!("✓ Access token obtained");
        Ok(token)
    }

    /// Exchanges the stored refresh token for a new token pair
    ///
    /// # Errors
    /// * `AppError::MissingRefreshToken` if no refresh token is stored
    /// * `AppError::TokenRejected` if the token endpoint refuses the refresh
    pub fn refresh_access_token(&self) -> AppResult<OAuthToken> {
        let (token, spent) = {
            let mut state = self.state.write_or_recover();
            let grant = self.tokens.refresh_grant(state.token())?;
            let spent = grant.secret().to_string();

            let request = self.tokens.grant_request(&grant)?;
            let token = self.send_token_request(request)?;
            let token = self.tokens.complete_refresh(token, &spent);

            state.set_token(token.clone());
            (token, spent)
        };

        self.tokens.notify_refresh(&token, &spent);
        Ok(token)
    }

    /// Current token pair
    #[must_use]
    pub fn token(&self) -> Option<OAuthToken> {
        self.state.read_or_recover().token().cloned()
    }

    /// Cached authenticated user
    #[must_use]
    pub fn current_user(&self) -> Option<Arc<Identity>> {
        self.state.read_or_recover().current_user()
    }

    /// Active business context
    #[must_use]
    pub fn active_business(&self) -> Option<Arc<BusinessContext>> {
        self.state.read_or_recover().active_business()
    }

    /// Account id of the active business
    ///
    /// # Errors
    /// `AppError::NoActiveBusiness` before activation
    pub fn active_account_id(&self) -> AppResult<AccountId> {
        self.state.read_or_recover().active_account_id()
    }

    /// Makes a GET request against `base_url + path`
    ///
    /// # Errors
    /// * `AppError::Unauthenticated` on 401
    /// * `AppError::InactiveBusiness` on 402
    /// * `AppError::Unexpected` on any other non-2xx
    pub fn get(&self, path: &str, params: QueryParams<'_>) -> AppResult<Value> {
        let mut request = self.request(Method::GET, path)?;
        if !params.is_empty() {
            request = request.query(params);
        }
        self.execute(request)
    }

    /// Makes a POST request with a JSON body against `base_url + path`
    ///
    /// # Errors
    /// Same as [`BlockingClient::get`]
    pub fn post<B: Serialize + ?Sized>(&self, path: &str, payload: &B) -> AppResult<Value> {
        let body = serde_json::to_string(payload)?;
        let request = self.request(Method::POST, path)?.body(body);
        self.execute(request)
    }

    fn request(&self, method: Method, path: &str) -> AppResult<RequestBuilder> {
        if self.config.auto_refresh && self.state.read_or_recover().should_refresh() {
            warn!("Access token expired, refreshing before request");
            self.refresh_access_token()?;
        }

        let state = self.state.read_or_recover();
        let url = join_url(&self.config.rest_api.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self.http_client.request(method, &url);
        for (name, value) in api_headers(state.bearer_token()?) {
            request = request.header(name, value);
        }
        Ok(request)
    }

    fn execute(&self, request: RequestBuilder) -> AppResult<Value> {
        let response = request.send()?;
        let status = response.status();
        debug!("Response status: {}", status);

        let body = response.text()?;
        if let Some(err) = status_error(status, &body) {
            return Err(err);
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn send_token_request(&self, request: TokenRequest) -> AppResult<OAuthToken> {
        debug!("POST {}", request.url);
        let mut builder = self.http_client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let response = builder.body(request.body).send()?;
        let status = response.status();
        let body = response.text()?;
        self.tokens.parse_token(status, &body)
    }
}

impl BlockingAccountingService for BlockingClient {
    fn load_current_user(&self) -> AppResult<Arc<Identity>> {
        debug!("Loading current user");
        let body = self.get(CURRENT_USER_PATH, &[])?;
        let identity = Identity::from_response(body)?;
        info!("Loaded identity {} ({})", identity.id, identity.email);
        Ok(self.state.write_or_recover().set_current_user(identity))
    }

    fn set_active_business(&self, business_uuid: &str) -> AppResult<Arc<BusinessContext>> {
        if self.current_user().is_none() {
            self.load_current_user()?;
        }
        self.state.write_or_recover().activate(business_uuid)
    }

    fn get_currencies(&self) -> AppResult<Vec<String>> {
        let path = currencies_path(&self.active_account_id()?);
        let body = self.get(&path, &[])?;
        drill_as(&body, &CURRENCY_CODES_PATH)
    }

    fn get_invoice_details_report(&self, params: QueryParams<'_>) -> AppResult<Value> {
        self.get(&Report::InvoiceDetails.path(&self.active_account_id()?), params)
    }

    fn get_expense_report(&self, params: QueryParams<'_>) -> AppResult<Value> {
        self.get(&Report::ExpenseDetails.path(&self.active_account_id()?), params)
    }

    fn get_profit_loss_report(&self, params: QueryParams<'_>) -> AppResult<Value> {
        self.get(&Report::ProfitLoss.path(&self.active_account_id()?), params)
    }

    fn get_autocomplete_clients(&self, params: QueryParams<'_>) -> AppResult<Value> {
        self.get(&autocomplete_clients_path(&self.active_account_id()?), params)
    }

    fn get_clients(&self, params: QueryParams<'_>) -> AppResult<Value> {
        self.get(&clients_path(&self.active_account_id()?), params)
    }
}
