//! Mutable state of one integration: tokens, cached user and active business
//!
//! Both client variants keep a [`SessionState`] behind a lock and delegate all
//! state transitions to it, so identity resolution and activation behave the
//! same whether the transport blocks or suspends.

use crate::error::{AppError, AppResult};
use crate::model::auth::OAuthToken;
use crate::model::context::BusinessContext;
use crate::model::identity::{AccountId, Identity};
use std::sync::Arc;
use tracing::info;

/// Tokens, cached identity and active business context
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    token: Option<OAuthToken>,
    current_user: Option<Arc<Identity>>,
    active: Option<Arc<BusinessContext>>,
}

impl SessionState {
    /// Creates an empty session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current token pair
    #[must_use]
    pub fn token(&self) -> Option<&OAuthToken> {
        self.token.as_ref()
    }

    /// Replaces the token pair
    pub fn set_token(&mut self, token: OAuthToken) {
        self.token = Some(token);
    }

    /// Bearer token for the next authenticated call
    ///
    /// # Errors
    /// `AppError::MissingAccessToken` before any token was obtained
    pub fn bearer_token(&self) -> AppResult<&str> {
        self.token
            .as_ref()
            .map(|t| t.access_token.as_str())
            .ok_or(AppError::MissingAccessToken)
    }

    /// True when the bearer token is expired and a refresh token is available
    #[must_use]
    pub fn should_refresh(&self) -> bool {
        self.token
            .as_ref()
            .is_some_and(|t| t.refresh_token.is_some() && t.is_expired(None))
    }

    /// Cached authenticated user
    #[must_use]
    pub fn current_user(&self) -> Option<Arc<Identity>> {
        self.current_user.clone()
    }

    /// Caches a freshly loaded user
    pub fn set_current_user(&mut self, identity: Identity) -> Arc<Identity> {
        let identity = Arc::new(identity);
        self.current_user = Some(identity.clone());
        identity
    }

    /// Active business context
    #[must_use]
    pub fn active_business(&self) -> Option<Arc<BusinessContext>> {
        self.active.clone()
    }

    /// Resolves `business_uuid` against the cached user and swaps the context in
    ///
    /// On failure the previous context stays in place.
    ///
    /// # Errors
    /// * `AppError::InvalidInput` if no user is cached
    /// * `AppError::BusinessNotFound` / `AppError::RoleNotFound` from resolution
    pub fn activate(&mut self, business_uuid: &str) -> AppResult<Arc<BusinessContext>> {
        let user = self.current_user.as_ref().ok_or_else(|| {
            AppError::InvalidInput("current user must be loaded before activation".to_string())
        })?;
        let context = Arc::new(BusinessContext::resolve(user, business_uuid)?);
        self.active = Some(context.clone());
        info!(
            "Active business set to {} (account {})",
            context.business_uuid, context.account_id
        );
        Ok(context)
    }

    /// Account id of the active business
    ///
    /// # Errors
    /// `AppError::NoActiveBusiness` before a business was activated
    pub fn active_account_id(&self) -> AppResult<AccountId> {
        self.active
            .as_ref()
            .map(|ctx| ctx.account_id.clone())
            .ok_or(AppError::NoActiveBusiness)
    }
}
