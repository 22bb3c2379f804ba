use crate::constants::{AUTHORIZATION_URL, BASE_URL, DEFAULT_TIMEOUT_SECS, TOKEN_ENDPOINT};
use crate::model::signing::ClientCredentials;
use crate::utils::config::get_env_or_default;
use crate::utils::mask::mask_token;
use dotenv::dotenv;
use pretty_simple_display::{DebugPretty, DisplaySimple};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error};

#[derive(Serialize, Deserialize, Clone, PartialEq)]
/// OAuth client credentials registered with FreshBooks
///
/// `Debug` and `Display` mask the client secret.
pub struct Credentials {
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Redirect uri registered for the application
    pub redirect_uri: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &mask_token(&self.client_secret))
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "client_id={} client_secret={} redirect_uri={}",
            self.client_id,
            mask_token(&self.client_secret),
            self.redirect_uri
        )
    }
}

impl From<&Credentials> for ClientCredentials {
    fn from(value: &Credentials) -> Self {
        ClientCredentials {
            client_id: value.client_id.clone(),
            client_secret: value.client_secret.clone(),
            redirect_uri: value.redirect_uri.clone(),
        }
    }
}

#[derive(DebugPretty, DisplaySimple, Serialize, Deserialize, Clone, PartialEq)]
/// Endpoints of the REST API
pub struct RestApiConfig {
    /// Base URL for resource requests
    pub base_url: String,
    /// Consent page URL
    pub authorization_url: String,
    /// Token endpoint URL
    pub token_endpoint: String,
    /// Timeout in seconds for every request
    pub timeout: u64,
}

impl Default for RestApiConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            authorization_url: AUTHORIZATION_URL.to_string(),
            token_endpoint: TOKEN_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq)]
/// Main configuration for the FreshBooks client
pub struct Config {
    /// OAuth credentials
    pub credentials: Credentials,
    /// REST API configuration
    pub rest_api: RestApiConfig,
    /// Refresh an expired bearer token before the next authenticated call
    pub auto_refresh: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("credentials", &self.credentials)
            .field("rest_api", &self.rest_api)
            .field("auto_refresh", &self.auto_refresh)
            .finish()
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rest_api={} auto_refresh={}",
            self.credentials, self.rest_api, self.auto_refresh
        )
    }
}

impl Config {
    /// Creates a configuration pointing at the production FreshBooks endpoints
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            credentials: Credentials {
                client_id: client_id.into(),
                client_secret: client_secret.into(),
                redirect_uri: redirect_uri.into(),
            },
            rest_api: RestApiConfig::default(),
            auto_refresh: true,
        }
    }

    /// Creates a configuration from environment variables (and a `.env` file if present)
    pub fn from_env() -> Self {
        match dotenv() {
            Ok(_) => debug!("Successfully loaded .env file"),
            Err(e) => debug!("Failed to load .env file: {e}"),
        }

        let client_id = get_env_or_default("FRESHBOOKS_CLIENT_ID", String::new());
        let client_secret = get_env_or_default("FRESHBOOKS_CLIENT_SECRET", String::new());
        let redirect_uri = get_env_or_default("FRESHBOOKS_REDIRECT_URI", String::new());

        if client_id.is_empty() {
            error!("FRESHBOOKS_CLIENT_ID not found in environment variables or .env file");
        }
        if client_secret.is_empty() {
            error!("FRESHBOOKS_CLIENT_SECRET not found in environment variables or .env file");
        }
        if redirect_uri.is_empty() {
            error!("FRESHBOOKS_REDIRECT_URI not found in environment variables or .env file");
        }

        Config {
            credentials: Credentials {
                client_id,
                client_secret,
                redirect_uri,
            },
            rest_api: RestApiConfig {
                base_url: get_env_or_default("FRESHBOOKS_BASE_URL", BASE_URL.to_string()),
                authorization_url: get_env_or_default(
                    "FRESHBOOKS_AUTHORIZATION_URL",
                    AUTHORIZATION_URL.to_string(),
                ),
                token_endpoint: get_env_or_default("FRESHBOOKS_TOKEN_URL", TOKEN_ENDPOINT.to_string()),
                timeout: get_env_or_default("FRESHBOOKS_TIMEOUT", DEFAULT_TIMEOUT_SECS),
            },
            auto_refresh: get_env_or_default("FRESHBOOKS_AUTO_REFRESH", true),
        }
    }

    /// Overrides the resource base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.rest_api.base_url = base_url.into();
        self
    }

    /// Overrides the token endpoint
    #[must_use]
    pub fn with_token_endpoint(mut self, token_endpoint: impl Into<String>) -> Self {
        self.rest_api.token_endpoint = token_endpoint.into();
        self
    }

    /// Overrides the consent page URL
    #[must_use]
    pub fn with_authorization_url(mut self, authorization_url: impl Into<String>) -> Self {
        self.rest_api.authorization_url = authorization_url.into();
        self
    }

    /// Overrides the request timeout in seconds
    #[must_use]
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.rest_api.timeout = timeout;
        self
    }

    /// Enables or disables refreshing expired tokens before a call
    #[must_use]
    pub fn with_auto_refresh(mut self, auto_refresh: bool) -> Self {
        self.auto_refresh = auto_refresh;
        self
    }
}
