//! Client authentication at the token endpoint
//!
//! FreshBooks does not accept the standard form-encoded token request. It wants
//! a JSON body carrying the client credentials and redirect uri. The rewrite is
//! a [`TokenAuthMethod`] so the rest of the token flow stays standard.

use crate::error::AppResult;
use crate::model::auth::TokenRequest;
use serde_json::{Map, Value};
use url::form_urlencoded;

/// Client credentials the auth method may inject into a token request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Redirect uri registered for the client
    pub redirect_uri: String,
}

/// Signs a prepared token request before it is sent
pub trait TokenAuthMethod: Send + Sync {
    /// Name of the method, for logs
    fn name(&self) -> &'static str;

    /// Rewrites `request` so the token endpoint can authenticate the client
    ///
    /// # Errors
    /// Implementations fail if the body cannot be re-encoded
    fn sign(&self, credentials: &ClientCredentials, request: TokenRequest) -> AppResult<TokenRequest>;
}

/// FreshBooks token endpoint authentication
///
/// Decodes the form body, adds `client_id`, `client_secret` and
/// `redirect_uri`, re-encodes it as JSON and forces a JSON content type.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreshBooksJsonAuth;

impl TokenAuthMethod for FreshBooksJsonAuth {
    fn name(&self) -> &'static str {
        "client_secret_freshbooks"
    }

    fn sign(
        &self,
        credentials: &ClientCredentials,
        mut request: TokenRequest,
    ) -> AppResult<TokenRequest> {
        let mut body: Map<String, Value> = form_urlencoded::parse(request.body.as_bytes())
            .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
            .collect();
        body.insert(
            "client_id".to_string(),
            Value::String(credentials.client_id.clone()),
        );
        body.insert(
            "client_secret".to_string(),
            Value::String(credentials.client_secret.clone()),
        );
        body.insert(
            "redirect_uri".to_string(),
            Value::String(credentials.redirect_uri.clone()),
        );

        request.body = serde_json::to_string(&body)?;
        request.set_header("Content-Type", "application/json");
        Ok(request)
    }
}

/// Standard `client_secret_post` authentication: credentials appended to the form body
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientSecretPost;

impl TokenAuthMethod for ClientSecretPost {
    fn name(&self) -> &'static str {
        "client_secret_post"
    }

    fn sign(
        &self,
        credentials: &ClientCredentials,
        mut request: TokenRequest,
    ) -> AppResult<TokenRequest> {
        let mut form = form_urlencoded::Serializer::new(request.body);
        form.append_pair("client_id", &credentials.client_id);
        form.append_pair("client_secret", &credentials.client_secret);
        request.body = form.finish();
        Ok(request)
    }
}
