/// Base URL for every FreshBooks REST resource
pub const BASE_URL: &str = "https://api.freshbooks.com";
/// Consent page the integrating application redirects end users to
pub const AUTHORIZATION_URL: &str = "https://my.freshbooks.com/service/auth/oauth/authorize";
/// OAuth2 token endpoint used for both code exchange and refresh
pub const TOKEN_ENDPOINT: &str = "https://api.freshbooks.com/auth/oauth/token";
/// Value of the `Api-Version` header sent on authenticated requests
pub const API_VERSION: &str = "alpha";
/// User agent string used in HTTP requests to identify this client to FreshBooks
pub const USER_AGENT: &str = "freshbooks-client/0.7.0";
/// "Who am I" endpoint, groups excluded to keep the payload small
pub const CURRENT_USER_PATH: &str = "/auth/api/v1/users/me?exclude_groups=1";
/// Default timeout in seconds for REST requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Seconds before `expires_at` at which a bearer token is already treated as expired
pub const TOKEN_EXPIRY_LEEWAY_SECS: i64 = 60;
/// Length of generated OAuth `state` values
pub const STATE_LENGTH: usize = 30;
