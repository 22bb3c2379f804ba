use freshbooks_client::application::config::Config;
use mockito::Matcher;
use serde_json::{Value, json};

pub const BUSINESS_UUID: &str = "0e8c4c5b-8f2e-4a5a-9d51-4a2f6f3e1a01";
pub const ACCOUNT_ID: &str = "zDmNq";
pub const USER_PATH: &str = "/auth/api/v1/users/me";

/// Configuration pointing every endpoint at a mock server
pub fn config_for(server_url: &str) -> Config {
    freshbooks_client::utils::setup_logger();
    Config::new("client", "s3cret", "https://my.app/callback")
        .with_base_url(server_url)
        .with_token_endpoint(format!("{server_url}/auth/oauth/token"))
}

/// Query the client attaches to the current user lookup
pub fn user_query() -> Matcher {
    Matcher::UrlEncoded("exclude_groups".into(), "1".into())
}

pub fn token_body(access: &str, refresh: Option<&str>) -> String {
    let mut body = json!({
        "access_token": access,
        "token_type": "Bearer",
        "expires_in": 43200,
        "scope": "user:profile:read"
    });
    if let Some(refresh) = refresh {
        body["refresh_token"] = json!(refresh);
    }
    body.to_string()
}

pub fn user_body() -> Value {
    json!({
        "response": {
            "id": 2192788,
            "email": "owner@example.com",
            "first_name": "Grace",
            "last_name": "Hopper",
            "business_memberships": [
                {
                    "id": 160,
                    "role": "owner",
                    "business": {
                        "id": 77,
                        "business_uuid": BUSINESS_UUID,
                        "name": "Hopper Consulting",
                        "account_id": ACCOUNT_ID
                    }
                }
            ],
            "roles": [
                {"id": 1, "role": "admin", "systemid": 3001, "userid": 1, "accountid": ACCOUNT_ID}
            ]
        }
    })
}

pub fn currencies_body() -> Value {
    json!({
        "response": {
            "result": {
                "currencies": {"currency_codes": ["USD", "CAD"]}
            }
        }
    })
}
