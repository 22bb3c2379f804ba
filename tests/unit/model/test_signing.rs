use assert_json_diff::assert_json_eq;
use freshbooks_client::model::auth::{TokenGrant, TokenRequest};
use freshbooks_client::model::signing::{ClientCredentials, FreshBooksJsonAuth, TokenAuthMethod};
use serde_json::json;

fn credentials() -> ClientCredentials {
    ClientCredentials {
        client_id: "client".to_string(),
        client_secret: "s3cret".to_string(),
        redirect_uri: "https://my.app/callback".to_string(),
    }
}

#[test]
fn test_refresh_request_is_json_with_credentials() {
    let grant = TokenGrant::RefreshToken {
        refresh_token: "RT1".to_string(),
    };
    let request = TokenRequest::form(
        "https://api.freshbooks.com/auth/oauth/token",
        grant.form_body("https://my.app/callback"),
    );
    let signed = FreshBooksJsonAuth.sign(&credentials(), request).unwrap();

    let body: serde_json::Value = serde_json::from_str(&signed.body).unwrap();
    assert_json_eq!(
        body,
        json!({
            "grant_type": "refresh_token",
            "refresh_token": "RT1",
            "client_id": "client",
            "client_secret": "s3cret",
            "redirect_uri": "https://my.app/callback"
        })
    );
    assert_eq!(signed.header("Content-Type"), Some("application/json"));
    assert_eq!(signed.url, "https://api.freshbooks.com/auth/oauth/token");
}

#[test]
fn test_form_values_are_decoded_before_reencoding() {
    let grant = TokenGrant::AuthorizationCode {
        code: "a b&c".to_string(),
    };
    let request = TokenRequest::form("https://token", grant.form_body("https://my.app/callback"));
    let signed = FreshBooksJsonAuth.sign(&credentials(), request).unwrap();

    let body: serde_json::Value = serde_json::from_str(&signed.body).unwrap();
    assert_eq!(body["code"], "a b&c");
    assert_eq!(FreshBooksJsonAuth.name(), "client_secret_freshbooks");
}
