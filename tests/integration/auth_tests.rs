use crate::common::{config_for, token_body};
use chrono::Utc;
use freshbooks_client::prelude::*;
use mockito::Matcher;
use serde_json::json;
use std::sync::Mutex;

#[tokio::test]
async fn test_fetch_access_token_sends_json_credentials() {
    let mut server = mockito::Server::new_async().await;
    let token_mock = server
        .mock("POST", "/auth/oauth/token")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "grant_type": "authorization_code",
            "code": "C1",
            "redirect_uri": "https://my.app/callback",
            "client_id": "client",
            "client_secret": "s3cret"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(token_body("AT1", Some("RT1")))
        .create_async()
        .await;

    let client = Client::new(config_for(&server.url())).unwrap();
    let token = client
        .fetch_access_token("https://my.app/callback?code=C1&state=xyz")
        .await
        .unwrap();

    token_mock.assert_async().await;
    assert_eq!(token.access_token, "AT1");
    assert_eq!(token.refresh_token.as_deref(), Some("RT1"));
    assert!(token.expires_at.is_some());
    assert_eq!(client.token().await.unwrap(), token);
}

#[tokio::test]
async fn test_requests_use_new_bearer_token() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/oauth/token")
        .with_status(200)
        .with_body(token_body("AT1", Some("RT1")))
        .create_async()
        .await;
    let api_mock = server
        .mock("GET", "/anything")
        .match_header("authorization", "Bearer AT1")
        .match_header("api-version", "alpha")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_body(r#"{"ok": true}"#)
        .create_async()
        .await;

    let client = Client::new(config_for(&server.url())).unwrap();
    client.fetch_access_token("C1").await.unwrap();
    let body = client.get("/anything", &[]).await.unwrap();

    api_mock.assert_async().await;
    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn test_rejected_code_leaves_token_unset() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/oauth/token")
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant"}"#)
        .create_async()
        .await;

    let client = Client::new(config_for(&server.url())).unwrap();
    let err = client.fetch_access_token("bad").await.unwrap_err();

    assert!(matches!(err, AppError::TokenRejected { .. }));
    assert_eq!(err.status(), Some(reqwest::StatusCode::BAD_REQUEST));
    assert!(client.token().await.is_none());
}

#[tokio::test]
async fn test_refresh_replaces_token_and_notifies() {
    let mut server = mockito::Server::new_async().await;
    let refresh_mock = server
        .mock("POST", "/auth/oauth/token")
        .match_body(Matcher::PartialJson(json!({
            "grant_type": "refresh_token",
            "refresh_token": "RT1",
            "client_id": "client",
            "client_secret": "s3cret"
        })))
        .with_status(200)
        .with_body(token_body("AT2", Some("RT2")))
        .create_async()
        .await;

    let seen: Arc<Mutex<Vec<(String, Option<String>)>>> = Arc::default();
    let sink = seen.clone();
    let client = Client::new(config_for(&server.url()))
        .unwrap()
        .with_token(OAuthToken::new("AT1", Some("RT1".to_string())))
        .with_update_token(move |token, spent| {
            sink.lock()
                .unwrap()
                .push((token.access_token.clone(), spent.map(str::to_string)));
        });

    let token = client.refresh_access_token().await.unwrap();

    refresh_mock.assert_async().await;
    assert_eq!(token.access_token, "AT2");
    assert_eq!(token.refresh_token.as_deref(), Some("RT2"));
    assert_eq!(client.token().await.unwrap().access_token, "AT2");
    assert_eq!(
        seen.lock().unwrap().as_slice(),
        &[("AT2".to_string(), Some("RT1".to_string()))]
    );
}

#[tokio::test]
async fn test_refresh_without_new_refresh_token_keeps_old_one() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/auth/oauth/token")
        .with_status(200)
        .with_body(token_body("AT2", None))
        .create_async()
        .await;

    let client = Client::new(config_for(&server.url()))
        .unwrap()
        .with_token(OAuthToken::new("AT1", Some("RT1".to_string())));

    let token = client.refresh_access_token().await.unwrap();
    assert_eq!(token.access_token, "AT2");
    assert_eq!(token.refresh_token.as_deref(), Some("RT1"));
}

#[tokio::test]
async fn test_expired_token_is_refreshed_before_request() {
    let mut server = mockito::Server::new_async().await;
    let refresh_mock = server
        .mock("POST", "/auth/oauth/token")
        .with_status(200)
        .with_body(token_body("AT2", Some("RT2")))
        .expect(1)
        .create_async()
        .await;
    let api_mock = server
        .mock("GET", "/anything")
        .match_header("authorization", "Bearer AT2")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let expired = OAuthToken {
        expires_at: Some(Utc::now().timestamp() - 5),
        ..OAuthToken::new("AT1", Some("RT1".to_string()))
    };
    let seen: Arc<Mutex<Vec<(String, Option<String>)>>> = Arc::default();
    let sink = seen.clone();
    let client = Client::new(config_for(&server.url()))
        .unwrap()
        .with_token(expired)
        .with_update_token(move |token, spent| {
            sink.lock()
                .unwrap()
                .push((token.access_token.clone(), spent.map(str::to_string)));
        });

    client.get("/anything", &[]).await.unwrap();

    refresh_mock.assert_async().await;
    api_mock.assert_async().await;
    assert_eq!(
        seen.lock().unwrap().as_slice(),
        &[("AT2".to_string(), Some("RT1".to_string()))]
    );
}

#[tokio::test]
async fn test_auto_refresh_can_be_disabled() {
    let mut server = mockito::Server::new_async().await;
    let refresh_mock = server
        .mock("POST", "/auth/oauth/token")
        .expect(0)
        .create_async()
        .await;
    server
        .mock("GET", "/anything")
        .match_header("authorization", "Bearer AT1")
        .with_status(401)
        .with_body(r#"{"error":"expired"}"#)
        .create_async()
        .await;

    let expired = OAuthToken {
        expires_at: Some(Utc::now().timestamp() - 5),
        ..OAuthToken::new("AT1", Some("RT1".to_string()))
    };
    let client = Client::new(config_for(&server.url()).with_auto_refresh(false))
        .unwrap()
        .with_token(expired);

    let err = client.get("/anything", &[]).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated));
    refresh_mock.assert_async().await;
}

#[tokio::test]
async fn test_client_secret_post_sends_form_body() {
    let mut server = mockito::Server::new_async().await;
    let token_mock = server
        .mock("POST", "/auth/oauth/token")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
            Matcher::UrlEncoded("code".into(), "C1".into()),
            Matcher::UrlEncoded("client_secret".into(), "s3cret".into()),
        ]))
        .with_status(200)
        .with_body(token_body("AT1", Some("RT1")))
        .create_async()
        .await;

    let client = Client::new(config_for(&server.url()))
        .unwrap()
        .with_auth_method(ClientSecretPost);
    client.fetch_access_token("code=C1").await.unwrap();

    token_mock.assert_async().await;
}
