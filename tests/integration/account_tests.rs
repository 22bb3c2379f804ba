use crate::common::{
    ACCOUNT_ID, BUSINESS_UUID, USER_PATH, config_for, currencies_body, user_body, user_query,
};
use freshbooks_client::prelude::*;
use mockito::{Matcher, ServerGuard};

fn authorized_client(server: &ServerGuard) -> Client {
    Client::new(config_for(&server.url()))
        .unwrap()
        .with_token(OAuthToken::new("AT1", Some("RT1".to_string())))
}

#[tokio::test]
async fn test_set_active_business_loads_user_once() {
    let mut server = mockito::Server::new_async().await;
    let user_mock = server
        .mock("GET", USER_PATH)
        .match_query(user_query())
        .match_header("authorization", "Bearer AT1")
        .with_status(200)
        .with_body(user_body().to_string())
        .expect(1)
        .create_async()
        .await;

    let client = authorized_client(&server);
    let first = client.set_active_business(BUSINESS_UUID).await.unwrap();
    let second = client.set_active_business(BUSINESS_UUID).await.unwrap();

    user_mock.assert_async().await;
    assert_eq!(first, second);
    assert_eq!(first.business_id, 77);
    assert_eq!(first.system_id, 3001);
    assert_eq!(client.active_account_id().await.unwrap().as_str(), ACCOUNT_ID);
    assert_eq!(client.current_user().await.unwrap().email, "owner@example.com");
}

#[tokio::test]
async fn test_unknown_business_fails_and_keeps_state() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", USER_PATH)
        .match_query(user_query())
        .with_status(200)
        .with_body(user_body().to_string())
        .create_async()
        .await;

    let client = authorized_client(&server);
    let err = client.set_active_business("missing").await.unwrap_err();

    assert!(matches!(err, AppError::BusinessNotFound(ref uuid) if uuid == "missing"));
    assert!(client.active_business().await.is_none());
    assert!(matches!(
        client.get_currencies().await,
        Err(AppError::NoActiveBusiness)
    ));
}

#[tokio::test]
async fn test_get_currencies() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", USER_PATH)
        .match_query(user_query())
        .with_status(200)
        .with_body(user_body().to_string())
        .create_async()
        .await;
    let currencies_mock = server
        .mock(
            "GET",
            format!("/accounting/account/{ACCOUNT_ID}/systems/currencies").as_str(),
        )
        .match_header("api-version", "alpha")
        .with_status(200)
        .with_body(currencies_body().to_string())
        .create_async()
        .await;

    let client = authorized_client(&server);
    client.set_active_business(BUSINESS_UUID).await.unwrap();
    let currencies = client.get_currencies().await.unwrap();

    currencies_mock.assert_async().await;
    assert_eq!(currencies, vec!["USD".to_string(), "CAD".to_string()]);
}

#[tokio::test]
async fn test_report_passes_query_params() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", USER_PATH)
        .match_query(user_query())
        .with_status(200)
        .with_body(user_body().to_string())
        .create_async()
        .await;
    let report_mock = server
        .mock(
            "GET",
            format!("/accounting/account/{ACCOUNT_ID}/reports/accounting/profitloss_entity")
                .as_str(),
        )
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("start_date".into(), "2024-01-01".into()),
            Matcher::UrlEncoded("end_date".into(), "2024-12-31".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"response": {"result": {"profitloss": {}}}}"#)
        .create_async()
        .await;

    let client = authorized_client(&server);
    client.set_active_business(BUSINESS_UUID).await.unwrap();
    let body = client
        .get_profit_loss_report(&[("start_date", "2024-01-01"), ("end_date", "2024-12-31")])
        .await
        .unwrap();

    report_mock.assert_async().await;
    assert!(body["response"]["result"]["profitloss"].is_object());
}

#[tokio::test]
async fn test_unauthenticated_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", USER_PATH)
        .match_query(user_query())
        .with_status(401)
        .with_body(r#"{"error":"unauthenticated"}"#)
        .create_async()
        .await;

    let client = authorized_client(&server);
    let err = client.load_current_user().await.unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated));
    assert!(client.current_user().await.is_none());
}

#[tokio::test]
async fn test_inactive_business_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", USER_PATH)
        .match_query(user_query())
        .with_status(200)
        .with_body(user_body().to_string())
        .create_async()
        .await;
    server
        .mock(
            "GET",
            format!("/accounting/account/{ACCOUNT_ID}/users/clients").as_str(),
        )
        .with_status(402)
        .with_body(r#"{"message":"payment required"}"#)
        .create_async()
        .await;

    let client = authorized_client(&server);
    client.set_active_business(BUSINESS_UUID).await.unwrap();
    let err = client.get_clients(&[]).await.unwrap_err();
    assert!(matches!(err, AppError::InactiveBusiness));
    assert!(err.is_business_state());
}

#[tokio::test]
async fn test_other_status_is_unexpected() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/accounting/things")
        .match_body(Matcher::Json(serde_json::json!({"name": "x"})))
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let client = authorized_client(&server);
    let err = client
        .post("/accounting/things", &serde_json::json!({"name": "x"}))
        .await
        .unwrap_err();
    match err {
        AppError::Unexpected { status, body } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
