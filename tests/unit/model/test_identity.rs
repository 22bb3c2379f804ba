use freshbooks_client::error::AppError;
use freshbooks_client::model::context::BusinessContext;
use freshbooks_client::model::identity::{AccountId, Identity};
use serde_json::json;

fn user_response() -> serde_json::Value {
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
                        "business_uuid": "0e8c4c5b-8f2e-4a5a-9d51-4a2f6f3e1a01",
                        "name": "Hopper Consulting",
                        "account_id": "zDmNq"
                    }
                },
                {
                    "id": 161,
                    "role": "client",
                    "business": {
                        "id": 78,
                        "business_uuid": "5d0a1f3c-0000-4000-8000-000000000002",
                        "name": "Other",
                        "account_id": "AbCdE"
                    }
                }
            ],
            "roles": [
                {"id": 1, "role": "admin", "systemid": 3001, "userid": 1, "accountid": "zDmNq"}
            ],
            "links": {"me": "/service/auth/api/v1/users/me"}
        }
    })
}

#[test]
fn test_identity_from_response() {
    let identity = Identity::from_response(user_response()).unwrap();
    assert_eq!(identity.id, 2192788);
    assert_eq!(identity.business_memberships.len(), 2);
    assert_eq!(identity.roles.len(), 1);
    assert_eq!(identity.full_name(), "Grace Hopper");
}

#[test]
fn test_context_from_identity() {
    let identity = Identity::from_response(user_response()).unwrap();
    let ctx = BusinessContext::resolve(&identity, "0e8c4c5b-8f2e-4a5a-9d51-4a2f6f3e1a01").unwrap();
    assert_eq!(ctx.business_id, 77);
    assert_eq!(ctx.account_id, AccountId::new("zDmNq"));
    assert_eq!(ctx.system_id, 3001);
    assert_eq!(ctx.business_membership.id, Some(160));
    assert_eq!(ctx.role.role.as_deref(), Some("admin"));
}

#[test]
fn test_membership_without_role_fails() {
    let identity = Identity::from_response(user_response()).unwrap();
    match BusinessContext::resolve(&identity, "5d0a1f3c-0000-4000-8000-000000000002") {
        Err(AppError::RoleNotFound(account)) => assert_eq!(account.as_str(), "AbCdE"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_identity_display_is_json() {
    let identity = Identity::from_response(user_response()).unwrap();
    let shown = identity.to_string();
    let parsed: serde_json::Value = serde_json::from_str(&shown).unwrap();
    assert_eq!(parsed["email"], "owner@example.com");
}

#[test]
fn test_unrelated_null_entries_do_not_block_activation() {
    let mut body = user_response();
    body["response"]["business_memberships"]
        .as_array_mut()
        .unwrap()
        .push(json!({"id": 162, "business": {"id": 79, "business_uuid": "legacy", "account_id": null}}));
    body["response"]["roles"]
        .as_array_mut()
        .unwrap()
        .push(json!({"id": 2, "role": "admin", "systemid": null, "accountid": 5}));

    let identity = Identity::from_response(body).unwrap();
    let ctx = BusinessContext::resolve(&identity, "0e8c4c5b-8f2e-4a5a-9d51-4a2f6f3e1a01").unwrap();
    assert_eq!(ctx.system_id, 3001);
    assert!(matches!(
        BusinessContext::resolve(&identity, "legacy"),
        Err(AppError::BusinessNotFound(_))
    ));
}
