use axum::http::StatusCode;
use serde_json::{json, Value};
use taskboard::modules::auth::interface::UserRepository;
use taskboard::modules::auth::model::User;
use taskboard::services::clock::Clock;
use taskboard::services::hashing;

use crate::common::{test_password, TestContext};

#[tokio::test]
async fn login_returns_bearer_token() {
    let ctx = TestContext::new().await;
    ctx.register("alice", test_password()).await;

    let response = ctx
        .server
        .post("/auth/login")
        .json(&json!({ "username": "alice", "password": test_password() }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 3600);
    assert!(!body["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let ctx = TestContext::new().await;
    ctx.register("alice", test_password()).await;

    let wrong_password = ctx
        .server
        .post("/auth/login")
        .json(&json!({ "username": "alice", "password": "nope" }))
        .await;
    let unknown_user = ctx
        .server
        .post("/auth/login")
        .json(&json!({ "username": "nobody", "password": test_password() }))
        .await;

    wrong_password.assert_status(StatusCode::UNAUTHORIZED);
    unknown_user.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.json::<Value>(), unknown_user.json::<Value>());
}

#[tokio::test]
async fn inactive_user_cannot_log_in() {
    let ctx = TestContext::new().await;
    ctx.users
        .create(&User {
            id: "dormant-id".to_string(),
            username: "dormant".to_string(),
            email: "dormant@example.com".to_string(),
            password_hash: hashing::hash_password(test_password()).unwrap(),
            first_name: String::new(),
            last_name: String::new(),
            is_staff: false,
            is_superuser: false,
            is_active: false,
            date_joined: ctx.clock.utc(),
        })
        .await
        .unwrap();

    let response = ctx
        .server
        .post("/auth/login")
        .json(&json!({ "username": "dormant", "password": test_password() }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
