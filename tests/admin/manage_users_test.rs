use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::common::{test_password, TestContext};

#[tokio::test]
async fn dashboard_shows_users_and_totals() {
    let ctx = TestContext::new().await;
    let (_, admin) = ctx.admin_token().await;
    let (_, alice) = ctx.register_and_login("alice").await;
    ctx.create_task(&alice, "Alice's task", "2024-05-20").await;

    let response = ctx.server.get("/admin/dashboard").authorization_bearer(&admin).await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["total_users"], 2);
    assert_eq!(body["active_users"], 2);
    assert_eq!(body["admin_count"], 1);
    assert_eq!(body["total_tasks"], 1);
    assert_eq!(body["users"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn admin_creates_user_who_can_log_in() {
    let ctx = TestContext::new().await;
    let (_, admin) = ctx.admin_token().await;

    let response = ctx
        .server
        .post("/admin/create")
        .authorization_bearer(&admin)
        .json(&json!({
            "username": "carol",
            "email": "carol@example.com",
            "password": "carol-pw",
            "is_staff": true,
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["user"]["is_staff"], true);
    assert_eq!(body["message"], "User 'carol' created successfully.");
    ctx.login("carol", "carol-pw").await;
}

#[tokio::test]
async fn create_conflicts_on_existing_username() {
    let ctx = TestContext::new().await;
    let (_, admin) = ctx.admin_token().await;
    ctx.register("alice", test_password()).await;

    let response = ctx
        .server
        .post("/admin/create")
        .authorization_bearer(&admin)
        .json(&json!({ "username": "alice", "email": "new@example.com", "password": "secret1" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"], "Username 'alice' already exists.");
}

#[tokio::test]
async fn edit_updates_profile_fields() {
    let ctx = TestContext::new().await;
    let (_, admin) = ctx.admin_token().await;
    let (alice_id, _) = ctx.register_and_login("alice").await;

    let response = ctx
        .server
        .post(&format!("/admin/edit/{}", alice_id))
        .authorization_bearer(&admin)
        .json(&json!({
            "username": "alice",
            "email": "alice.new@example.com",
            "first_name": "Alice",
            "last_name": "Liddell",
        }))
        .await;

    response.assert_status(StatusCode::OK);
    let user = &response.json::<Value>()["user"];
    assert_eq!(user["email"], "alice.new@example.com");
    assert_eq!(user["last_name"], "Liddell");
}

#[tokio::test]
async fn edit_conflicts_with_other_users_name() {
    let ctx = TestContext::new().await;
    let (_, admin) = ctx.admin_token().await;
    let (alice_id, _) = ctx.register_and_login("alice").await;
    ctx.register("bob", test_password()).await;

    let response = ctx
        .server
        .post(&format!("/admin/edit/{}", alice_id))
        .authorization_bearer(&admin)
        .json(&json!({ "username": "bob", "email": "alice@example.com" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"], "Username 'bob' is already taken.");
}

#[tokio::test]
async fn admin_sets_password_for_user() {
    let ctx = TestContext::new().await;
    let (_, admin) = ctx.admin_token().await;
    let (alice_id, _) = ctx.register_and_login("alice").await;

    ctx.server
        .post(&format!("/admin/password/{}", alice_id))
        .authorization_bearer(&admin)
        .json(&json!({ "new_password": "admin-set", "confirm_password": "admin-set" }))
        .await
        .assert_status(StatusCode::OK);

    ctx.login("alice", "admin-set").await;
}

#[tokio::test]
async fn admin_cannot_delete_own_account() {
    let ctx = TestContext::new().await;
    let (admin_id, admin) = ctx.admin_token().await;

    let response = ctx
        .server
        .post(&format!("/admin/delete/{}", admin_id))
        .authorization_bearer(&admin)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "You cannot delete your own account.");
}

#[tokio::test]
async fn deleting_user_removes_their_tasks_and_access() {
    let ctx = TestContext::new().await;
    let (_, admin) = ctx.admin_token().await;
    let (alice_id, alice) = ctx.register_and_login("alice").await;
    ctx.create_task(&alice, "Alice's task", "2024-05-20").await;

    ctx.server
        .post(&format!("/admin/delete/{}", alice_id))
        .authorization_bearer(&admin)
        .await
        .assert_status(StatusCode::OK);

    let dashboard: Value = ctx
        .server
        .get("/admin/dashboard")
        .authorization_bearer(&admin)
        .await
        .json();
    assert_eq!(dashboard["total_users"], 1);
    assert_eq!(dashboard["total_tasks"], 0);

    ctx.server
        .get("/tasks/my-tasks")
        .authorization_bearer(&alice)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_views_user_tasks() {
    let ctx = TestContext::new().await;
    let (_, admin) = ctx.admin_token().await;
    let (alice_id, alice) = ctx.register_and_login("alice").await;
    ctx.create_task(&alice, "Alice's task", "2024-05-20").await;

    let response = ctx
        .server
        .get(&format!("/admin/tasks/{}", alice_id))
        .authorization_bearer(&admin)
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["tasks"][0]["title"], "Alice's task");
}
