use axum::http::StatusCode;
use chrono::Duration;
use serde_json::{json, Value};
use taskboard::services::mailer::MemoryMailer;

use crate::common::{test_password, TestContext, MAIL_FROM};

async fn request_code(ctx: &TestContext, email: &str) -> axum_test::TestResponse {
    ctx.server
        .post("/auth/forgot-password")
        .json(&json!({ "step": "email", "email": email }))
        .await
}

async fn verify_code(ctx: &TestContext, email: &str, code: &str) -> axum_test::TestResponse {
    ctx.server
        .post("/auth/forgot-password")
        .json(&json!({ "step": "verify", "email": email, "reset_code": code }))
        .await
}

async fn set_password(ctx: &TestContext, email: &str, new: &str, confirm: &str) -> axum_test::TestResponse {
    ctx.server
        .post("/auth/forgot-password")
        .json(&json!({
            "step": "reset",
            "email": email,
            "new_password": new,
            "confirm_password": confirm,
        }))
        .await
}

// =============================================================================
// FULL FLOW
// =============================================================================

#[tokio::test]
async fn full_reset_flow_changes_password() {
    let ctx = TestContext::new().await;
    ctx.register("alice", test_password()).await;

    let response = request_code(&ctx, "alice@example.com").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["step"], "code");
    assert_eq!(body["email"], "alice@example.com");

    let mail = ctx.mailer.last().unwrap();
    assert_eq!(mail.subject, "Password Reset Code");
    assert_eq!(mail.from, MAIL_FROM);
    assert_eq!(mail.to, vec!["alice@example.com".to_string()]);
    assert!(mail.body.contains("15 minutes"));

    let code = ctx.last_reset_code();
    let response = verify_code(&ctx, "alice@example.com", &code).await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Value>()["step"], "new_password");

    let response = set_password(&ctx, "alice@example.com", "fresh-password", "fresh-password").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["step"], "done");
    assert!(body.get("email").is_none());

    ctx.login("alice", "fresh-password").await;
}

#[tokio::test]
async fn code_cannot_be_reused_after_reset() {
    let ctx = TestContext::new().await;
    ctx.register("alice", test_password()).await;
    request_code(&ctx, "alice@example.com").await;
    let code = ctx.last_reset_code();
    verify_code(&ctx, "alice@example.com", &code).await;
    set_password(&ctx, "alice@example.com", "fresh-password", "fresh-password")
        .await
        .assert_status(StatusCode::OK);

    let response = set_password(&ctx, "alice@example.com", "another-pass", "another-pass").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["step"], "email");
    assert!(body["message"].as_str().unwrap().contains("already been used"));
    ctx.login("alice", "fresh-password").await;
}

// =============================================================================
// STEP 1
// =============================================================================

#[tokio::test]
async fn unknown_email_gets_generic_answer_and_no_mail() {
    let ctx = TestContext::new().await;

    let response = request_code(&ctx, "ghost@example.com").await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Value>()["step"], "email");
    assert!(ctx.mailer.outbox().is_empty());
    assert!(ctx.reset_codes.is_empty());
}

#[tokio::test]
async fn blank_email_is_rejected() {
    let ctx = TestContext::new().await;

    let response = request_code(&ctx, "   ").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "Please enter your email address.");
}

#[tokio::test]
async fn failed_delivery_reports_bad_gateway() {
    let ctx = TestContext::with_mailer(MemoryMailer::failing()).await;
    ctx.register("alice", test_password()).await;

    let response = request_code(&ctx, "alice@example.com").await;

    response.assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn new_request_supersedes_previous_code() {
    let ctx = TestContext::new().await;
    ctx.register("alice", test_password()).await;

    request_code(&ctx, "alice@example.com").await;
    let first = ctx.last_reset_code();
    request_code(&ctx, "alice@example.com").await;
    let second = ctx.last_reset_code();

    assert_eq!(ctx.reset_codes.len(), 1);
    if first != second {
        verify_code(&ctx, "alice@example.com", &first)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
    verify_code(&ctx, "alice@example.com", &second)
        .await
        .assert_status(StatusCode::OK);
}

// =============================================================================
// STEP 2
// =============================================================================

#[tokio::test]
async fn wrong_code_stays_on_code_step() {
    let ctx = TestContext::new().await;
    ctx.register("alice", test_password()).await;
    request_code(&ctx, "alice@example.com").await;
    let code = ctx.last_reset_code();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let response = verify_code(&ctx, "alice@example.com", wrong).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["step"], "code");
    assert_eq!(body["email"], "alice@example.com");
}

#[tokio::test]
async fn code_expires_after_fifteen_minutes() {
    let ctx = TestContext::new().await;
    ctx.register("alice", test_password()).await;
    request_code(&ctx, "alice@example.com").await;
    let code = ctx.last_reset_code();

    ctx.clock.advance(Duration::minutes(14) + Duration::seconds(59));
    verify_code(&ctx, "alice@example.com", &code)
        .await
        .assert_status(StatusCode::OK);

    ctx.clock.advance(Duration::seconds(2));
    let response = verify_code(&ctx, "alice@example.com", &code).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["step"], "email");
    assert!(body["message"].as_str().unwrap().contains("expired"));
}

#[tokio::test]
async fn verify_without_request_is_invalid() {
    let ctx = TestContext::new().await;
    ctx.register("alice", test_password()).await;

    let response = verify_code(&ctx, "alice@example.com", "123456").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "Invalid request. Please start over.");
}

// =============================================================================
// STEP 3
// =============================================================================

#[tokio::test]
async fn mismatched_passwords_keep_code_usable() {
    let ctx = TestContext::new().await;
    ctx.register("alice", test_password()).await;
    request_code(&ctx, "alice@example.com").await;
    let code = ctx.last_reset_code();
    verify_code(&ctx, "alice@example.com", &code).await;

    let response = set_password(&ctx, "alice@example.com", "fresh-password", "other-password").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["step"], "new_password");

    set_password(&ctx, "alice@example.com", "fresh-password", "fresh-password")
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn reset_after_expiry_is_refused() {
    let ctx = TestContext::new().await;
    ctx.register("alice", test_password()).await;
    request_code(&ctx, "alice@example.com").await;
    let code = ctx.last_reset_code();
    verify_code(&ctx, "alice@example.com", &code).await;

    ctx.clock.advance(Duration::minutes(16));
    let response = set_password(&ctx, "alice@example.com", "fresh-password", "fresh-password").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    ctx.login("alice", test_password()).await;
}

#[tokio::test]
async fn unknown_step_is_unprocessable() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/forgot-password")
        .json(&json!({ "step": "skip-ahead", "email": "alice@example.com" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}
