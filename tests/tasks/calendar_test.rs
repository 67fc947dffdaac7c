use axum::http::StatusCode;
use chrono::Duration;
use serde_json::Value;

use crate::common::TestContext;

#[tokio::test]
async fn calendar_defaults_to_current_month() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.register_and_login("alice").await;
    ctx.create_task(&token, "in may", "2024-05-03").await;
    ctx.create_task(&token, "in june", "2024-06-03").await;

    let response = ctx.server.get("/tasks/calendar").authorization_bearer(&token).await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["year"], 2024);
    assert_eq!(body["month"], 5);
    assert_eq!(body["days"]["3"][0]["title"], "in may");
    assert_eq!(body["days"].as_object().unwrap().len(), 1);
}

#[tokio::test]
async fn calendar_groups_by_day_newest_first() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.register_and_login("alice").await;
    ctx.create_task(&token, "older", "2024-02-29").await;
    ctx.clock.advance(Duration::minutes(5));
    ctx.create_task(&token, "newer", "2024-02-29").await;
    ctx.create_task(&token, "first day", "2024-02-01").await;

    let response = ctx
        .server
        .get("/tasks/calendar")
        .add_query_param("year", 2024)
        .add_query_param("month", 2)
        .authorization_bearer(&token)
        .await;

    let body: Value = response.json();
    let leap_day: Vec<&str> = body["days"]["29"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(leap_day, vec!["newer", "older"]);
    assert_eq!(body["days"]["1"][0]["title"], "first day");
}

#[tokio::test]
async fn month_thirteen_rolls_into_next_year() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.register_and_login("alice").await;
    ctx.create_task(&token, "new year", "2025-01-01").await;

    let response = ctx
        .server
        .get("/tasks/calendar")
        .add_query_param("year", 2024)
        .add_query_param("month", 13)
        .authorization_bearer(&token)
        .await;

    let body: Value = response.json();
    assert_eq!(body["year"], 2025);
    assert_eq!(body["month"], 1);
    assert_eq!(body["days"]["1"][0]["title"], "new year");
}

#[tokio::test]
async fn month_zero_rolls_into_previous_year() {
    let ctx = TestContext::new().await;
    let (_, token) = ctx.register_and_login("alice").await;

    let response = ctx
        .server
        .get("/tasks/calendar")
        .add_query_param("year", 2024)
        .add_query_param("month", 0)
        .authorization_bearer(&token)
        .await;

    let body: Value = response.json();
    assert_eq!(body["year"], 2023);
    assert_eq!(body["month"], 12);
}
