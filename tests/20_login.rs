mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;
use wiremock::{
    matchers::{body_partial_json, header, method, path, query_param},
    Mock, ResponseTemplate,
};

use common::{mock_sign_in, mock_table, subscription_row, TestApp};

#[tokio::test]
async fn empty_password_is_rejected_without_backend_call() -> Result<()> {
    let app = TestApp::spawn().await?;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.backend)
        .await;

    let res = app
        .post_json("/api/auth/login", json!({ "email": "ana@example.com", "password": "" }))
        .await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["message"], "Email and password are required");
    assert!(res.set_cookies().is_empty());
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_invalid_json() -> Result<()> {
    let app = TestApp::spawn().await?;
    let res = app.post_json("/api/auth/login", json!("not an object")).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["code"], "INVALID_JSON");
    Ok(())
}

#[tokio::test]
async fn rejected_credentials_return_401() -> Result<()> {
    let app = TestApp::spawn().await?;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&app.backend)
        .await;

    let res = app
        .post_json("/api/auth/login", json!({ "email": "ana@example.com", "password": "wrong" }))
        .await?;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.json()["message"], "Invalid credentials");
    Ok(())
}

#[tokio::test]
async fn login_returns_profile_subscription_and_cookies() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", "anon-key"))
        .and(body_partial_json(json!({ "email": "ana@example.com", "password": "secret123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::auth_session_body(user_id, "ana@example.com")))
        .expect(1)
        .mount(&app.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/users_profile"))
        .and(query_param("id", format!("eq.{}", user_id)))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": user_id,
            "name": "Ana",
            "age": "17",
            "instruction_category": "Escolar",
            "instruction_option": "5to de secundaria",
            "region": "Lima",
            "province": "Huaral"
        }])))
        .mount(&app.backend)
        .await;
    mock_table(
        &app.backend,
        "user_subscriptions",
        200,
        json!([subscription_row(user_id, "Premium", "2024-03-01T00:00:00+00:00", json!({ "sds_test": true }))]),
    )
    .await;

    let res = app
        .post_json("/api/auth/login", json!({ "email": "ana@example.com", "password": "secret123" }))
        .await?;

    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["user"]["id"], json!(user_id));
    assert_eq!(body["user"]["email"], "ana@example.com");
    assert_eq!(body["user"]["name"], "Ana");
    assert_eq!(body["user"]["profileData"]["province"], "Huaral");
    assert_eq!(body["user"]["subscription"]["packageName"], "Premium");
    assert_eq!(body["user"]["subscription"]["isPremium"], true);
    assert_eq!(body["user"]["subscription"]["features"]["sds_test"], true);
    assert_eq!(body["user"]["subscription"]["creditsRemaining"], 12);
    assert_eq!(body["session"]["access_token"], "provider-access-token");
    assert_eq!(body["session"]["refresh_token"], "provider-refresh-token");

    assert!(res.sets_cookie("is_logged_in"));
    assert!(res.sets_cookie("has_completed_onboarding"));
    Ok(())
}

#[tokio::test]
async fn failing_profile_lookup_still_logs_in_with_empty_name() -> Result<()> {
    let app = TestApp::spawn().await?;
    let user_id = Uuid::new_v4();
    mock_sign_in(&app.backend, user_id, "ana@example.com").await;
    mock_table(&app.backend, "users_profile", 500, json!({ "message": "boom" })).await;
    mock_table(&app.backend, "user_subscriptions", 500, json!({ "message": "boom" })).await;

    let res = app
        .post_json("/api/auth/login", json!({ "email": "ana@example.com", "password": "secret123" }))
        .await?;

    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["user"]["name"], "");
    assert!(body["user"].get("profileData").is_none());
    assert!(body["user"].get("subscription").is_none());
    assert!(res.sets_cookie("is_logged_in"));
    Ok(())
}

#[tokio::test]
async fn provider_outage_on_sign_in_is_500() -> Result<()> {
    let app = TestApp::spawn().await?;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&app.backend)
        .await;

    let res = app
        .post_json("/api/auth/login", json!({ "email": "ana@example.com", "password": "secret123" }))
        .await?;

    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    Ok(())
}
