//! Integration tests for registration and login.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_register_login_me() {
    let app = TestApp::new();

    let response = app.register("erin", "secret", "tutor", 5).await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["message"], "User registered successfully!");

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "erin", "password": "secret" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Login successful!");
    let token = response.body["token"].as_str().unwrap().to_string();

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["username"], "erin");
    assert_eq!(me.body["role"], "tutor");
    assert_eq!(me.body["grade"], 5);
    assert!(me.body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_duplicate_username() {
    let app = TestApp::new();
    app.register("erin", "secret", "tutor", 5).await;

    let response = app.register("erin", "other", "student", 3).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Username already exists.");
}

#[tokio::test]
async fn test_register_requires_all_fields() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "username": "erin", "role": "tutor", "grade": 5 })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "All fields are required.");
}

#[tokio::test]
async fn test_login_failures() {
    let app = TestApp::new();
    app.register("erin", "secret", "tutor", 5).await;

    let unknown = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "nobody", "password": "secret" })),
            None,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown.body["message"], "User not found. Please register.");

    let wrong = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "username": "erin", "password": "wrong" })),
            None,
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["message"], "Incorrect password.");
}

#[tokio::test]
async fn test_me_rejects_bad_token() {
    let app = TestApp::new();

    let response = app
        .request("GET", "/api/auth/me", None, Some("not.a.jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
