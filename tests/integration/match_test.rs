//! Integration tests for the tutor match endpoint.

use axum::http::StatusCode;
use uuid::Uuid;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_fallback_returns_lowest_grade_tutor() {
    let app = TestApp::new();
    app.create_user("alice", "tutor", 5).await;
    app.create_user("bob", "tutor", 3).await;
    let carl = app.create_user("carl", "student", 7).await;

    let response = app
        .request("GET", &format!("/api/match-tutor?userId={carl}"), None, None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Tutor matched!");
    assert_eq!(response.body["tutor"]["username"], "bob");
    assert_eq!(response.body["tutor"]["grade"], 3);
}

#[tokio::test]
async fn test_exact_grade_match() {
    let app = TestApp::new();
    app.create_user("bob", "tutor", 3).await;
    app.create_user("alice", "tutor", 7).await;
    let carl = app.create_user("carl", "student", 7).await;

    let response = app
        .request("GET", &format!("/api/match-tutor?userId={carl}"), None, None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["tutor"]["username"], "alice");
}

#[tokio::test]
async fn test_invalid_user_id() {
    let app = TestApp::new();

    for path in ["/api/match-tutor", "/api/match-tutor?userId=", "/api/match-tutor?userId=42"] {
        let response = app.request("GET", path, None, None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(response.body["message"], "Invalid user ID format.");
    }
}

#[tokio::test]
async fn test_not_found_outcomes() {
    let app = TestApp::new();

    let response = app
        .request("GET", &format!("/api/match-tutor?userId={}", Uuid::new_v4()), None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Student not found.");

    let carl = app.create_user("carl", "student", 7).await;
    let response = app
        .request("GET", &format!("/api/match-tutor?userId={carl}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "No available tutors at this time.");
}

#[tokio::test]
async fn test_tutor_cannot_request_match() {
    let app = TestApp::new();
    let erin = app.create_user("erin", "tutor", 5).await;

    let response = app
        .request("GET", &format!("/api/match-tutor?userId={erin}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Invalid student role.");
}
