//! Integration tests for merchant feedback.
//!
//! Run with: cargo test -p bundle-kit-integration-tests --test feedback_api

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use serde_json::json;

use bundle_kit_admin::db::{FeedbackRepository, FeedbackSummary};
use bundle_kit_integration_tests::{Script, TestApp};

#[tokio::test]
async fn test_good_feedback_persists_one_record() {
    let app = TestApp::new(Script::default()).await;

    let response = app
        .call(Method::POST, "/api/feedback", Some(json!({ "type": "good" })))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json,
        json!({ "message": "Feedback saved successfully" })
    );
    assert_eq!(app.feedback_rows().await, 1);

    let summary = FeedbackRepository::new(&app.pool)
        .count_by_kind()
        .await
        .unwrap();
    assert_eq!(summary, FeedbackSummary { good: 1, bad: 0 });
}

#[tokio::test]
async fn test_unknown_feedback_type_persists_nothing() {
    let app = TestApp::new(Script::default()).await;

    for body in [
        json!({ "type": "sideways" }),
        json!({ "type": "GOOD" }),
        json!({ "type": 1 }),
        json!({}),
    ] {
        let response = app
            .call(Method::POST, "/api/feedback", Some(body.clone()))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(
            response.json,
            json!({ "message": "Invalid feedback type" }),
            "body: {body}"
        );
    }

    assert_eq!(app.feedback_rows().await, 0);
}

#[tokio::test]
async fn test_feedback_accumulates() {
    let app = TestApp::new(Script::default()).await;

    for kind in ["good", "bad", "bad"] {
        let response = app
            .call(Method::POST, "/api/feedback", Some(json!({ "type": kind })))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let summary = FeedbackRepository::new(&app.pool)
        .count_by_kind()
        .await
        .unwrap();
    assert_eq!(summary, FeedbackSummary { good: 1, bad: 2 });
}

#[tokio::test]
async fn test_storage_failure_is_500() {
    let app = TestApp::new(Script::default()).await;
    app.pool.close().await;

    let response = app
        .call(Method::POST, "/api/feedback", Some(json!({ "type": "bad" })))
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json["message"], "Failed to save feedback");
    assert!(response.json["error"].is_string());
}

#[tokio::test]
async fn test_feedback_requires_session() {
    let app = TestApp::new(Script::default()).await;

    let response = app
        .call_with_auth(
            Method::POST,
            "/api/feedback",
            Some(json!({ "type": "good" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.feedback_rows().await, 0);
}
