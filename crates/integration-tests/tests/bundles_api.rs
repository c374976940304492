//! Integration tests for bundle creation and listing.
//!
//! Run with: cargo test -p bundle-kit-integration-tests --test bundles_api

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use bundle_kit_core::{BundleOperationStatus, Price};
use bundle_kit_integration_tests::{
    BUNDLE_PRODUCT_ID, Script, TestApp, listed, test_config,
};

fn three_products() -> Script {
    Script::default()
        .with_product(101, &["Red", "Blue"])
        .with_product(102, &["Small"])
        .with_product(103, &["Oak", "Pine"])
}

fn save_body(ids: &[Value], prices: &[&str]) -> Value {
    let products: Vec<Value> = ids
        .iter()
        .zip(prices)
        .map(|(id, price)| {
            json!({
                "id": id,
                "title": format!("Product {id}"),
                "imageSrc": "",
                "price": price,
            })
        })
        .collect();
    json!({
        "title": "Weekend Kit",
        "selectedProducts": products,
    })
}

#[tokio::test]
async fn test_create_bundle_end_to_end() {
    let app = TestApp::new(three_products()).await;

    let body = save_body(
        &[json!(101), json!("102"), json!("gid://shopify/Product/103")],
        &["10.00", "5.5", "abc"],
    );
    let response = app.call(Method::POST, "/api/save-bundle", Some(body)).await;

    assert_eq!(response.status, StatusCode::OK, "{}", response.text);
    assert_eq!(response.json["message"], "Bundle created successfully");
    assert_eq!(response.json["productId"], "7001");
    assert_eq!(
        response.json["productEditUrl"],
        "https://admin.shopify.com/store/bundle-demo/products/7001"
    );
    assert_eq!(response.json["price"], "15.50");
    assert_eq!(response.json["priceSet"], true);

    let calls = app.catalog.calls();
    assert_eq!(calls.lookups.len(), 1);
    assert_eq!(calls.lookups[0].len(), 3);
    assert_eq!(calls.creates.len(), 1);
    assert_eq!(calls.polls, 2);

    let input = &calls.creates[0];
    assert_eq!(input.title, "Weekend Kit");
    let first_values: Vec<_> = input
        .components
        .iter()
        .map(|c| c.option_selections[0].value.as_str())
        .collect();
    assert_eq!(first_values, vec!["Red", "Small", "Oak"]);
    assert!(input.components.iter().all(|c| c.quantity == 1));

    assert_eq!(calls.price_updates.len(), 1);
    let (product, _, price) = &calls.price_updates[0];
    assert_eq!(product, BUNDLE_PRODUCT_ID);
    assert_eq!(*price, Price::parse("15.50").unwrap());
}

#[tokio::test]
async fn test_server_price_wins_over_client_price() {
    let app = TestApp::new(three_products()).await;

    let mut body = save_body(&[json!(101), json!(102)], &["4.00", "6.00"]);
    body["price"] = json!("1.00");
    let response = app.call(Method::POST, "/api/save-bundle", Some(body)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["price"], "10.00");
    assert_eq!(
        app.catalog.calls().price_updates[0].2,
        Price::parse("10").unwrap()
    );
}

#[tokio::test]
async fn test_unresolved_product_issues_no_mutation() {
    let app = TestApp::new(three_products()).await;

    let body = save_body(&[json!(101), json!(999)], &["1", "2"]);
    let response = app.call(Method::POST, "/api/save-bundle", Some(body)).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json["message"], "Failed to create bundle");
    assert_eq!(response.json["kind"], "resolution");
    assert!(
        response.json["error"]
            .as_str()
            .unwrap()
            .contains("gid://shopify/Product/999")
    );

    let calls = app.catalog.calls();
    assert!(calls.creates.is_empty());
    assert_eq!(calls.polls, 0);
    assert!(calls.price_updates.is_empty());
}

#[tokio::test]
async fn test_user_error_is_reported_verbatim() {
    let mut script = three_products();
    script.create_errors = vec!["Title can't be blank in this context".to_string()];
    let app = TestApp::new(script).await;

    let body = save_body(&[json!(101)], &["1"]);
    let response = app.call(Method::POST, "/api/save-bundle", Some(body)).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json["kind"], "mutation");
    assert_eq!(
        response.json["error"],
        "Title can't be blank in this context"
    );
    assert_eq!(app.catalog.calls().polls, 0);
}

#[tokio::test]
async fn test_failed_operation() {
    let script = three_products().with_statuses(&[
        BundleOperationStatus::Pending,
        BundleOperationStatus::Pending,
        BundleOperationStatus::Failed,
    ]);
    let app = TestApp::new(script).await;

    let body = save_body(&[json!(101)], &["1"]);
    let response = app.call(Method::POST, "/api/save-bundle", Some(body)).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json["kind"], "operation_failed");
    assert!(
        response.json["error"]
            .as_str()
            .unwrap()
            .contains("Bundle components are invalid")
    );

    let calls = app.catalog.calls();
    assert_eq!(calls.polls, 3);
    assert!(calls.price_updates.is_empty());
}

#[tokio::test]
async fn test_pending_forever_times_out() {
    let mut config = test_config();
    config.bundles.poll_max_attempts = 4;
    config.bundles.poll_interval = Duration::from_millis(1);
    let script = three_products().with_statuses(&[BundleOperationStatus::Pending]);
    let app = TestApp::with_config(script, config).await;

    let body = save_body(&[json!(101)], &["1"]);
    let response = app.call(Method::POST, "/api/save-bundle", Some(body)).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json["kind"], "timed_out");
    assert_eq!(app.catalog.calls().polls, 4);
}

#[tokio::test]
async fn test_shutdown_cancels_polling() {
    let app = TestApp::new(three_products()).await;
    app.shutdown.cancel();

    let body = save_body(&[json!(101)], &["1"]);
    let response = app.call(Method::POST, "/api/save-bundle", Some(body)).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json["kind"], "cancelled");
    assert_eq!(app.catalog.calls().polls, 0);
}

#[tokio::test]
async fn test_price_failure_still_reports_product() {
    let mut script = three_products();
    script.price_error = Some("Price must be positive".to_string());
    let app = TestApp::new(script).await;

    let body = save_body(&[json!(101), json!(102)], &["3", "4"]);
    let response = app.call(Method::POST, "/api/save-bundle", Some(body)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["productId"], "7001");
    assert_eq!(response.json["priceSet"], false);
    assert_eq!(response.json["price"], "7.00");
    assert!(
        response.json["error"]
            .as_str()
            .unwrap()
            .contains("Price must be positive")
    );
}

#[tokio::test]
async fn test_bundle_without_variant_is_partial_success() {
    let mut script = three_products();
    script.bundle_has_variant = false;
    let app = TestApp::new(script).await;

    let body = save_body(&[json!(101)], &["3"]);
    let response = app.call(Method::POST, "/api/save-bundle", Some(body)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["productId"], "7001");
    assert_eq!(response.json["priceSet"], false);
}

#[tokio::test]
async fn test_invalid_requests_are_rejected_before_shopify() {
    let app = TestApp::new(three_products()).await;

    let cases = [
        json!({ "title": "", "selectedProducts": [{ "id": 101 }] }),
        json!({ "title": "   ", "selectedProducts": [{ "id": 101 }] }),
        json!({ "title": "Kit", "selectedProducts": [] }),
        json!({ "title": "Kit" }),
        json!({ "title": "Kit", "selectedProducts": [{ "id": "gid://shopify/Collection/4" }] }),
        json!({ "title": "Kit", "selectedProducts": [{ "id": 0 }] }),
        json!({ "title": "Kit", "selectedProducts": "101" }),
    ];

    for body in cases {
        let response = app
            .call(Method::POST, "/api/save-bundle", Some(body.clone()))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body: {body}");
        assert!(response.json["message"].is_string(), "body: {body}");
    }

    let calls = app.catalog.calls();
    assert!(calls.lookups.is_empty());
    assert!(calls.creates.is_empty());
}

#[tokio::test]
async fn test_too_many_products_is_rejected() {
    let app = TestApp::new(three_products()).await;

    let ids: Vec<Value> = (1..=31).map(|n| json!(n)).collect();
    let prices = vec!["1"; 31];
    let response = app
        .call(Method::POST, "/api/save-bundle", Some(save_body(&ids, &prices)))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.catalog.calls().lookups.is_empty());
}

#[tokio::test]
async fn test_saturated_limiter_returns_429() {
    let mut config = test_config();
    config.bundles.max_concurrent_creations = 0;
    let app = TestApp::with_config(three_products(), config).await;

    let body = save_body(&[json!(101)], &["1"]);
    let response = app.call(Method::POST, "/api/save-bundle", Some(body)).await;

    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert!(app.catalog.calls().lookups.is_empty());
}

#[tokio::test]
async fn test_slots_are_released_after_each_request() {
    let mut config = test_config();
    config.bundles.max_concurrent_creations = 1;
    let app = TestApp::with_config(three_products(), config).await;

    for _ in 0..3 {
        let body = save_body(&[json!(101)], &["1"]);
        let response = app.call(Method::POST, "/api/save-bundle", Some(body)).await;
        assert_eq!(response.status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_get_bundles_filters_and_sorts() {
    let mut script = Script::default();
    script.listed = vec![
        listed(1, Some("10.00"), &["bundle"]),
        listed(2, Some("30.00"), &["Bundle", "summer"]),
        listed(3, Some("10.00"), &[" bundle "]),
        listed(4, Some("99.00"), &["bundles"]),
        listed(5, None, &["bundle"]),
    ];
    let app = TestApp::new(script).await;

    let response = app.call(Method::GET, "/api/get-bundles", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let ids: Vec<_> = response.json["bundles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        ids,
        vec![
            "gid://shopify/Product/2",
            "gid://shopify/Product/1",
            "gid://shopify/Product/3",
            "gid://shopify/Product/5",
        ]
    );

    let first = &response.json["bundles"][0];
    assert_eq!(first["handle"], "bundle-2");
    assert_eq!(first["variants"][0]["price"], "30.00");
}

#[tokio::test]
async fn test_get_bundles_empty() {
    let app = TestApp::new(Script::default()).await;

    let response = app.call(Method::GET, "/api/get-bundles", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json, json!({ "bundles": [] }));
}
