//! End-to-end tests for the prediction API.

use axum::http::StatusCode;
use serde_json::{json, Value};

mod common;

fn setosa() -> Value {
    json!({"sepal_length": 5.1, "sepal_width": 3.5, "petal_length": 1.4, "petal_width": 0.2})
}

fn versicolor() -> Value {
    json!({"sepal_length": 6.2, "sepal_width": 2.9, "petal_length": 4.3, "petal_width": 1.3})
}

#[tokio::test]
async fn test_single_prediction_is_plain_text() {
    let server = common::start_server(common::test_config()).await;
    let client = common::client();

    let res = client
        .post(server.url("/predict_single"))
        .json(&setosa())
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "Predicted species: setosa");
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let server = common::start_server(common::test_config()).await;

    let res = common::client()
        .get(server.url("/health"))
        .header("x-request-id", "req-42")
        .send()
        .await
        .unwrap();

    assert_eq!(res.headers()["x-request-id"], "req-42");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_batch_prediction() {
    let server = common::start_server(common::test_config()).await;

    let res = common::client()
        .post(server.url("/predict_batch"))
        .json(&json!({"features": [setosa(), versicolor()]}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({"predictions": ["setosa", "versicolor"], "count": 2})
    );
}

#[tokio::test]
async fn test_batch_failure_is_all_or_nothing() {
    let server =
        common::start_with_predictor(common::test_config(), Some(common::failing_above(6.0))).await;

    let res = common::client()
        .post(server.url("/predict_batch"))
        .json(&json!({"features": [setosa(), versicolor()]}))
        .send()
        .await
        .unwrap();

    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"error": "model backend error: runner crashed"}));
}

#[tokio::test]
async fn test_breaker_opens_after_repeated_failures() {
    let server =
        common::start_with_predictor(common::test_config(), Some(common::failing_above(0.0))).await;
    let client = common::client();

    for _ in 0..3 {
        let text = client
            .post(server.url("/predict_single"))
            .json(&setosa())
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(text, "Prediction failed");
    }

    let text = client
        .post(server.url("/predict_single"))
        .json(&setosa())
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(text, "Service temporarily unavailable");

    let body: Value = client
        .post(server.url("/predict_batch"))
        .json(&json!({"features": [setosa()]}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({"error": "Service temporarily unavailable"}));

    let status: Value = client
        .get(server.url("/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["breaker"]["state"], "open");
    assert_eq!(status["breaker"]["failure_count"], 3);
    assert_eq!(status["model_version"], "test");
}

#[tokio::test]
async fn test_rate_limit_rejects_excess_requests() {
    let mut config = common::test_config();
    config.rate_limit.single_per_minute = 2;
    let server = common::start_server(config).await;
    let client = common::client();

    for _ in 0..2 {
        let res = client
            .post(server.url("/predict_single"))
            .json(&setosa())
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = client
        .post(server.url("/predict_single"))
        .json(&setosa())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(res.text().await.unwrap(), "Rate limit exceeded");

    // Batch has its own budget
    let res = client
        .post(server.url("/predict_batch"))
        .json(&json!({"features": [setosa()]}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let server = common::start_server(common::test_config()).await;

    let res = common::client()
        .post(server.url("/predict_single"))
        .json(&json!({"sepal_length": 5.1}))
        .send()
        .await
        .unwrap();

    assert!(res.status().is_client_error());
}

#[tokio::test]
async fn test_status_reports_closed_breaker() {
    let server = common::start_server(common::test_config()).await;

    let status: Value = common::client()
        .get(server.url("/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(status["model"], "iris_classifier");
    assert_eq!(status["model_version"], "v1.0");
    assert_eq!(status["breaker"]["state"], "closed");
    assert_eq!(status["breaker"]["max_failures"], 3);
    assert_eq!(status["breaker"]["recovery_timeout_secs"], 60);
}
