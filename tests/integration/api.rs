//! HTTP surface, driven through the router without binding a socket.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use trendcast::config::AppConfig;
use trendcast::prompt::PromptBuilder;
use trendcast::server::{build_router, ServerState};
use trendcast::types::ForecastMethod;

fn app_with(cfg: &AppConfig) -> Router {
    build_router(Arc::new(ServerState::from_config(cfg)))
}

fn app() -> Router {
    app_with(&AppConfig::default())
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 10_000_000).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn chat_request(body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/v1/chat/completions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn user_chat(prompt: &str) -> Request<Body> {
    chat_request(json!({ "model": "anything", "messages": [{ "role": "user", "content": prompt }] }))
}

/// Decode the forecast bundle embedded in the assistant message.
fn embedded_bundle(resp: &Value) -> Value {
    let content = resp["choices"][0]["message"]["content"].as_str().unwrap();
    serde_json::from_str(content).unwrap()
}

#[tokio::test]
async fn test_health_always_healthy() {
    let (status, json) = send(app(), Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_models_lists_configured_model() {
    let mut cfg = AppConfig::default();
    cfg.model.id = "custom-model".to_string();
    let (status, json) = send(app_with(&cfg), Request::get("/v1/models").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["id"], "custom-model");
    assert_eq!(json["data"][0]["owned_by"], "local");
}

#[tokio::test]
async fn test_chat_completion_perfect_line() {
    let (status, json) = send(app(), user_chat("Last 5 values:\n1,2,3,4,5\nForecast the next 3 steps")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["object"], "chat.completion");
    assert_eq!(json["model"], "trendcast-linear");
    assert_eq!(json["choices"][0]["finish_reason"], "stop");

    let bundle = embedded_bundle(&json);
    let p50: Vec<f64> = serde_json::from_value(bundle["p50"].clone()).unwrap();
    let p10: Vec<f64> = serde_json::from_value(bundle["p10"].clone()).unwrap();
    let p90: Vec<f64> = serde_json::from_value(bundle["p90"].clone()).unwrap();
    for (i, expected) in [6.0, 7.0, 8.0].iter().enumerate() {
        assert!((p50[i] - expected).abs() < 1e-9);
        assert!((p10[i] - expected).abs() < 1e-9);
        assert!((p90[i] - expected).abs() < 1e-9);
    }
    assert_eq!(bundle["quality_flags"], json!(["LOW_DATA"]));
    assert!(bundle["notes"].as_str().unwrap().contains("n=5"));
}

#[tokio::test]
async fn test_default_horizon_is_100() {
    let (status, json) = send(app(), user_chat("Last values:\n4, 5, 6")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(embedded_bundle(&json)["p50"].as_array().unwrap().len(), 100);
}

#[tokio::test]
async fn test_built_prompt_accepted() {
    let history: Vec<f64> = (0..60).map(|i| 50.0 + (i % 5) as f64).collect();
    let prompt = PromptBuilder::new(12).build(&history);
    let (status, json) = send(app(), user_chat(&prompt)).await;
    assert_eq!(status, StatusCode::OK);
    let bundle = embedded_bundle(&json);
    assert_eq!(bundle["p50"].as_array().unwrap().len(), 12);
    assert_eq!(bundle["quality_flags"], json!([]));
}

#[tokio::test]
async fn test_drift_method_from_config() {
    let mut cfg = AppConfig::default();
    cfg.forecast.method = ForecastMethod::Drift;
    let (status, json) = send(app_with(&cfg), user_chat("Last values:\n100\nForecast the next 1")).await;
    assert_eq!(status, StatusCode::OK);
    let bundle = embedded_bundle(&json);
    assert_eq!(bundle["p50"], json!([100.0]));
    assert_eq!(bundle["p90"], json!([115.0]));
}

#[tokio::test]
async fn test_empty_messages_is_400() {
    let (status, json) = send(app(), chat_request(json!({ "messages": [] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No messages provided");
}

#[tokio::test]
async fn test_missing_messages_is_400() {
    let (status, json) = send(app(), chat_request(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No messages provided");
}

#[tokio::test]
async fn test_system_only_is_400() {
    let body = json!({ "messages": [{ "role": "system", "content": "Last values:\n1,2" }] });
    let (status, json) = send(app(), chat_request(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No user message found");
}

#[tokio::test]
async fn test_null_content_before_user_message_is_ok() {
    let body = json!({
        "messages": [
            { "role": "system", "content": null },
            { "role": "user", "content": "Last values:\n1,2,3\nForecast the next 2" }
        ]
    });
    let (status, json) = send(app(), chat_request(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(embedded_bundle(&json)["p50"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unparseable_prompt_is_400() {
    let (status, json) = send(app(), user_chat("Forecast the next 10 values of something")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Could not parse time-series data from prompt");
}

#[tokio::test]
async fn test_horizon_above_cap_is_400() {
    let mut cfg = AppConfig::default();
    cfg.forecast.max_horizon = 1000;
    let (status, json) = send(app_with(&cfg), user_chat("Last values:\n1,2\nForecast the next 1001")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("1001"));
}

#[tokio::test]
async fn test_numeric_overflow_is_500() {
    let prompt = format!("Last values:\n{:e}, {:e}, {:e}", f64::MAX, -f64::MAX, f64::MAX);
    let (status, json) = send(app(), user_chat(&prompt)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().starts_with("Invalid forecast"));
}
