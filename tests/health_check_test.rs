mod common;

use axum::http::StatusCode;
use serde_json::Value;

use common::{get, post_json, spawn_app};
use transaction_service::config::{SERVICE_NAME, SERVICE_VERSION};
use transaction_service::health::HealthResponse;

#[tokio::test]
async fn test_health_reports_service_identity() {
    let app = spawn_app();

    let (status, json) = get(&app.router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "HEALTHY");
    assert_eq!(json["service"], SERVICE_NAME);
    assert_eq!(json["version"], SERVICE_VERSION);
    assert!(json["current_time"].is_string());
}

#[tokio::test]
async fn test_health_rejects_other_methods() {
    let app = spawn_app();

    let (status, body) = post_json(&app.router, "/health", "{}".to_string()).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "Method not allowed");
}

#[test]
fn test_health_response_round_trips() {
    let json = serde_json::to_string(&HealthResponse::now()).unwrap();
    let parsed: HealthResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.status, "HEALTHY");
}
