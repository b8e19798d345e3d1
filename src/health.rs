use axum::{Json, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{SERVICE_NAME, SERVICE_VERSION};
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub current_time: DateTime<Utc>,
    pub service: String,
    pub version: String,
}

impl HealthResponse {
    pub fn now() -> Self {
        Self {
            status: "HEALTHY".to_string(),
            current_time: Utc::now(),
            service: SERVICE_NAME.to_string(),
            version: SERVICE_VERSION.to_string(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 405, description = "Method not allowed")
    ),
    tag = "Health"
)]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::now())
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
