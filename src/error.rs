use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::ports::RepositoryError;
use crate::services::IntakeError;
use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    fn public_message(&self) -> String {
        match self {
            // Store details go to the log, not to the caller.
            AppError::Database(RepositoryError::NotFound(id)) => {
                format!("Transaction {} not found", id)
            }
            AppError::Database(_) => "Database error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<IntakeError> for AppError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::Validation(e) => e.into(),
            IntakeError::Store(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        let body = Json(json!({
            "error": self.public_message(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_status_code() {
        let error = AppError::Validation("Invalid input".to_string());
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_status_code() {
        let error = AppError::NotFound("Resource not found".to_string());
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_database_error_status_code() {
        let error = AppError::Database(RepositoryError::Database("boom".into()));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_database_not_found_maps_to_404() {
        let error = AppError::Database(RepositoryError::NotFound("t9".into()));
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.public_message(), "Transaction t9 not found");
    }

    #[test]
    fn test_database_error_hides_details() {
        let error = AppError::Database(RepositoryError::Database("password=hunter2".into()));
        assert_eq!(error.public_message(), "Database error");
    }

    #[test]
    fn test_intake_validation_maps_to_bad_request() {
        let error: AppError =
            IntakeError::Validation(ValidationError::new("amount", "must be a number")).into();
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error.to_string(),
            "Validation error: amount: must be a number"
        );
    }

    #[tokio::test]
    async fn test_method_not_allowed_response() {
        let response = AppError::MethodNotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_database_error_response_is_generic() {
        let response =
            AppError::Database(RepositoryError::Database("connection reset".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "Database error");
        assert_eq!(json["status"], 500);
    }
}
