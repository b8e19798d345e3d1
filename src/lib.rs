pub mod adapters;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod ports;
pub mod services;
pub mod startup;
pub mod utils;
pub mod validation;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::middleware::{request_logger_middleware, RequestLogSettings};
use crate::ports::TransactionStore;
use crate::services::IntakeGate;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TransactionStore>,
    pub intake: IntakeGate,
    pub request_log: RequestLogSettings,
}

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let request_log = state.request_log;

    Router::new()
        .route(
            "/health",
            get(health::health).fallback(health::method_not_allowed),
        )
        .route("/transactions", post(handlers::webhook::receive_transaction))
        .route(
            "/v1/webhooks/transactions",
            post(handlers::webhook::receive_transaction),
        )
        .route("/transactions/:id", get(handlers::webhook::get_transaction))
        .route("/v1/transactions/:id", get(handlers::webhook::get_transaction))
        .route("/api-docs/openapi.json", get(handlers::openapi_json))
        .layer(cors)
        .layer(axum::middleware::from_fn_with_state(
            request_log,
            request_logger_middleware,
        ))
        .with_state(state)
}
