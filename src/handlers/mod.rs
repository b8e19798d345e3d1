pub mod webhook;

use axum::Json;
use utoipa::OpenApi;

use crate::health::HealthResponse;
use crate::services::TransferRequest;
use webhook::{AcknowledgedResponse, TransactionResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::health::health,
        webhook::receive_transaction,
        webhook::get_transaction,
    ),
    components(schemas(
        TransferRequest,
        AcknowledgedResponse,
        TransactionResponse,
        crate::domain::TransactionStatus,
        HealthResponse,
    )),
    tags(
        (name = "Transactions", description = "Transfer webhook intake and lookup"),
        (name = "Health", description = "Liveness")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
