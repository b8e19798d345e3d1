use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Transaction, TransactionStatus};
use crate::error::AppError;
use crate::ports::TransactionStore;
use crate::services::{Admission, TransferRequest};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AcknowledgedResponse {
    pub acknowledged: bool,
    pub transaction_id: String,
    pub status: String,
}

/// Read projection of a stored record, amount in major units.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransactionResponse {
    pub transaction_id: String,
    pub source_account: String,
    pub destination_account: String,
    pub amount: f64,
    pub currency: String,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(tx: Transaction) -> Self {
        Self {
            amount: tx.amount.to_major(),
            transaction_id: tx.transaction_id,
            source_account: tx.source_account,
            destination_account: tx.destination_account,
            currency: tx.currency,
            status: tx.status,
            created_at: tx.created_at,
            processed_at: tx.processed_at,
            updated_at: tx.updated_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/transactions",
    request_body = TransferRequest,
    responses(
        (status = 202, description = "Accepted; empty body when the id was already seen", body = AcknowledgedResponse),
        (status = 400, description = "Invalid payload"),
        (status = 500, description = "Store failure")
    ),
    tag = "Transactions"
)]
pub async fn receive_transaction(
    State(state): State<AppState>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    match state.intake.admit(request).await? {
        Admission::Accepted { transaction_id } => Ok((
            StatusCode::ACCEPTED,
            Json(AcknowledgedResponse {
                acknowledged: true,
                transaction_id,
                status: "processing".to_string(),
            }),
        )
            .into_response()),
        Admission::Duplicate => Ok(StatusCode::ACCEPTED.into_response()),
    }
}

#[utoipa::path(
    get,
    path = "/transactions/{id}",
    params(("id" = String, Path, description = "Transaction id supplied by the sender")),
    responses(
        (status = 200, description = "Stored transaction", body = TransactionResponse),
        (status = 404, description = "Unknown transaction id"),
        (status = 500, description = "Store failure")
    ),
    tag = "Transactions"
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tx = state
        .store
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", id)))?;

    Ok(Json(TransactionResponse::from(tx)))
}
