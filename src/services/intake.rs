//! Admission of inbound transfer notifications.
//!
//! An id is admitted at most once: the dedup registry absorbs rapid redelivery
//! inside this process, and the store's unique key decides everything else.

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::domain::Transaction;
use crate::ports::{InsertOutcome, RepositoryError, TransactionStore};
use crate::services::completion_worker::CompletionJob;
use crate::services::dedup_registry::{DedupRegistry, RegistryLease};
use crate::services::scheduler::CompletionScheduler;
use crate::validation::{require_text, validate_amount, validate_currency, ValidationError};

/// Webhook body as delivered. Every field is optional here so that missing or
/// mistyped values surface as validation errors rather than decode failures.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TransferRequest {
    pub transaction_id: Option<String>,
    pub source_account: Option<String>,
    pub destination_account: Option<String>,
    /// Major currency units, e.g. `150.00`.
    #[schema(value_type = Option<f64>)]
    pub amount: Option<Value>,
    /// Defaults to `INR`.
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// First sighting; a PROCESSING record exists and completion is scheduled.
    Accepted { transaction_id: String },
    /// The id is in flight here or already stored.
    Duplicate,
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("store error: {0}")]
    Store(#[from] RepositoryError),
}

#[derive(Clone)]
pub struct IntakeGate {
    store: Arc<dyn TransactionStore>,
    registry: Arc<DedupRegistry>,
    scheduler: CompletionScheduler,
    default_currency: String,
}

impl IntakeGate {
    pub fn new(
        store: Arc<dyn TransactionStore>,
        registry: Arc<DedupRegistry>,
        scheduler: CompletionScheduler,
        default_currency: impl Into<String>,
    ) -> Self {
        Self {
            store,
            registry,
            scheduler,
            default_currency: default_currency.into(),
        }
    }

    pub fn registry(&self) -> &Arc<DedupRegistry> {
        &self.registry
    }

    fn validate(&self, request: TransferRequest) -> Result<Transaction, ValidationError> {
        let transaction_id = require_text("transaction_id", request.transaction_id)?;
        let source_account = require_text("source_account", request.source_account)?;
        let destination_account =
            require_text("destination_account", request.destination_account)?;
        let amount = validate_amount(request.amount.as_ref())?;
        let currency = validate_currency(request.currency, &self.default_currency)?;

        Ok(Transaction::new(
            transaction_id,
            source_account,
            destination_account,
            amount,
            currency,
        ))
    }

    pub async fn admit(&self, request: TransferRequest) -> Result<Admission, IntakeError> {
        let tx = self.validate(request)?;
        let id = tx.transaction_id.clone();

        // Dropping the lease on any early return removes the speculative entry.
        let Some(lease) = RegistryLease::acquire(&self.registry, &id) else {
            info!(transaction_id = %id, "Duplicate delivery, already in flight");
            return Ok(Admission::Duplicate);
        };

        match self.store.insert_if_absent(&tx).await {
            Ok(InsertOutcome::Inserted) => {}
            Ok(InsertOutcome::AlreadyExists) => {
                info!(transaction_id = %id, "Duplicate delivery, already stored");
                return Ok(Admission::Duplicate);
            }
            Err(e) => {
                error!(transaction_id = %id, error = %e, "Failed to insert transaction");
                return Err(IntakeError::Store(e));
            }
        }

        info!(
            transaction_id = %id,
            amount_minor = tx.amount.value(),
            currency = %tx.currency,
            "Transaction admitted, scheduling completion"
        );

        // The record exists either way; a closed queue only leaves it PROCESSING.
        if let Err(e) = self.scheduler.schedule(CompletionJob::new(tx, lease)) {
            error!(transaction_id = %id, error = %e, "Completion not scheduled, record left for retry");
        }

        Ok(Admission::Accepted { transaction_id: id })
    }
}
