use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::{Transaction, TransactionUpdate};
use crate::ports::TransactionStore;
use crate::services::confirmation::ConfirmationBackend;
use crate::services::dedup_registry::RegistryLease;

/// One unit of completion work. Holds the id's registry entry until dropped.
#[derive(Debug)]
pub struct CompletionJob {
    transaction: Transaction,
    lease: RegistryLease,
}

impl CompletionJob {
    pub fn new(transaction: Transaction, lease: RegistryLease) -> Self {
        Self { transaction, lease }
    }

    pub fn transaction_id(&self) -> &str {
        self.lease.transaction_id()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    Processed,
    /// Status unchanged, `updated_at` refreshed where the store allowed it.
    LeftForRetry,
}

/// Confirms an admitted transaction and moves it to PROCESSED.
#[derive(Clone)]
pub struct CompletionWorker {
    store: Arc<dyn TransactionStore>,
    backend: Arc<dyn ConfirmationBackend>,
}

impl CompletionWorker {
    pub fn new(store: Arc<dyn TransactionStore>, backend: Arc<dyn ConfirmationBackend>) -> Self {
        Self { store, backend }
    }

    /// Runs the job to completion. The registry entry is released when `job`
    /// goes out of scope, whatever the outcome.
    pub async fn complete(&self, job: CompletionJob) -> CompletionOutcome {
        let id = job.transaction_id().to_string();
        info!(transaction_id = %id, "Starting completion");

        let outcome = match self.backend.confirm(&job.transaction).await {
            Ok(()) => {
                let update = TransactionUpdate::processed(Utc::now());
                match self.store.update(&id, &update).await {
                    Ok(()) => {
                        info!(transaction_id = %id, "Transaction processed");
                        CompletionOutcome::Processed
                    }
                    Err(e) => {
                        error!(transaction_id = %id, error = %e, "Failed to mark transaction processed");
                        self.leave_for_retry(&id).await
                    }
                }
            }
            Err(e) => {
                warn!(transaction_id = %id, error = %e, "Confirmation failed");
                self.leave_for_retry(&id).await
            }
        };

        drop(job);
        outcome
    }

    async fn leave_for_retry(&self, id: &str) -> CompletionOutcome {
        if let Err(e) = self
            .store
            .update(id, &TransactionUpdate::touch(Utc::now()))
            .await
        {
            error!(transaction_id = %id, error = %e, "Failed to refresh updated_at after completion failure");
        }
        CompletionOutcome::LeftForRetry
    }
}
