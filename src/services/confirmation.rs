use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

use crate::domain::Transaction;

#[derive(Debug, Error)]
pub enum ConfirmationError {
    #[error("confirmation backend unavailable: {0}")]
    Unavailable(String),
}

/// External system that confirms a transfer before it is marked processed.
#[async_trait]
pub trait ConfirmationBackend: Send + Sync {
    async fn confirm(&self, tx: &Transaction) -> Result<(), ConfirmationError>;
}

/// Stand-in for the external call: waits a fixed delay, then succeeds.
#[derive(Debug, Clone)]
pub struct DelayedConfirmation {
    delay: Duration,
}

impl DelayedConfirmation {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl ConfirmationBackend for DelayedConfirmation {
    async fn confirm(&self, tx: &Transaction) -> Result<(), ConfirmationError> {
        tracing::debug!(
            transaction_id = %tx.transaction_id,
            delay_ms = self.delay.as_millis() as u64,
            "Waiting for external confirmation"
        );
        sleep(self.delay).await;
        Ok(())
    }
}
