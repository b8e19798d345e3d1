//! Store port consumed by the intake gate, the completion worker and the query handler.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Transaction, TransactionUpdate};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("transaction {0} not found")]
    NotFound(String),

    #[error("transaction {0} cannot take this update")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::Database(err.to_string())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Result of an insert keyed on `transaction_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The uniqueness constraint rejected the insert; another admission owns this id.
    AlreadyExists,
}

/// Durable record set keyed by transaction id with a uniqueness constraint on the key.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// `Ok(None)` when no record exists for `id`.
    async fn get_by_id(&self, id: &str) -> RepositoryResult<Option<Transaction>>;

    async fn insert_if_absent(&self, tx: &Transaction) -> RepositoryResult<InsertOutcome>;

    async fn update(&self, id: &str, update: &TransactionUpdate) -> RepositoryResult<()>;
}
