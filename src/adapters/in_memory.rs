use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{Transaction, TransactionUpdate};
use crate::ports::{InsertOutcome, RepositoryError, RepositoryResult, TransactionStore};

/// A thread-safe in-memory transaction store.
///
/// Uses `Arc<RwLock<HashMap<String, Transaction>>>`; the write lock makes
/// insert-if-absent atomic, which stands in for a unique key constraint.
/// Nothing survives a restart.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    transactions: Arc<RwLock<HashMap<String, Transaction>>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.transactions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.transactions.read().await.is_empty()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn get_by_id(&self, id: &str) -> RepositoryResult<Option<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions.get(id).cloned())
    }

    async fn insert_if_absent(&self, tx: &Transaction) -> RepositoryResult<InsertOutcome> {
        let mut transactions = self.transactions.write().await;
        match transactions.entry(tx.transaction_id.clone()) {
            Entry::Occupied(_) => Ok(InsertOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(tx.clone());
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    async fn update(&self, id: &str, update: &TransactionUpdate) -> RepositoryResult<()> {
        let mut transactions = self.transactions.write().await;
        let tx = transactions
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        if !tx.apply(update) {
            return Err(RepositoryError::Conflict(id.to_string()));
        }
        Ok(())
    }
}
