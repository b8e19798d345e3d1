//! Postgres implementation of TransactionStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{MinorUnits, Transaction, TransactionStatus, TransactionUpdate};
use crate::ports::{InsertOutcome, RepositoryError, RepositoryResult, TransactionStore};

/// Postgres-backed transaction store.
#[derive(Clone)]
pub struct PostgresTransactionStore {
    pool: PgPool,
}

impl PostgresTransactionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionStore for PostgresTransactionStore {
    async fn get_by_id(&self, id: &str) -> RepositoryResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT transaction_id, source_account, destination_account, amount, currency,
                status, created_at, processed_at, updated_at
            FROM transactions WHERE transaction_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TransactionRow::into_domain).transpose()
    }

    async fn insert_if_absent(&self, tx: &Transaction) -> RepositoryResult<InsertOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO transactions (
                transaction_id, source_account, destination_account, amount, currency,
                status, created_at, processed_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&tx.transaction_id)
        .bind(&tx.source_account)
        .bind(&tx.destination_account)
        .bind(tx.amount.value())
        .bind(&tx.currency)
        .bind(tx.status.as_str())
        .bind(tx.created_at)
        .bind(tx.processed_at)
        .bind(tx.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Ok(InsertOutcome::AlreadyExists)
            }
            Err(e) => Err(RepositoryError::from(e)),
        }
    }

    async fn update(&self, id: &str, update: &TransactionUpdate) -> RepositoryResult<()> {
        // A status change only matches rows it may legally move forward.
        let status = update.status.map(|s| s.as_str());
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = COALESCE($2, status),
                processed_at = COALESCE($3, processed_at),
                updated_at = $4
            WHERE transaction_id = $1
              AND ($2::text IS NULL OR status = 'PROCESSING' OR status = $2)
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(update.processed_at)
        .bind(update.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.get_by_id(id).await? {
                Some(_) => Err(RepositoryError::Conflict(id.to_string())),
                None => Err(RepositoryError::NotFound(id.to_string())),
            };
        }
        Ok(())
    }
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    transaction_id: String,
    source_account: String,
    destination_account: String,
    amount: i64,
    currency: String,
    status: String,
    created_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

impl TransactionRow {
    fn into_domain(self) -> RepositoryResult<Transaction> {
        let status = self
            .status
            .parse::<TransactionStatus>()
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        let amount = MinorUnits::new(self.amount).map_err(|e| {
            RepositoryError::Database(format!(
                "stored amount for {} {}",
                self.transaction_id, e
            ))
        })?;

        Ok(Transaction {
            transaction_id: self.transaction_id,
            source_account: self.source_account,
            destination_account: self.destination_account,
            amount,
            currency: self.currency,
            status,
            created_at: self.created_at,
            processed_at: self.processed_at,
            updated_at: self.updated_at,
        })
    }
}
