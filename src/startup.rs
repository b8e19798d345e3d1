use anyhow::{Context, Result};
use std::sync::Arc;

use crate::adapters::{InMemoryTransactionStore, PostgresTransactionStore};
use crate::config::Config;
use crate::middleware::RequestLogSettings;
use crate::ports::TransactionStore;
use crate::services::{
    completion_queue, CompletionDispatcher, CompletionWorker, ConfirmationBackend, DedupRegistry,
    DelayedConfirmation, IntakeGate,
};
use crate::AppState;

/// Application state plus the dispatcher that must be spawned alongside the server.
pub struct Services {
    pub state: AppState,
    pub dispatcher: CompletionDispatcher,
}

pub fn build_services(
    config: &Config,
    store: Arc<dyn TransactionStore>,
    backend: Arc<dyn ConfirmationBackend>,
) -> Services {
    let worker = CompletionWorker::new(Arc::clone(&store), backend);
    let (scheduler, dispatcher) = completion_queue(worker);
    let intake = IntakeGate::new(
        Arc::clone(&store),
        Arc::new(DedupRegistry::new()),
        scheduler,
        config.default_currency.clone(),
    );

    Services {
        state: AppState {
            store,
            intake,
            request_log: RequestLogSettings {
                log_body: config.log_request_body,
            },
        },
        dispatcher,
    }
}

/// The confirmation backend used in production: a fixed delay.
pub fn default_backend(config: &Config) -> Arc<dyn ConfirmationBackend> {
    Arc::new(DelayedConfirmation::new(config.confirmation_delay()))
}

/// Postgres when `DATABASE_URL` is set (migrations applied), otherwise in-memory.
pub async fn connect_store(config: &Config) -> Result<Arc<dyn TransactionStore>> {
    match &config.database_url {
        Some(url) => {
            let pool = crate::db::create_pool(url, config.database_max_connections)
                .await
                .context("failed to connect to database")?;
            crate::db::run_migrations(&pool)
                .await
                .context("failed to run migrations")?;
            Ok(Arc::new(PostgresTransactionStore::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store; records will not survive a restart");
            Ok(Arc::new(InMemoryTransactionStore::new()))
        }
    }
}

pub struct ValidationReport {
    pub environment: bool,
    pub database: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.environment && self.database
    }

    pub fn print(&self) {
        println!("\n=== Startup Validation Report ===");
        println!("Environment Variables: {}", status(self.environment));
        println!("Database Connectivity: {}", status(self.database));

        if !self.errors.is_empty() {
            println!("\nErrors:");
            for error in &self.errors {
                println!("  ❌ {}", error);
            }
        }

        println!("\nOverall Status: {}", if self.is_valid() { "✅ PASS" } else { "❌ FAIL" });
        println!("=================================\n");
    }
}

fn status(ok: bool) -> &'static str {
    if ok { "✅ OK" } else { "❌ FAIL" }
}

pub async fn validate_environment(config: &Config) -> ValidationReport {
    let mut report = ValidationReport {
        environment: true,
        database: true,
        errors: Vec::new(),
    };

    if let Err(e) = validate_env_vars(config) {
        report.environment = false;
        report.errors.push(format!("Environment: {}", e));
    }

    if let Some(url) = &config.database_url {
        if let Err(e) = validate_database(url).await {
            report.database = false;
            report.errors.push(format!("Database: {}", e));
        }
    }

    report
}

fn validate_env_vars(config: &Config) -> Result<()> {
    if config.default_currency.trim().is_empty() {
        anyhow::bail!("DEFAULT_CURRENCY is empty");
    }
    if config.database_max_connections == 0 {
        anyhow::bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
    }
    Ok(())
}

async fn validate_database(url: &str) -> Result<()> {
    let pool = crate::db::create_pool(url, 1)
        .await
        .context("Failed to connect to database")?;
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .context("Database query failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_validation_rejects_blank_currency() {
        let config = Config {
            default_currency: " ".into(),
            ..Config::default()
        };
        assert!(validate_env_vars(&config).is_err());
    }

    #[tokio::test]
    async fn test_report_without_database_is_valid() {
        let report = validate_environment(&Config::default()).await;
        assert!(report.is_valid());
        assert!(report.errors.is_empty());
    }
}
