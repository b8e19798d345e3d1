use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::handlers::webhook::TransactionResponse;
use crate::ports::TransactionStore;

#[derive(Parser)]
#[command(name = "transaction-service")]
#[command(about = "Transfer webhook intake with asynchronous confirmation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Transaction inspection commands
    #[command(subcommand)]
    Tx(TxCommands),

    /// Database management commands
    #[command(subcommand)]
    Db(DbCommands),

    /// Configuration validation
    Config,
}

#[derive(Subcommand)]
pub enum TxCommands {
    /// Print a stored transaction as JSON
    Get {
        /// Transaction id as supplied by the sender
        #[arg(value_name = "TX_ID")]
        tx_id: String,
    },
}

#[derive(Subcommand)]
pub enum DbCommands {
    /// Run database migrations
    Migrate,
}

pub async fn handle_tx_get(store: &dyn TransactionStore, tx_id: &str) -> anyhow::Result<()> {
    match store.get_by_id(tx_id).await? {
        Some(tx) => {
            let json = serde_json::to_string_pretty(&TransactionResponse::from(tx))?;
            println!("{}", json);
            Ok(())
        }
        None => {
            tracing::warn!(transaction_id = %tx_id, "Transaction not found");
            anyhow::bail!("Transaction {} not found", tx_id)
        }
    }
}

pub async fn handle_db_migrate(config: &Config) -> anyhow::Result<()> {
    let Some(url) = &config.database_url else {
        anyhow::bail!("DATABASE_URL must be set to run migrations");
    };

    let pool = crate::db::create_pool(url, config.database_max_connections).await?;
    tracing::info!("Running database migrations...");
    crate::db::run_migrations(&pool).await?;
    println!("✓ Database migrations completed");

    Ok(())
}

pub async fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    println!("Configuration:");
    println!("  Server Port: {}", config.server_port);
    println!(
        "  Database URL: {}",
        config
            .database_url
            .as_deref()
            .map(mask_password)
            .unwrap_or_else(|| "(not set, in-memory store)".to_string())
    );
    println!("  Confirmation Delay: {} ms", config.confirmation_delay_ms);
    println!("  Default Currency: {}", config.default_currency);

    let report = crate::startup::validate_environment(config).await;
    report.print();
    if !report.is_valid() {
        anyhow::bail!("Configuration is invalid");
    }

    tracing::info!("Configuration is valid");
    Ok(())
}

fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            if let Some(slash_pos) = url[..colon_pos].rfind("//") {
                let prefix = &url[..slash_pos + 2];
                let user = &url[slash_pos + 2..colon_pos];
                let suffix = &url[at_pos..];
                return format!("{}{}:****{}", prefix, user, suffix);
            }
        }
    }
    url.to_string()
}
