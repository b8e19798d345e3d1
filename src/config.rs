use anyhow::Context;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::time::Duration;

pub const SERVICE_NAME: &str = "WalnutFolks Transaction Service";
pub const SERVICE_VERSION: &str = "1.0.0";
pub const DEFAULT_CURRENCY: &str = "INR";
pub const DEFAULT_CONFIRMATION_DELAY_MS: u64 = 30_000;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub confirmation_delay_ms: u64,
    pub default_currency: String,
    pub log_format: LogFormat,
    pub log_request_body: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            database_url: None,
            database_max_connections: 5,
            confirmation_delay_ms: DEFAULT_CONFIRMATION_DELAY_MS,
            default_currency: DEFAULT_CURRENCY.to_string(),
            log_format: LogFormat::Text,
            log_request_body: false,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        let defaults = Config::default();
        Ok(Config {
            server_port: parse_var("SERVER_PORT", defaults.server_port)?,
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            database_max_connections: parse_var(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            confirmation_delay_ms: parse_var("CONFIRMATION_DELAY_MS", defaults.confirmation_delay_ms)?,
            default_currency: env::var("DEFAULT_CURRENCY").unwrap_or(defaults.default_currency),
            log_format: parse_log_format(
                &env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
            )?,
            log_request_body: parse_var("LOG_REQUEST_BODY", defaults.log_request_body)?,
        })
    }

    pub fn confirmation_delay(&self) -> Duration {
        Duration::from_millis(self.confirmation_delay_ms)
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

fn parse_log_format(raw: &str) -> anyhow::Result<LogFormat> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        other => anyhow::bail!("LOG_FORMAT must be 'text' or 'json', got '{}'", other),
    }
}
