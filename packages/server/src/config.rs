use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub openai_api_key: String,
    pub catalog_base_url: String,
    pub notify_webhook_url: String,
    pub notify_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openai_api_key: env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY must be set")?,
            catalog_base_url: env::var("CATALOG_BASE_URL")
                .unwrap_or_else(|_| "https://www.bookdp.com.au".to_string()),
            notify_webhook_url: env::var("NOTIFY_WEBHOOK_URL")
                .context("NOTIFY_WEBHOOK_URL must be set")?,
            notify_delay_ms: env::var("NOTIFY_DELAY_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .context("NOTIFY_DELAY_MS must be a valid number")?,
        })
    }
}
