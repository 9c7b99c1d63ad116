// Main entry point for the scrape API server

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use server_core::kernel::jobs::JobManager;
use server_core::kernel::{CatalogScraper, OpenAiEnricher, WebhookNotifier};
use server_core::server::build_app;
use server_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Themed Catalog Scraper API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Build collaborators
    let scraper = Arc::new(
        CatalogScraper::new(&config.catalog_base_url)
            .context("Failed to create catalog scraper")?,
    );
    let enricher = Arc::new(OpenAiEnricher::new(config.openai_api_key.clone()));
    let notifier = Arc::new(WebhookNotifier::new(config.notify_webhook_url.clone()));

    let manager = JobManager::new(scraper, enricher, notifier)
        .with_notify_delay(Duration::from_millis(config.notify_delay_ms));

    // Build application
    let app = build_app(manager);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
