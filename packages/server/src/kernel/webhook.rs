//! Webhook notifier - forwards finished listings to the downstream sink.

use async_trait::async_trait;
use tracing::info;

use super::errors::NotifyError;
use super::jobs::Listing;
use super::traits::BaseNotifier;

/// Delivers listings to an external automation webhook, one POST per listing.
pub struct WebhookNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl WebhookNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url: webhook_url.into(),
        }
    }
}

#[async_trait]
impl BaseNotifier for WebhookNotifier {
    async fn notify(&self, listing: &Listing) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(listing)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status));
        }

        info!(title = %listing.title, "listing sent to webhook");
        Ok(())
    }
}
