// Enrichment implementation using OpenAI
//
// This is the infrastructure implementation of BaseEnricher. Two chat
// completions per listing: one for the summary, one for the 0-100
// relevance score.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::errors::EnrichmentError;
use super::jobs::Listing;
use super::traits::BaseEnricher;

const CHAT_MODEL: &str = "gpt-3.5-turbo";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_completion_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// OpenAI implementation of listing enrichment.
#[derive(Clone)]
pub struct OpenAiEnricher {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiEnricher {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    async fn complete(
        &self,
        system: &str,
        user: &str,
        max_completion_tokens: u32,
    ) -> Result<String, EnrichmentError> {
        let request = ChatRequest {
            model: CHAT_MODEL.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            max_completion_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichmentError::Api(format!("HTTP {status}: {body}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default())
    }
}

/// Parse the model's relevance reply into a score in [0, 100].
///
/// The model is told to return only a number, but replies like
/// "85 out of 100" still happen; take the leading digits and clamp.
/// Unparseable replies score 0 rather than failing the listing.
fn parse_relevance(raw: &str) -> f64 {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse::<f64>().map(|v| v.clamp(0.0, 100.0)).unwrap_or(0.0)
}

#[async_trait]
impl BaseEnricher for OpenAiEnricher {
    async fn enrich(&self, mut listing: Listing, theme: &str) -> Result<Listing, EnrichmentError> {
        debug!(title = %listing.title, theme, "enriching listing");

        let summary = self
            .complete(
                "You are a helpful assistant that summarizes book descriptions concisely.",
                &format!(
                    "Provide a 1 to 2 sentence summary of this book based on its description: {}",
                    listing.description
                ),
                100,
            )
            .await?;

        let relevance_reply = self
            .complete(
                "You are a helpful assistant that evaluates book relevance to themes.",
                &format!(
                    "Rate the relevance of this book to the theme \"{theme}\" on a scale of 0 to 100. \
                     Only return a number. Title: {}, Author: {}. Description: {}. \
                     Only return a number between 0 and 100.",
                    listing.title, listing.author, listing.description
                ),
                10,
            )
            .await?;

        listing.summary = Some(summary);
        listing.relevance_score = Some(parse_relevance(&relevance_reply));
        Ok(listing)
    }
}
