//! Error types for the external collaborators.
//!
//! Extraction and enrichment errors terminate a job; the failure message is
//! stored verbatim on the job record. Notification errors are contained
//! inside the drain and never reach the job record.

use thiserror::Error;

/// Catalog extraction failed - terminal for the owning job.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog returned HTTP {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("failed to parse catalog page: {0}")]
    Parse(String),
}

/// Enrichment of a single listing failed - terminal for the whole batch.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("enrichment request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("enrichment API error: {0}")]
    Api(String),

    #[error("failed to parse enrichment response: {0}")]
    Parse(String),
}

/// Delivery of one listing to the webhook sink failed - logged, never fatal.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook returned HTTP {0}")]
    Status(reqwest::StatusCode),
}
