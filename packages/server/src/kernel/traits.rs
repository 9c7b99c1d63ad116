// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The job pipeline (kernel/jobs) is written against these traits so the
// external collaborators can be swapped for mocks in tests.
//
// Naming convention: Base* for trait names (e.g., BaseCatalogScraper)

use async_trait::async_trait;

use super::errors::{EnrichmentError, ExtractionError, NotifyError};
use super::jobs::Listing;

// =============================================================================
// Catalog Scraper Trait (Infrastructure - listing extraction)
// =============================================================================

#[async_trait]
pub trait BaseCatalogScraper: Send + Sync {
    /// Fetch raw listings for a theme from the external catalog.
    ///
    /// Returned listings carry only the scraped identity fields; enrichment
    /// fields are filled in later by a [`BaseEnricher`].
    async fn fetch_listings(&self, theme: &str) -> Result<Vec<Listing>, ExtractionError>;
}

// =============================================================================
// Enricher Trait (Infrastructure - per-listing attribute enrichment)
// =============================================================================

#[async_trait]
pub trait BaseEnricher: Send + Sync {
    /// Enrich one listing with a summary and a relevance score in [0, 100].
    ///
    /// Derived numeric fields (value score, discount metrics) are computed
    /// by the pipeline after this returns, not by the enricher.
    async fn enrich(&self, listing: Listing, theme: &str) -> Result<Listing, EnrichmentError>;
}

// =============================================================================
// Notifier Trait (Infrastructure - downstream delivery)
// =============================================================================

#[async_trait]
pub trait BaseNotifier: Send + Sync {
    /// Deliver one finished listing to the downstream sink.
    async fn notify(&self, listing: &Listing) -> Result<(), NotifyError>;
}
