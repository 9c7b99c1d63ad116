// Mock collaborators for testing
//
// Hand-rolled recording mocks that can be injected into JobManager in tests.
// Each mock records the calls it receives so tests can assert on what the
// pipeline actually did.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::errors::{EnrichmentError, ExtractionError, NotifyError};
use super::jobs::Listing;
use super::traits::{BaseCatalogScraper, BaseEnricher, BaseNotifier};

// =============================================================================
// Mock Catalog Scraper
// =============================================================================

pub struct MockCatalogScraper {
    listings: Vec<Listing>,
    error: Option<String>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockCatalogScraper {
    pub fn new() -> Self {
        Self {
            listings: Vec::new(),
            error: None,
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Listings to return from every fetch.
    pub fn with_listings(mut self, listings: Vec<Listing>) -> Self {
        self.listings = listings;
        self
    }

    /// Fail every fetch with this message.
    pub fn with_error(mut self, message: &str) -> Self {
        self.error = Some(message.to_string());
        self
    }

    /// Sleep before responding, to simulate slow browser navigation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Themes that were fetched, in call order.
    pub fn fetched_themes(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockCatalogScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseCatalogScraper for MockCatalogScraper {
    async fn fetch_listings(&self, theme: &str) -> Result<Vec<Listing>, ExtractionError> {
        self.calls.lock().unwrap().push(theme.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = &self.error {
            return Err(ExtractionError::Parse(message.clone()));
        }

        Ok(self.listings.clone())
    }
}

// =============================================================================
// Mock Enricher
// =============================================================================

pub struct MockEnricher {
    relevance: f64,
    fail_titles: HashSet<String>,
    reversed_completion: bool,
    call_counter: AtomicUsize,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockEnricher {
    pub fn new() -> Self {
        Self {
            relevance: 80.0,
            fail_titles: HashSet::new(),
            reversed_completion: false,
            call_counter: AtomicUsize::new(0),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Relevance score to assign to every listing.
    pub fn with_relevance(mut self, relevance: f64) -> Self {
        self.relevance = relevance;
        self
    }

    /// Fail enrichment for the listing with this title.
    pub fn with_failure_for(mut self, title: &str) -> Self {
        self.fail_titles.insert(title.to_string());
        self
    }

    /// Delay earlier calls longer than later ones, so concurrent tasks
    /// complete in roughly reverse submission order.
    pub fn with_reversed_completion(mut self) -> Self {
        self.reversed_completion = true;
        self
    }

    /// Titles of listings that were enriched, in call order.
    pub fn enriched_titles(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockEnricher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseEnricher for MockEnricher {
    async fn enrich(&self, mut listing: Listing, theme: &str) -> Result<Listing, EnrichmentError> {
        self.calls.lock().unwrap().push(listing.title.clone());

        if self.reversed_completion {
            let index = self.call_counter.fetch_add(1, Ordering::SeqCst) as u64;
            let delay_ms = 60u64.saturating_sub(index * 20);
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        if self.fail_titles.contains(&listing.title) {
            return Err(EnrichmentError::Api(format!(
                "failed to enrich {}",
                listing.title
            )));
        }

        listing.summary = Some(format!("A summary of {} for {theme}", listing.title));
        listing.relevance_score = Some(self.relevance);
        Ok(listing)
    }
}

// =============================================================================
// Mock Notifier
// =============================================================================

pub struct MockNotifier {
    fail_titles: HashSet<String>,
    attempted: Arc<Mutex<Vec<String>>>,
    sent: Arc<Mutex<Vec<String>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            fail_titles: HashSet::new(),
            attempted: Arc::new(Mutex::new(Vec::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail delivery for the listing with this title.
    pub fn with_failure_for(mut self, title: &str) -> Self {
        self.fail_titles.insert(title.to_string());
        self
    }

    /// Titles of every delivery attempt, in order.
    pub fn attempted(&self) -> Vec<String> {
        self.attempted.lock().unwrap().clone()
    }

    /// Titles of successful deliveries, in order.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseNotifier for MockNotifier {
    async fn notify(&self, listing: &Listing) -> Result<(), NotifyError> {
        self.attempted.lock().unwrap().push(listing.title.clone());

        if self.fail_titles.contains(&listing.title) {
            return Err(NotifyError::Status(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }

        self.sent.lock().unwrap().push(listing.title.clone());
        Ok(())
    }
}
