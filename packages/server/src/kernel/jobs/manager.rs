//! Job orchestrator - owns the lifecycle state machine and the detached
//! pipeline that drives each job through extract -> enrich -> notify.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::kernel::traits::{BaseCatalogScraper, BaseEnricher, BaseNotifier};

use super::drain::drain_notifications;
use super::enrichment::enrich_all;
use super::job::{Job, JobStatus};
use super::listing::Listing;
use super::store::JobStore;

const DEFAULT_NOTIFY_DELAY: Duration = Duration::from_secs(1);

/// Orchestrates scrape jobs: creation, the detached background pipeline,
/// and the read-only query surface the API layer calls into.
///
/// Cheap to clone; every clone shares the same store and collaborators.
#[derive(Clone)]
pub struct JobManager {
    store: JobStore,
    scraper: Arc<dyn BaseCatalogScraper>,
    enricher: Arc<dyn BaseEnricher>,
    notifier: Arc<dyn BaseNotifier>,
    notify_delay: Duration,
}

impl JobManager {
    pub fn new(
        scraper: Arc<dyn BaseCatalogScraper>,
        enricher: Arc<dyn BaseEnricher>,
        notifier: Arc<dyn BaseNotifier>,
    ) -> Self {
        Self {
            store: JobStore::new(),
            scraper,
            enricher,
            notifier,
            notify_delay: DEFAULT_NOTIFY_DELAY,
        }
    }

    /// Override the inter-send notification delay (tests use zero).
    pub fn with_notify_delay(mut self, delay: Duration) -> Self {
        self.notify_delay = delay;
        self
    }

    /// Create a job and return its id immediately.
    ///
    /// The pipeline runs as a detached task; creation never waits for
    /// extraction, enrichment, or notification.
    pub async fn create_job(&self, theme: &str) -> Result<Uuid> {
        let job = Job::new(theme);
        let id = job.id;
        self.store.insert(job).await?;

        let manager = self.clone();
        let theme = theme.to_string();
        tokio::spawn(async move {
            manager.run_pipeline(id, &theme).await;
        });

        Ok(id)
    }

    /// Snapshot of the job record, mid-flight or terminal.
    pub async fn job_status(&self, id: Uuid) -> Option<Job> {
        self.store.get(id).await
    }

    /// Whatever `listings` currently holds (absent unless completed),
    /// together with the current status.
    pub async fn job_results(&self, id: Uuid) -> Option<(Option<Vec<Listing>>, JobStatus)> {
        self.store
            .get(id)
            .await
            .map(|job| (job.listings, job.status))
    }

    /// All known jobs, completed or not.
    pub async fn history(&self) -> Vec<Job> {
        self.store.list().await
    }

    /// Remove the job record. Idempotent; does not stop an already-running
    /// pipeline, whose final write then becomes a silent no-op.
    pub async fn delete_job(&self, id: Uuid) {
        self.store.remove(id).await;
    }

    /// Drive one job through the full pipeline. Stage failures become a
    /// terminal `failed` status; nothing ever propagates out of this task.
    async fn run_pipeline(&self, id: Uuid, theme: &str) {
        info!(job_id = %id, theme, "starting scrape pipeline");
        self.store.update(id, |job| job.mark_processing()).await;

        let raw_listings = match self.scraper.fetch_listings(theme).await {
            Ok(listings) => listings,
            Err(e) => {
                error!(job_id = %id, error = %e, "extraction failed");
                self.store.update(id, |job| job.fail(e.to_string())).await;
                return;
            }
        };
        info!(job_id = %id, count = raw_listings.len(), "extraction complete");

        let enriched = match enrich_all(Arc::clone(&self.enricher), theme, raw_listings).await {
            Ok(listings) => listings,
            Err(e) => {
                error!(job_id = %id, error = %e, "enrichment failed");
                self.store.update(id, |job| job.fail(e.to_string())).await;
                return;
            }
        };
        info!(job_id = %id, count = enriched.len(), "enrichment complete");

        // Best-effort delivery; per-item failures are logged inside the drain.
        drain_notifications(self.notifier.as_ref(), &enriched, self.notify_delay).await;

        if self
            .store
            .update(id, |job| job.complete(enriched))
            .await
            .is_none()
        {
            debug!(job_id = %id, "job deleted while running, result discarded");
        } else {
            info!(job_id = %id, "scrape pipeline completed");
        }
    }
}
