//! Job infrastructure for background scrape execution.
//!
//! This module provides everything the job pipeline needs:
//! - [`Job`] / [`JobStatus`] - job record and lifecycle state machine
//! - [`Listing`] - scraped catalog item, optionally enriched
//! - [`JobStore`] - in-memory concurrent registry of job records
//! - [`JobManager`] - owns the lifecycle and runs the detached pipeline
//!
//! # Architecture
//!
//! ```text
//! POST /scrape
//!     │
//!     └─► JobManager.create_job(theme)
//!             ├─► JobStore.insert(Job{pending})   (synchronous)
//!             └─► tokio::spawn(pipeline)          (detached)
//!                     ├─► mark processing
//!                     ├─► BaseCatalogScraper.fetch_listings
//!                     ├─► enrich_all (concurrent fan-out, all-or-nothing)
//!                     ├─► drain_notifications (sequential, best-effort)
//!                     └─► mark completed / failed
//! ```
//!
//! Status polls read snapshots from the store at any point; the pipeline
//! replaces the whole record on each transition so readers never observe a
//! half-updated job.

pub mod drain;
pub mod enrichment;
mod job;
mod listing;
pub mod manager;
mod store;

pub use drain::drain_notifications;
pub use enrichment::enrich_all;
pub use job::{Job, JobStatus};
pub use listing::Listing;
pub use manager::JobManager;
pub use store::{JobStore, StoreError};
