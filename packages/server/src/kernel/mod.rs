//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod errors;
pub mod jobs;
pub mod scraper;
pub mod test_dependencies;
pub mod traits;
pub mod webhook;

pub use ai::OpenAiEnricher;
pub use errors::{EnrichmentError, ExtractionError, NotifyError};
pub use scraper::CatalogScraper;
pub use traits::{BaseCatalogScraper, BaseEnricher, BaseNotifier};
pub use webhook::WebhookNotifier;
