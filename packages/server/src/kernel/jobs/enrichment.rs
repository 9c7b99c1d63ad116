//! Concurrent enrichment fan-out with all-or-nothing semantics.

use std::sync::Arc;

use futures::future::try_join_all;

use crate::kernel::errors::EnrichmentError;
use crate::kernel::traits::BaseEnricher;

use super::listing::Listing;

/// Enrich every listing concurrently and reassemble results in input order.
///
/// One future is launched per listing; each listing's enrichment is a pure
/// function of (listing, theme) so there is no ordering dependency between
/// them. The first error observed fails the whole batch - a single bad
/// listing aborts the job rather than being silently dropped.
///
/// Derived value metrics are computed here, after the enricher returns,
/// since they are the pipeline's responsibility rather than the enricher's.
pub async fn enrich_all(
    enricher: Arc<dyn BaseEnricher>,
    theme: &str,
    listings: Vec<Listing>,
) -> Result<Vec<Listing>, EnrichmentError> {
    let tasks = listings.into_iter().map(|listing| {
        let enricher = Arc::clone(&enricher);
        async move {
            let enriched = enricher.enrich(listing, theme).await?;
            Ok(enriched.with_value_metrics())
        }
    });

    // try_join_all preserves input positions and short-circuits on the
    // first failure, so position i of the output is the enrichment of
    // position i of the input no matter which future finishes first.
    try_join_all(tasks).await
}
