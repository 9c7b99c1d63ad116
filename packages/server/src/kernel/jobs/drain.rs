//! Sequential, throttled delivery of finished listings to the webhook sink.

use std::time::Duration;

use tracing::{debug, warn};

use crate::kernel::traits::BaseNotifier;

use super::listing::Listing;

/// Deliver each listing to the notifier, one at a time, in input order, with
/// a fixed delay between successive sends.
///
/// Delivery is best-effort: a per-item failure is logged and the drain moves
/// on to the next listing. No retries, and no error ever reaches the caller,
/// so a flaky sink can never mask successfully scraped data.
pub async fn drain_notifications(
    notifier: &dyn BaseNotifier,
    listings: &[Listing],
    delay: Duration,
) {
    for (index, listing) in listings.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(delay).await;
        }

        match notifier.notify(listing).await {
            Ok(()) => debug!(title = %listing.title, "listing delivered to sink"),
            Err(error) => {
                warn!(title = %listing.title, error = %error, "failed to deliver listing, continuing")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::MockNotifier;

    fn raw(title: &str) -> Listing {
        Listing::new(
            title,
            "A. Author",
            format!("https://catalog.test/{title}"),
            "A description.",
            9.99,
        )
    }

    #[tokio::test]
    async fn delivers_all_listings_in_order() {
        let notifier = MockNotifier::new();
        let listings = vec![raw("One"), raw("Two"), raw("Three")];

        drain_notifications(&notifier, &listings, Duration::ZERO).await;

        assert_eq!(notifier.sent(), vec!["One", "Two", "Three"]);
    }

    #[tokio::test]
    async fn a_failing_listing_does_not_abort_the_batch() {
        let notifier = MockNotifier::new().with_failure_for("Two");
        let listings = vec![raw("One"), raw("Two"), raw("Three")];

        drain_notifications(&notifier, &listings, Duration::ZERO).await;

        // every listing was attempted, in order, despite the failure
        assert_eq!(notifier.attempted(), vec!["One", "Two", "Three"]);
        assert_eq!(notifier.sent(), vec!["One", "Three"]);
    }
}
