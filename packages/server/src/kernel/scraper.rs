//! Catalog scraper - HTTP + HTML parsing against a WooCommerce storefront.
//!
//! This implementation:
//! - Uses reqwest for HTTP requests
//! - Uses the scraper crate for HTML parsing
//! - Reads product facts from the JSON-LD `@graph` block on product pages
//!
//! No JavaScript rendering; the catalog serves static HTML.

use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::errors::ExtractionError;
use super::jobs::Listing;
use super::traits::BaseCatalogScraper;

/// Number of search result pages scanned per theme.
const SEARCH_PAGES: u32 = 2;

const PRODUCT_LINK_SELECTOR: &str =
    "h2.woocommerce-loop-product__title a.woocommerce-LoopProduct-link";
const JSON_LD_SELECTOR: &str = "script[type='application/ld+json']";
const ORIGINAL_PRICE_SELECTOR: &str = "del .woocommerce-Price-amount";
const DESCRIPTION_SELECTOR: &str = ".woocommerce-tabs--description-content p";

/// Scrapes themed product listings from the configured catalog.
pub struct CatalogScraper {
    client: reqwest::Client,
    base: Url,
}

impl CatalogScraper {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ExtractionError> {
        // Browser-like User-Agent to avoid bot detection
        let user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        let raw = base_url.into();
        let base = Url::parse(raw.trim_end_matches('/'))
            .map_err(|e| ExtractionError::Parse(format!("invalid catalog base URL: {e}")))?;

        Ok(Self { client, base })
    }

    /// Resolve a product href against the catalog base. Hrefs in raw HTML
    /// may be relative; absolute ones pass through unchanged.
    fn resolve_link(&self, href: &str) -> Option<String> {
        self.base.join(href).ok().map(|url| url.to_string())
    }

    /// Fetch raw HTML from a URL.
    async fn fetch_html(&self, url: &str) -> Result<String, ExtractionError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }

    /// Extract product page links from a search results page.
    fn product_links(html: &str) -> Result<Vec<String>, ExtractionError> {
        let document = Html::parse_document(html);
        let selector = Selector::parse(PRODUCT_LINK_SELECTOR)
            .map_err(|e| ExtractionError::Parse(format!("bad product link selector: {e}")))?;

        Ok(document
            .select(&selector)
            .filter_map(|link| link.value().attr("href"))
            .map(|href| href.to_string())
            .collect())
    }

    /// Parse one product page into a raw listing.
    ///
    /// Pages without a JSON-LD `Product` object are skipped (`None`), not
    /// treated as errors - WooCommerce serves plenty of non-product pages.
    fn parse_product(html: &str, url: &str) -> Result<Option<Listing>, ExtractionError> {
        let document = Html::parse_document(html);

        let json_ld_selector = Selector::parse(JSON_LD_SELECTOR)
            .map_err(|e| ExtractionError::Parse(format!("bad JSON-LD selector: {e}")))?;
        let Some(script) = document.select(&json_ld_selector).next() else {
            return Ok(None);
        };

        let data: Value = match serde_json::from_str(&script.inner_html()) {
            Ok(data) => data,
            Err(e) => {
                debug!(url, error = %e, "unparseable JSON-LD block");
                return Ok(None);
            }
        };

        let Some(product) = data
            .get("@graph")
            .and_then(Value::as_array)
            .and_then(|items| {
                items
                    .iter()
                    .find(|item| item.get("@type").and_then(Value::as_str) == Some("Product"))
            })
        else {
            return Ok(None);
        };

        // Catalog titles look like "Actual Title | Store Name"
        let title = product
            .get("name")
            .and_then(Value::as_str)
            .and_then(|name| name.split('|').next())
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        let author = product
            .get("brand")
            .and_then(|brand| brand.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let current_price = product
            .get("offers")
            .and_then(|offers| offers.get("price"))
            .map(json_number)
            .unwrap_or(0.0);

        let product_url = product
            .get("mainEntityOfPage")
            .and_then(|page| page.get("@id"))
            .and_then(Value::as_str)
            .unwrap_or(url)
            .to_string();

        let description_selector = Selector::parse(DESCRIPTION_SELECTOR)
            .map_err(|e| ExtractionError::Parse(format!("bad description selector: {e}")))?;
        let description = document
            .select(&description_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let mut listing = Listing::new(title, author, product_url, description, current_price);

        // The struck-through price only exists on discounted products
        let original_price_selector = Selector::parse(ORIGINAL_PRICE_SELECTOR)
            .map_err(|e| ExtractionError::Parse(format!("bad price selector: {e}")))?;
        if let Some(el) = document.select(&original_price_selector).next() {
            let digits: String = el
                .text()
                .collect::<String>()
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            if let Ok(price) = digits.parse::<f64>() {
                listing.original_price = Some(price);
            }
        }

        Ok(Some(listing))
    }
}

/// JSON-LD prices arrive as either a string or a number.
fn json_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

#[async_trait]
impl BaseCatalogScraper for CatalogScraper {
    async fn fetch_listings(&self, theme: &str) -> Result<Vec<Listing>, ExtractionError> {
        let mut listings = Vec::new();

        for page in 1..=SEARCH_PAGES {
            let search_url = format!(
                "{}/page/{}/?s={}&post_type=product",
                self.base.as_str().trim_end_matches('/'),
                page,
                urlencoding::encode(theme)
            );
            debug!(url = %search_url, "fetching search page");

            let html = match self.fetch_html(&search_url).await {
                Ok(html) => html,
                // WooCommerce serves 404 for an out-of-range /page/N/ when a
                // theme has fewer pages of results; that is end-of-results,
                // not a failure
                Err(ExtractionError::Status { status, .. }) if page > 1 => {
                    debug!(page, %status, "no more search pages");
                    break;
                }
                Err(e) => return Err(e),
            };
            let links = Self::product_links(&html)?;
            debug!(page, count = links.len(), "found product links");

            for href in links {
                let Some(link) = self.resolve_link(&href) else {
                    warn!(href = %href, "unresolvable product link");
                    continue;
                };
                // A single broken product page is skipped, not fatal
                match self.fetch_html(&link).await {
                    Ok(product_html) => match Self::parse_product(&product_html, &link) {
                        Ok(Some(listing)) => listings.push(listing),
                        Ok(None) => debug!(url = %link, "no product data on page"),
                        Err(e) => warn!(url = %link, error = %e, "skipping product page"),
                    },
                    Err(e) => warn!(url = %link, error = %e, "failed to fetch product page"),
                }
            }
        }

        Ok(listings)
    }
}
