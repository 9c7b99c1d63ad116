//! Listing model and derived pricing metrics.

use serde::{Deserialize, Serialize};

/// One catalog item discovered for a theme.
///
/// Born raw from extraction (identity + pricing fields only); the enricher
/// fills `summary` and `relevance_score`, after which the pipeline computes
/// the derived metrics via [`Listing::with_value_metrics`]. Immutable from
/// the caller's point of view once the owning job completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub title: String,
    pub author: String,
    pub product_url: String,
    pub description: String,
    pub current_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<i64>,
}

impl Listing {
    /// Create a raw listing with identity fields only.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        product_url: impl Into<String>,
        description: impl Into<String>,
        current_price: f64,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            product_url: product_url.into(),
            description: description.into(),
            current_price,
            original_price: None,
            summary: None,
            relevance_score: None,
            value_score: None,
            discount_amount: None,
            discount_percentage: None,
        }
    }

    /// Compute the derived numeric fields from the enriched attributes.
    ///
    /// `value_score` is relevance per currency unit; a zero price would
    /// divide to a non-finite value, which collapses to 0 instead of
    /// surfacing an error. Discount metrics only exist when the catalog
    /// advertised an original price.
    pub fn with_value_metrics(mut self) -> Self {
        let relevance = self.relevance_score.unwrap_or(0.0);
        let raw_value = relevance / self.current_price;
        self.value_score = Some(if raw_value.is_finite() {
            round2(raw_value)
        } else {
            0.0
        });

        if let Some(original) = self.original_price {
            let discount = round2(original - self.current_price);
            self.discount_amount = Some(discount);
            self.discount_percentage = Some((discount / original * 100.0).round() as i64);
        }

        self
    }
}

/// Round to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
