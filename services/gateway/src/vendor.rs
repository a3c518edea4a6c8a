//! Vendor Client: fetches one vendor's listing for a category

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;
use types::product::RawProduct;
use types::query::PriceRange;
use types::vendor::Vendor;

/// Failure of a single vendor call. Any one of these fails the listing.
#[derive(Debug, Error)]
pub enum VendorError {
    #[error("{vendor}: invalid upstream url {url:?}")]
    InvalidUrl { vendor: Vendor, url: String },

    #[error("{vendor}: request failed: {source}")]
    Transport {
        vendor: Vendor,
        #[source]
        source: reqwest::Error,
    },

    #[error("{vendor}: upstream returned {status}")]
    Status { vendor: Vendor, status: StatusCode },

    #[error("{vendor}: malformed payload: {source}")]
    Payload {
        vendor: Vendor,
        #[source]
        source: reqwest::Error,
    },
}

impl VendorError {
    pub fn vendor(&self) -> Vendor {
        match self {
            VendorError::InvalidUrl { vendor, .. }
            | VendorError::Transport { vendor, .. }
            | VendorError::Status { vendor, .. }
            | VendorError::Payload { vendor, .. } => *vendor,
        }
    }
}

#[async_trait]
pub trait VendorClient: Send + Sync {
    /// Raw items one vendor lists for `category` within `price_range`
    async fn fetch_products(
        &self,
        vendor: Vendor,
        category: &str,
        price_range: &PriceRange,
    ) -> Result<Vec<RawProduct>, VendorError>;
}

/// Talks to `{base}/{company}/categories/{category}/products?top=..`
#[derive(Clone)]
pub struct HttpVendorClient {
    http_client: Client,
    base_url: String,
    fetch_limit: u32,
}

impl HttpVendorClient {
    pub fn new(http_client: Client, base_url: impl Into<String>, fetch_limit: u32) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            fetch_limit,
        }
    }

    fn listing_url(&self, vendor: Vendor, category: &str, price_range: &PriceRange) -> Option<Url> {
        let mut url = Url::parse(&self.base_url).ok()?;
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend([vendor.as_str(), "categories", category, "products"]);

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("top", &self.fetch_limit.to_string());
            if let Some(min) = price_range.min {
                query.append_pair("minPrice", &min.to_string());
            }
            if let Some(max) = price_range.max {
                query.append_pair("maxPrice", &max.to_string());
            }
        }
        Some(url)
    }
}

#[async_trait]
impl VendorClient for HttpVendorClient {
    async fn fetch_products(
        &self,
        vendor: Vendor,
        category: &str,
        price_range: &PriceRange,
    ) -> Result<Vec<RawProduct>, VendorError> {
        let url = self
            .listing_url(vendor, category, price_range)
            .ok_or_else(|| VendorError::InvalidUrl {
                vendor,
                url: self.base_url.clone(),
            })?;

        tracing::debug!(%vendor, %url, "fetching vendor listing");

        let res = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|source| VendorError::Transport { vendor, source })?;

        if !res.status().is_success() {
            return Err(VendorError::Status {
                vendor,
                status: res.status(),
            });
        }

        res.json::<Vec<RawProduct>>()
            .await
            .map_err(|source| VendorError::Payload { vendor, source })
    }
}
