//! Single-product lookup
//!
//! Two implementations back the detail route; [`crate::config::LookupMode`]
//! picks one at start-up.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use types::ids::ProductId;

use crate::models::{ProductDetails, SampleProduct};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("product {0} not found")]
    NotFound(ProductId),

    #[error("upstream lookup failed: {0}")]
    Upstream(String),
}

#[async_trait]
pub trait ProductLookup: Send + Sync {
    async fn find(
        &self,
        category: &str,
        product_id: &ProductId,
    ) -> Result<ProductDetails, LookupError>;
}

/// Five fixed products, ids "1".."5", priced 100..500
pub fn sample_products() -> Vec<SampleProduct> {
    (1..=5u64)
        .map(|i| SampleProduct {
            id: ProductId::new(i.to_string()),
            name: format!("Product {i}"),
            price: i * 100,
        })
        .collect()
}

/// Resolves ids against [`sample_products`] after a fixed delay
pub struct MockCatalog {
    products: Vec<SampleProduct>,
    delay: Duration,
}

impl MockCatalog {
    pub fn new(delay: Duration) -> Self {
        Self {
            products: sample_products(),
            delay,
        }
    }
}

#[async_trait]
impl ProductLookup for MockCatalog {
    async fn find(
        &self,
        _category: &str,
        product_id: &ProductId,
    ) -> Result<ProductDetails, LookupError> {
        tokio::time::sleep(self.delay).await;
        self.products
            .iter()
            .find(|p| &p.id == product_id)
            .cloned()
            .map(ProductDetails::Sample)
            .ok_or_else(|| LookupError::NotFound(product_id.clone()))
    }
}

/// Relays `GET {base}/{category}/products/{id}`
pub struct UpstreamLookup {
    http_client: Client,
    base_url: String,
}

impl UpstreamLookup {
    pub fn new(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    fn detail_url(&self, category: &str, product_id: &ProductId) -> Option<Url> {
        let mut url = Url::parse(&self.base_url).ok()?;
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend([category, "products", product_id.as_str()]);
        Some(url)
    }
}

#[async_trait]
impl ProductLookup for UpstreamLookup {
    async fn find(
        &self,
        category: &str,
        product_id: &ProductId,
    ) -> Result<ProductDetails, LookupError> {
        let url = self
            .detail_url(category, product_id)
            .ok_or_else(|| {
                LookupError::Upstream(format!("invalid upstream url {:?}", self.base_url))
            })?;

        let res = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::Upstream(e.to_string()))?;

        if !res.status().is_success() {
            return Err(LookupError::Upstream(format!("status {}", res.status())));
        }

        res.json::<Value>()
            .await
            .map(ProductDetails::Upstream)
            .map_err(|e| LookupError::Upstream(e.to_string()))
    }
}
