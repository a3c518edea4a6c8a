use reqwest::Client;
use std::sync::Arc;
use types::ids::UuidGenerator;

use crate::aggregator::Aggregator;
use crate::catalog::{MockCatalog, ProductLookup, UpstreamLookup};
use crate::config::{GatewayConfig, LookupMode};
use crate::vendor::HttpVendorClient;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub lookup: Arc<dyn ProductLookup>,
}

impl AppState {
    pub fn new(aggregator: Aggregator, lookup: Arc<dyn ProductLookup>) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            lookup,
        }
    }

    /// Production wiring: one shared HTTP client, random product ids
    pub fn from_config(config: &GatewayConfig) -> Self {
        let http_client = Client::new();

        let vendors = HttpVendorClient::new(
            http_client.clone(),
            config.upstream_base_url.clone(),
            config.vendor_fetch_limit,
        );
        let aggregator = Aggregator::new(Arc::new(vendors), Arc::new(UuidGenerator))
            .with_vendors(config.vendors.clone())
            .with_concurrency(config.vendor_concurrency)
            .with_max_page_size(config.max_page_size);

        let lookup: Arc<dyn ProductLookup> = match config.lookup_mode {
            LookupMode::Mock => Arc::new(MockCatalog::new(config.lookup_delay)),
            LookupMode::Upstream => Arc::new(UpstreamLookup::new(
                http_client,
                config.upstream_base_url.clone(),
            )),
        };

        Self::new(aggregator, lookup)
    }
}
