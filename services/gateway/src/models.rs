use serde::{Deserialize, Serialize};
use serde_json::Value;
use types::ids::ProductId;

/// Entry of the fixed sample catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleProduct {
    pub id: ProductId,
    pub name: String,
    pub price: u64,
}

/// Body of a single-product response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProductDetails {
    Sample(SampleProduct),
    /// Upstream detail payload, relayed as-is
    Upstream(Value),
}
