//! Aggregated product records
//!
//! Upstream items are opaque JSON objects. The gateway keeps every upstream
//! attribute, then stamps its own `id` and `company` on top.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;

use crate::ids::ProductId;
use crate::query::{SortOrder, SortSpec};
use crate::vendor::Vendor;

/// Raw upstream item as returned by a vendor
pub type RawProduct = Map<String, Value>;

/// A product as served by the gateway
///
/// `id` and `company` are always assigned locally; upstream values for those
/// keys are discarded in [`Product::from_raw`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(flatten)]
    pub attributes: RawProduct,
    pub id: ProductId,
    pub company: Vendor,
}

impl Product {
    /// Build a product from an upstream item, its vendor and a fresh id
    pub fn from_raw(mut raw: RawProduct, company: Vendor, id: ProductId) -> Self {
        raw.remove("id");
        raw.remove("company");
        Self {
            attributes: raw,
            id,
            company,
        }
    }

    /// Numeric value of `field`: a JSON number or a string holding a finite number
    pub fn numeric_field(&self, field: &str) -> Option<f64> {
        match self.attributes.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    pub fn price(&self) -> Option<f64> {
        self.numeric_field("price")
    }
}

/// Stable sort of `products` by a numeric field.
///
/// Products missing the key (or holding a non-number) go after every keyed
/// product regardless of direction and keep their relative order.
pub fn sort_products(products: &mut [Product], spec: &SortSpec) {
    products.sort_by(|a, b| {
        compare_keys(
            a.numeric_field(&spec.field),
            b.numeric_field(&spec.field),
            spec.order,
        )
    });
}

fn compare_keys(a: Option<f64>, b: Option<f64>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => match order {
            SortOrder::Asc => x.total_cmp(&y),
            SortOrder::Desc => y.total_cmp(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
