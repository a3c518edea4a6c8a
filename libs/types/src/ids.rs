//! Identifier types for products
//!
//! Every product leaving the gateway carries an id minted here, never the one
//! supplied by upstream. Generation sits behind [`IdGenerator`] so tests can
//! inject deterministic ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Unique identifier for a product
///
/// Stored as a string: aggregated products get random UUIDs while the
/// sample catalog uses short numeric ids ("1".."5").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a ProductId from any string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create from existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid.to_string())
    }

    /// Get the id string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of fresh product identifiers
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> ProductId;
}

/// Random v4 UUIDs; the production generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> ProductId {
        ProductId::from_uuid(Uuid::new_v4())
    }
}

/// Deterministic generator yielding `{prefix}-1`, `{prefix}-2`, ...
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> ProductId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        ProductId::new(format!("{}-{}", self.prefix, n))
    }
}
