//! Error types for the gateway domain
//!
//! Query errors carry the exact client-facing message.

use thiserror::Error;

/// Rejection of a listing query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid number of products requested")]
    InvalidCount,

    #[error("Invalid page requested")]
    InvalidPage,

    #[error("Invalid price range")]
    InvalidPriceRange,

    #[error("Invalid sort order")]
    InvalidSortOrder,

    /// Query string could not be decoded at all (e.g. a repeated key)
    #[error("Invalid query string")]
    Malformed,
}

/// Unknown vendor tag
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown vendor: {tag}")]
pub struct VendorParseError {
    pub tag: String,
}
