//! Types library for the product aggregation gateway
//!
//! Shared definitions used by the gateway service: product and vendor
//! identities, the validated listing query, and the error taxonomy.
//!
//! # Modules
//! - `ids`: Product identifiers and the `IdGenerator` seam
//! - `vendor`: Fixed set of upstream companies
//! - `product`: Aggregated product records
//! - `query`: Validated listing parameters and page windows
//! - `errors`: Error taxonomy

// Public modules
pub mod ids;
pub mod vendor;
pub mod product;
pub mod query;
pub mod errors;
