//! Product aggregation gateway
//!
//! Fans a category listing out to every configured vendor, merges the
//! results, then sorts and paginates them behind a small REST surface.

pub mod aggregator;
pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
pub mod vendor;
