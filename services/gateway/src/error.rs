use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use types::errors::QueryError;

use crate::catalog::LookupError;
use crate::vendor::VendorError;

pub const LISTING_FAILED: &str = "Failed to fetch products";
pub const PRODUCT_NOT_FOUND: &str = "Product not found";
pub const LOOKUP_FAILED: &str = "Failed to fetch product details";

/// Central error type for the gateway.
///
/// Every variant renders as `{"error": <message>}`. Upstream detail is logged
/// when the error is created, never sent to the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(#[from] QueryError),

    #[error("Not found: {0}")]
    NotFound(&'static str),

    #[error("Upstream failure: {0}")]
    Upstream(&'static str),
}

impl From<VendorError> for AppError {
    fn from(err: VendorError) -> Self {
        tracing::warn!(vendor = %err.vendor(), error = %err, "vendor listing failed");
        AppError::Upstream(LISTING_FAILED)
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "query string rejected");
        AppError::BadRequest(QueryError::Malformed)
    }
}

impl From<LookupError> for AppError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound(_) => AppError::NotFound(PRODUCT_NOT_FOUND),
            LookupError::Upstream(detail) => {
                tracing::warn!(%detail, "product lookup failed");
                AppError::Upstream(LOOKUP_FAILED)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            AppError::Upstream(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string()),
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}
