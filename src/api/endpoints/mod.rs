//! API endpoint handlers.

pub mod form;
pub mod health;
pub mod predict;

use axum::http::Uri;

use crate::api::error::ApiError;

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
