//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub features: Vec<String>,
    pub classes: Vec<String>,
}

/// `GET /health`: liveness plus a summary of the loaded model.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        features: ctx.artifacts.feature_names().to_vec(),
        classes: ctx.artifacts.label_decoder().classes().to_vec(),
    })
}
