//! Access logging middleware.
//!
//! Tags every request with a UUID, logs method, path, status and
//! latency, and echoes the id back in `X-Request-Id`.

use std::time::Instant;

use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::api::types::RequestId;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

pub async fn log_access(mut req: Request<axum::body::Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    req.extensions_mut().insert(RequestId(request_id));

    let mut response = next.run(req).await;

    let status = response.status().as_u16();
    tracing::info!(
        %request_id,
        %method,
        %path,
        status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "HTTP request"
    );

    if let Ok(val) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    response
}
