//! HTTP router.
//!
//! - `GET /`: input form
//! - `POST /predict`: prediction (responses carry `Cache-Control: no-store`)
//! - `GET /health`: liveness and model summary
//!
//! Everything sits behind the access-log middleware and a small body limit.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::artifacts::ModelArtifacts;

/// Form bodies are six short fields; anything larger is rejected.
pub const MAX_BODY_BYTES: usize = 16 * 1024;

/// Build the prediction router around a loaded artifact bundle.
pub fn prediction_router(artifacts: Arc<ModelArtifacts>) -> Router {
    let ctx = ApiContext::new(artifacts);

    // Patient data must not be cached by browsers or proxies.
    let predict = Router::new()
        .route("/predict", post(endpoints::predict::predict))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    Router::new()
        .route("/", get(endpoints::form::page))
        .route("/health", get(endpoints::health::check))
        .merge(predict)
        .fallback(endpoints::not_found)
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(middleware::access::log_access))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::api::middleware::access::REQUEST_ID_HEADER;
    use crate::prediction::record::RECORD_FIELDS;
    use crate::testing;

    fn app() -> Router {
        prediction_router(testing::sample_artifacts())
    }

    fn post_form(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    async fn submit(fields: &HashMap<String, String>) -> Response {
        app()
            .oneshot(post_form(testing::form_body(fields)))
            .await
            .unwrap()
    }

    async fn json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn reference_record_returns_label() {
        let response = submit(&testing::sample_form()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );

        let body = json(response).await;
        assert_eq!(body, serde_json::json!({ "estado_cita": "asistida" }));
    }

    #[tokio::test]
    async fn repeated_requests_are_deterministic() {
        let app = app();
        let mut labels = Vec::new();
        for _ in 0..5 {
            let response = app
                .clone()
                .oneshot(post_form(testing::form_body(&testing::sample_form())))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            labels.push(json(response).await["estado_cita"].clone());
        }
        assert!(labels.windows(2).all(|w| w[0] == w[1]));
    }

    #[tokio::test]
    async fn success_body_has_only_estado_cita() {
        let mut form = testing::sample_form();
        form.insert("citas_asistidas".into(), "2".into());
        form.insert("estado_tratamiento".into(), "suspendido".into());
        form.insert("dias_entre_citas".into(), "40".into());

        let body = json(submit(&form).await).await;
        let obj = body.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["estado_cita"], "cancelada");
    }

    #[tokio::test]
    async fn missing_field_returns_400() {
        for field in RECORD_FIELDS {
            let mut form = testing::sample_form();
            form.remove(field);
            let response = submit(&form).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "field {field}");
            let body = json(response).await;
            let message = body["error"].as_str().unwrap();
            assert!(message.contains(field), "{message}");
        }
    }

    #[tokio::test]
    async fn missing_monto_ultimo_pago_returns_400() {
        let mut form = testing::sample_form();
        form.remove("monto_ultimo_pago");
        let response = submit(&form).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );
        assert_eq!(
            json(response).await["error"],
            "Missing required field: monto_ultimo_pago"
        );
    }

    #[tokio::test]
    async fn non_numeric_field_returns_400() {
        let mut form = testing::sample_form();
        form.insert("edad".into(), "cuarenta".into());
        let response = submit(&form).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!json(response).await["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_category_returns_400() {
        let mut form = testing::sample_form();
        form.insert("estado_tratamiento".into(), "en pausa".into());
        let response = submit(&form).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json(response).await["error"],
            "Unknown category \"en pausa\" for estado_tratamiento"
        );
    }

    #[tokio::test]
    async fn value_overflowing_single_precision_returns_400() {
        let mut form = testing::sample_form();
        form.insert("citas_asistidas".into(), "1e300".into());
        let response = submit(&form).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json(response).await;
        assert!(body["error"].as_str().unwrap().contains("infinity"), "{body}");
    }

    #[tokio::test]
    async fn repeated_field_uses_first_value() {
        let mut pairs: Vec<(String, String)> = testing::sample_form().into_iter().collect();
        pairs.push(("estado_tratamiento".into(), "inventado".into()));
        let response = app()
            .oneshot(post_form(testing::form_body(&pairs)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["estado_cita"], "asistida");

        // The first occurrence decides, even when it is the bad one.
        let mut pairs: Vec<(String, String)> =
            vec![("estado_tratamiento".into(), "inventado".into())];
        pairs.extend(testing::sample_form());
        let response = app()
            .oneshot(post_form(testing::form_body(&pairs)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn wrong_content_type_returns_400() {
        let req = Request::builder()
            .method("POST")
            .uri("/predict")
            .header("Content-Type", "application/json")
            .body(Body::from(r#"{"edad":45}"#))
            .unwrap();
        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn get_predict_is_not_allowed() {
        let req = Request::builder()
            .uri("/predict")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn form_page_is_served() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html"));

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("action=\"/predict\""));
    }

    #[tokio::test]
    async fn health_reports_model_summary() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["features"], serde_json::json!(testing::FEATURE_ORDER));
        assert_eq!(body["classes"], serde_json::json!(testing::LABELS));
    }

    #[tokio::test]
    async fn unknown_route_returns_404_json() {
        let req = Request::builder().uri("/nonexistent").body(Body::empty()).unwrap();
        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json(response).await["error"], "Not found: /nonexistent");
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let response = submit(&testing::sample_form()).await;
        let id = response.headers().get(REQUEST_ID_HEADER).unwrap();
        assert!(uuid::Uuid::parse_str(id.to_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let mut form = testing::sample_form();
        form.insert("relleno".into(), "x".repeat(MAX_BODY_BYTES + 1));
        let response = submit(&form).await;
        assert!(response.status().is_client_error());
        assert_ne!(response.status(), StatusCode::OK);
    }
}
