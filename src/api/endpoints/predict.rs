//! Prediction endpoint.

use std::collections::HashMap;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::{Extension, Form, Json};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, RequestId};
use crate::prediction::{self, AppointmentRecord};

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub estado_cita: String,
}

/// `POST /predict`: form-encoded appointment record in, predicted status out.
pub async fn predict(
    State(ctx): State<ApiContext>,
    request_id: Option<Extension<RequestId>>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Form(pairs) = form?;
    let fields = first_values(pairs);
    let request_id = request_id.map(|Extension(RequestId(id))| id);
    tracing::debug!(?request_id, ?fields, "Received form");

    let record = AppointmentRecord::from_form(&fields)?;
    let prediction = prediction::predict(&ctx.artifacts, &record)?;

    Ok(Json(PredictResponse {
        estado_cita: prediction.label,
    }))
}

/// Collapse repeated keys, keeping the first value submitted for each.
fn first_values(pairs: Vec<(String, String)>) -> HashMap<String, String> {
    let mut fields = HashMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        fields.entry(key).or_insert(value);
    }
    fields
}
