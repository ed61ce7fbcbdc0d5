//! Appointment-status prediction.
//!
//! Record → ordinal-encode `estado_tratamiento` → name-keyed row →
//! ordered row → scale → forest → decoded label. Stateless; reads the
//! shared artifacts and nothing else.

pub mod features;
pub mod record;

use thiserror::Error;

use crate::artifacts::{EncodeError, InferenceError, ModelArtifacts};

pub use features::FeatureRow;
pub use record::AppointmentRecord;

use record::CATEGORICAL_FIELD;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field {field} is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Field {field} must be a finite number: {value:?}")]
    NonFinite { field: &'static str, value: String },

    #[error("{0}")]
    UnknownCategory(EncodeError),

    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),
}

impl From<EncodeError> for PredictionError {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::UnknownCategory { .. } => PredictionError::UnknownCategory(err),
            // The encoder column set is checked at load; reaching this is an artifact fault.
            EncodeError::UnknownColumn(_) => PredictionError::Inference(
                InferenceError::MissingFeature(CATEGORICAL_FIELD.to_string()),
            ),
        }
    }
}

/// Successful prediction for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub class: usize,
    /// Mean forest probability per fitted class.
    pub probabilities: Vec<f64>,
}

/// Run the full pipeline for one record.
pub fn predict(
    artifacts: &ModelArtifacts,
    record: &AppointmentRecord,
) -> Result<Prediction, PredictionError> {
    tracing::debug!(
        edad = record.edad,
        citas_totales = record.citas_totales,
        citas_asistidas = record.citas_asistidas,
        estado_tratamiento = %record.estado_tratamiento,
        monto_ultimo_pago = record.monto_ultimo_pago,
        dias_entre_citas = record.dias_entre_citas,
        "Received appointment record"
    );

    let encoded = artifacts
        .category_encoder()
        .encode(CATEGORICAL_FIELD, &record.estado_tratamiento)?;
    tracing::debug!(encoded, "Encoded estado_tratamiento");

    let row = record
        .feature_row(encoded)
        .to_ordered(artifacts.feature_names())?;
    tracing::debug!(columns = ?artifacts.feature_names(), row = %row, "Row before scaling");

    let scaled = artifacts.scaler().transform(row.view())?;
    tracing::debug!(row = %scaled, "Row after scaling");

    let forest = artifacts.classifier().predict(scaled.view())?;
    let label = artifacts.label_decoder().decode(forest.class)?.to_string();
    tracing::debug!(
        class = forest.class,
        probabilities = %forest.probabilities,
        label = %label,
        "Prediction"
    );

    Ok(Prediction {
        label,
        class: forest.class,
        probabilities: forest.probabilities.to_vec(),
    })
}
