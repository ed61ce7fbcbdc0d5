//! Appointment record parsed from the request form.

use std::collections::HashMap;

use super::features::FeatureRow;
use super::PredictionError;

pub const EDAD: &str = "edad";
pub const CITAS_TOTALES: &str = "citas_totales";
pub const CITAS_ASISTIDAS: &str = "citas_asistidas";
pub const ESTADO_TRATAMIENTO: &str = "estado_tratamiento";
pub const MONTO_ULTIMO_PAGO: &str = "monto_ultimo_pago";
pub const DIAS_ENTRE_CITAS: &str = "dias_entre_citas";

/// All required request fields, in form order.
pub const RECORD_FIELDS: [&str; 6] = [
    EDAD,
    CITAS_TOTALES,
    CITAS_ASISTIDAS,
    ESTADO_TRATAMIENTO,
    MONTO_ULTIMO_PAGO,
    DIAS_ENTRE_CITAS,
];

/// The one field that goes through the ordinal encoder.
pub const CATEGORICAL_FIELD: &str = ESTADO_TRATAMIENTO;

#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentRecord {
    pub edad: f64,
    pub citas_totales: f64,
    pub citas_asistidas: f64,
    /// Matched verbatim against the encoder vocabulary (no case folding).
    pub estado_tratamiento: String,
    pub monto_ultimo_pago: f64,
    pub dias_entre_citas: f64,
}

impl AppointmentRecord {
    /// Parse the six required fields. Fails on the first missing or
    /// unparseable field, in form order.
    pub fn from_form(fields: &HashMap<String, String>) -> Result<Self, PredictionError> {
        Ok(Self {
            edad: number(fields, EDAD)?,
            citas_totales: number(fields, CITAS_TOTALES)?,
            citas_asistidas: number(fields, CITAS_ASISTIDAS)?,
            estado_tratamiento: text(fields, ESTADO_TRATAMIENTO)?.to_string(),
            monto_ultimo_pago: number(fields, MONTO_ULTIMO_PAGO)?,
            dias_entre_citas: number(fields, DIAS_ENTRE_CITAS)?,
        })
    }

    /// Bind every field by name. The categorical field takes its encoded value.
    pub fn feature_row(&self, encoded_estado: f64) -> FeatureRow {
        let mut row = FeatureRow::new();
        row.bind(EDAD, self.edad);
        row.bind(CITAS_TOTALES, self.citas_totales);
        row.bind(CITAS_ASISTIDAS, self.citas_asistidas);
        row.bind(ESTADO_TRATAMIENTO, encoded_estado);
        row.bind(MONTO_ULTIMO_PAGO, self.monto_ultimo_pago);
        row.bind(DIAS_ENTRE_CITAS, self.dias_entre_citas);
        row
    }
}

fn text<'a>(
    fields: &'a HashMap<String, String>,
    name: &'static str,
) -> Result<&'a str, PredictionError> {
    fields
        .get(name)
        .map(String::as_str)
        .ok_or(PredictionError::MissingField(name))
}

fn number(fields: &HashMap<String, String>, name: &'static str) -> Result<f64, PredictionError> {
    let raw = text(fields, name)?;
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| PredictionError::InvalidNumber {
            field: name,
            value: raw.to_string(),
        })?;
    if !value.is_finite() {
        return Err(PredictionError::NonFinite {
            field: name,
            value: raw.to_string(),
        });
    }
    Ok(value)
}
