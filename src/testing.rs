//! Test fixtures: a small deterministic artifact set.
//!
//! Feature order deliberately differs from the appointment field order so
//! that tests catch any positional (rather than name-keyed) row assembly.
//!
//! With the example record (edad 45, citas_totales 10, citas_asistidas 8,
//! activo, monto 150, dias 14) the scaled row is
//! `[1.5, 0.5, -1.0, 0.5, -0.6, 1.0]` and the forest averages to
//! `[0.7, 0.15, 0.15]`, i.e. "asistida".

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use crate::artifacts::ModelArtifacts;
use crate::config;

pub const FEATURE_ORDER: [&str; 6] = [
    "citas_asistidas",
    "edad",
    "estado_tratamiento",
    "citas_totales",
    "dias_entre_citas",
    "monto_ultimo_pago",
];

pub const LABELS: [&str; 3] = ["asistida", "cancelada", "inasistencia"];

pub const CATEGORIES: [&str; 3] = ["activo", "finalizado", "suspendido"];

pub fn feature_names_json() -> Value {
    json!(FEATURE_ORDER)
}

pub fn scaler_json() -> Value {
    json!({
        "kind": "standard",
        "feature_names": FEATURE_ORDER,
        "mean": [5.0, 40.0, 1.0, 8.0, 20.0, 100.0],
        "scale": [2.0, 10.0, 1.0, 4.0, 10.0, 50.0],
    })
}

pub fn classifier_json() -> Value {
    json!({
        "n_features": 6,
        "classes": [0, 1, 2],
        "trees": [
            // citas_asistidas, then estado_tratamiento
            {
                "children_left":  [1, 2, -1, -1, -1],
                "children_right": [4, 3, -1, -1, -1],
                "feature":        [0, 2, -2, -2, -2],
                "threshold":      [0.0, 0.5, -2.0, -2.0, -2.0],
                "value": [
                    [20.0, 20.0, 20.0],
                    [4.0, 18.0, 18.0],
                    [1.0, 1.0, 8.0],
                    [1.0, 8.0, 1.0],
                    [8.0, 1.0, 1.0],
                ],
            },
            // dias_entre_citas
            {
                "children_left":  [1, -1, -1],
                "children_right": [2, -1, -1],
                "feature":        [4, -2, -2],
                "threshold":      [0.0, -2.0, -2.0],
                "value": [
                    [0.4, 0.2, 0.4],
                    [0.6, 0.2, 0.2],
                    [0.2, 0.2, 0.6],
                ],
            },
        ],
    })
}

pub fn label_decoder_json() -> Value {
    json!({ "classes": LABELS })
}

pub fn category_encoder_json() -> Value {
    json!({
        "feature_names": ["estado_tratamiento"],
        "categories": [CATEGORIES],
    })
}

/// A single-leaf tree that always predicts `weights`.
pub fn leaf_tree_json(weights: [f64; 3]) -> Value {
    json!({
        "children_left": [-1],
        "children_right": [-1],
        "feature": [-2],
        "threshold": [-2.0],
        "value": [weights],
    })
}

/// Write the fixture artifact files into `dir`.
pub fn write_artifacts(dir: &Path) {
    let files = [
        (config::CLASSIFIER_FILE, classifier_json()),
        (config::SCALER_FILE, scaler_json()),
        (config::LABEL_DECODER_FILE, label_decoder_json()),
        (config::CATEGORY_ENCODER_FILE, category_encoder_json()),
        (config::FEATURE_NAMES_FILE, feature_names_json()),
    ];
    for (file, value) in files {
        std::fs::write(dir.join(file), serde_json::to_vec_pretty(&value).unwrap()).unwrap();
    }
}

/// Fixture bundle built in memory.
pub fn sample_artifacts() -> Arc<ModelArtifacts> {
    let artifacts = ModelArtifacts::new(
        serde_json::from_value(classifier_json()).unwrap(),
        serde_json::from_value(scaler_json()).unwrap(),
        serde_json::from_value(label_decoder_json()).unwrap(),
        serde_json::from_value(category_encoder_json()).unwrap(),
        serde_json::from_value(feature_names_json()).unwrap(),
    )
    .unwrap();
    Arc::new(artifacts)
}

/// Form fields for the reference appointment.
pub fn sample_form() -> HashMap<String, String> {
    [
        ("edad", "45"),
        ("citas_totales", "10"),
        ("citas_asistidas", "8"),
        ("estado_tratamiento", "activo"),
        ("monto_ultimo_pago", "150.0"),
        ("dias_entre_citas", "14"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// URL-encode form fields (a map or a list of pairs) as a request body.
pub fn form_body<T: Serialize + ?Sized>(fields: &T) -> String {
    serde_urlencoded::to_string(fields).unwrap()
}
