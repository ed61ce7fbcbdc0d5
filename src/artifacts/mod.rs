//! Model artifacts: classifier, scaler, encoders and feature order.
//!
//! Loaded once at startup from JSON exports produced by the offline
//! training pipeline. Loading fails on the first missing, malformed or
//! mutually inconsistent artifact; the service never starts half-loaded.
//! After load the bundle is read-only and shared behind an `Arc`.

pub mod encoder;
pub mod forest;
pub mod scaler;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config;
use crate::prediction::record::{CATEGORICAL_FIELD, RECORD_FIELDS};

pub use encoder::{EncodeError, LabelDecoder, OrdinalEncoder};
pub use forest::{ForestPrediction, RandomForest};
pub use scaler::FeatureScaler;

/// Structural problem inside a single artifact, raised while deserializing it.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct InvalidArtifact(pub String);

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid artifact {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Artifacts are inconsistent: {0}")]
    Inconsistent(String),
}

/// Failure inside transform/predict for a single row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("{stage} expects {expected} features, got {actual}")]
    FeatureCount {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Predicted class {0} has no label")]
    UnknownClass(usize),
    #[error("Feature {0} was not bound")]
    MissingFeature(String),
    #[error("Input contains infinity or a value too large for float32 at column {0}")]
    NonFiniteInput(usize),
}

// ═══════════════════════════════════════════════════════════
// ModelArtifacts
// ═══════════════════════════════════════════════════════════

/// Everything inference needs. No method takes `&mut self`.
#[derive(Debug)]
pub struct ModelArtifacts {
    classifier: RandomForest,
    scaler: FeatureScaler,
    label_decoder: LabelDecoder,
    category_encoder: OrdinalEncoder,
    feature_names: Vec<String>,
}

impl ModelArtifacts {
    /// Load all five artifacts from `dir` and check them against each other.
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let classifier: RandomForest = read_json(dir, config::CLASSIFIER_FILE)?;
        let scaler: FeatureScaler = read_json(dir, config::SCALER_FILE)?;
        let label_decoder: LabelDecoder = read_json(dir, config::LABEL_DECODER_FILE)?;
        let category_encoder: OrdinalEncoder = read_json(dir, config::CATEGORY_ENCODER_FILE)?;
        let feature_names: Vec<String> = read_json(dir, config::FEATURE_NAMES_FILE)?;

        let artifacts = Self::new(
            classifier,
            scaler,
            label_decoder,
            category_encoder,
            feature_names,
        )?;

        tracing::info!(
            dir = %dir.display(),
            trees = artifacts.classifier.num_trees(),
            nodes = artifacts.classifier.num_nodes(),
            features = artifacts.feature_names.len(),
            classes = artifacts.label_decoder.classes().len(),
            "Model, scaler, label decoder and ordinal encoder loaded"
        );
        tracing::debug!(
            categories = ?artifacts.category_encoder.categories(CATEGORICAL_FIELD),
            "Ordinal encoder categories"
        );
        tracing::debug!(
            feature_names = ?artifacts.scaler.feature_names(),
            "Scaler feature names"
        );
        tracing::debug!(features = ?artifacts.feature_names, "Selected features");

        Ok(artifacts)
    }

    /// Assemble a bundle from already-parsed parts, enforcing cross-artifact consistency.
    pub fn new(
        classifier: RandomForest,
        scaler: FeatureScaler,
        label_decoder: LabelDecoder,
        category_encoder: OrdinalEncoder,
        feature_names: Vec<String>,
    ) -> Result<Self, ArtifactError> {
        check_feature_names(&feature_names)?;

        let n = feature_names.len();
        if scaler.n_features() != n {
            return Err(ArtifactError::Inconsistent(format!(
                "scaler has {} columns, feature list has {n}",
                scaler.n_features()
            )));
        }
        if let Some(names) = scaler.feature_names() {
            if names != feature_names.as_slice() {
                return Err(ArtifactError::Inconsistent(format!(
                    "scaler columns {names:?} do not match feature list {feature_names:?}"
                )));
            }
        }
        if classifier.n_features() != n {
            return Err(ArtifactError::Inconsistent(format!(
                "classifier expects {} features, feature list has {n}",
                classifier.n_features()
            )));
        }
        if let Some(class) = classifier
            .classes()
            .iter()
            .find(|c| label_decoder.decode(**c).is_err())
        {
            return Err(ArtifactError::Inconsistent(format!(
                "classifier class {class} has no label (decoder knows {})",
                label_decoder.classes().len()
            )));
        }
        if category_encoder.categories(CATEGORICAL_FIELD).is_none() {
            return Err(ArtifactError::Inconsistent(format!(
                "ordinal encoder has no categories for {CATEGORICAL_FIELD}"
            )));
        }

        Ok(Self {
            classifier,
            scaler,
            label_decoder,
            category_encoder,
            feature_names,
        })
    }

    pub fn classifier(&self) -> &RandomForest {
        &self.classifier
    }

    pub fn scaler(&self) -> &FeatureScaler {
        &self.scaler
    }

    pub fn label_decoder(&self) -> &LabelDecoder {
        &self.label_decoder
    }

    pub fn category_encoder(&self) -> &OrdinalEncoder {
        &self.category_encoder
    }

    /// Column order the scaler and classifier were fit on.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}

fn check_feature_names(names: &[String]) -> Result<(), ArtifactError> {
    if names.is_empty() {
        return Err(ArtifactError::Inconsistent("feature list is empty".into()));
    }
    let mut seen = HashSet::new();
    for name in names {
        if !RECORD_FIELDS.contains(&name.as_str()) {
            return Err(ArtifactError::Inconsistent(format!(
                "feature {name:?} is not an appointment field"
            )));
        }
        if !seen.insert(name.as_str()) {
            return Err(ArtifactError::Inconsistent(format!(
                "feature {name:?} is listed twice"
            )));
        }
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T, ArtifactError> {
    let path = dir.join(file);
    let bytes = std::fs::read(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ArtifactError::NotFound(path.clone()),
        _ => ArtifactError::Io {
            path: path.clone(),
            source: e,
        },
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse { path, source })
}
