//! Per-column feature scaling fit at training time.

use ndarray::{Array1, ArrayView1};
use serde::Deserialize;

use super::{InferenceError, InvalidArtifact};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerExport {
    /// Standardization: `(x - mean) / scale`. A null `mean` or `scale`
    /// means centering or scaling was disabled when fitting.
    Standard {
        #[serde(default)]
        feature_names: Option<Vec<String>>,
        #[serde(default)]
        mean: Option<Vec<f64>>,
        #[serde(default)]
        scale: Option<Vec<f64>>,
    },
    /// Min-max: `x * scale + min`.
    MinMax {
        #[serde(default)]
        feature_names: Option<Vec<String>>,
        min: Vec<f64>,
        scale: Vec<f64>,
    },
}

#[derive(Debug, Clone)]
enum Scaling {
    Standard {
        mean: Option<Array1<f64>>,
        scale: Option<Array1<f64>>,
    },
    MinMax {
        min: Array1<f64>,
        scale: Array1<f64>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "ScalerExport")]
pub struct FeatureScaler {
    feature_names: Option<Vec<String>>,
    n_features: usize,
    scaling: Scaling,
}

impl TryFrom<ScalerExport> for FeatureScaler {
    type Error = InvalidArtifact;

    fn try_from(export: ScalerExport) -> Result<Self, Self::Error> {
        let (feature_names, scaling, lengths) = match export {
            ScalerExport::Standard {
                feature_names,
                mean,
                scale,
            } => {
                if let Some(mean) = &mean {
                    if mean.iter().any(|m| !m.is_finite()) {
                        return Err(InvalidArtifact(
                            "standard scaler has a non-finite mean".into(),
                        ));
                    }
                }
                if let Some(scale) = &scale {
                    check_scale(scale)?;
                }
                let lengths = [
                    mean.as_ref().map(Vec::len),
                    scale.as_ref().map(Vec::len),
                    feature_names.as_ref().map(Vec::len),
                ];
                let scaling = Scaling::Standard {
                    mean: mean.map(Array1::from),
                    scale: scale.map(Array1::from),
                };
                (feature_names, scaling, lengths)
            }
            ScalerExport::MinMax {
                feature_names,
                min,
                scale,
            } => {
                if min.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
                    return Err(InvalidArtifact("min-max scaler has non-finite parameters".into()));
                }
                let lengths = [
                    Some(min.len()),
                    Some(scale.len()),
                    feature_names.as_ref().map(Vec::len),
                ];
                let scaling = Scaling::MinMax {
                    min: Array1::from(min),
                    scale: Array1::from(scale),
                };
                (feature_names, scaling, lengths)
            }
        };

        let mut known = lengths.iter().flatten();
        let n_features = *known
            .next()
            .ok_or_else(|| InvalidArtifact("scaler does not declare its column count".into()))?;
        if known.any(|len| *len != n_features) {
            return Err(InvalidArtifact(format!(
                "scaler parameter lengths disagree: {lengths:?}"
            )));
        }
        if n_features == 0 {
            return Err(InvalidArtifact("scaler has zero columns".into()));
        }

        Ok(Self {
            feature_names,
            n_features,
            scaling,
        })
    }
}

fn check_scale(scale: &[f64]) -> Result<(), InvalidArtifact> {
    if scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
        return Err(InvalidArtifact(
            "standard scaler has a zero or non-finite scale".into(),
        ));
    }
    Ok(())
}

impl FeatureScaler {
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Column names recorded at fit time, when the scaler was fit on named columns.
    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    pub fn transform(&self, row: ArrayView1<'_, f64>) -> Result<Array1<f64>, InferenceError> {
        if row.len() != self.n_features {
            return Err(InferenceError::FeatureCount {
                stage: "scaler",
                expected: self.n_features,
                actual: row.len(),
            });
        }

        let scaled = match &self.scaling {
            Scaling::Standard { mean, scale } => {
                let mut out = row.to_owned();
                if let Some(mean) = mean {
                    out -= mean;
                }
                if let Some(scale) = scale {
                    out /= scale;
                }
                out
            }
            Scaling::MinMax { min, scale } => &row * scale + min,
        };
        Ok(scaled)
    }
}
