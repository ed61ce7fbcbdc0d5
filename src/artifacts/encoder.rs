//! Categorical encoders: ordinal encoding of input columns and
//! decoding of predicted class indices back to labels.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use super::{InferenceError, InvalidArtifact};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("Unknown category {value:?} for {column}")]
    UnknownCategory { column: String, value: String },
    #[error("Encoder has no column named {0}")]
    UnknownColumn(String),
}

// ═══════════════════════════════════════════════════════════
// Ordinal encoder
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct OrdinalEncoderExport {
    pub feature_names: Vec<String>,
    /// One category list per column, in fitted order.
    pub categories: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
struct EncodedColumn {
    name: String,
    categories: Vec<String>,
    codes: HashMap<String, usize>,
}

/// Maps each column's categories to their position in the fitted list.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "OrdinalEncoderExport")]
pub struct OrdinalEncoder {
    columns: Vec<EncodedColumn>,
}

impl TryFrom<OrdinalEncoderExport> for OrdinalEncoder {
    type Error = InvalidArtifact;

    fn try_from(export: OrdinalEncoderExport) -> Result<Self, Self::Error> {
        if export.feature_names.len() != export.categories.len() {
            return Err(InvalidArtifact(format!(
                "ordinal encoder has {} column names but {} category lists",
                export.feature_names.len(),
                export.categories.len()
            )));
        }

        let mut columns = Vec::with_capacity(export.categories.len());
        for (name, categories) in export.feature_names.into_iter().zip(export.categories) {
            if categories.is_empty() {
                return Err(InvalidArtifact(format!("column {name} has no categories")));
            }
            let mut codes = HashMap::with_capacity(categories.len());
            for (code, category) in categories.iter().enumerate() {
                if codes.insert(category.clone(), code).is_some() {
                    return Err(InvalidArtifact(format!(
                        "column {name} lists category {category:?} twice"
                    )));
                }
            }
            columns.push(EncodedColumn {
                name,
                categories,
                codes,
            });
        }

        Ok(Self { columns })
    }
}

impl OrdinalEncoder {
    fn column(&self, name: &str) -> Option<&EncodedColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Fitted categories for a column, in code order.
    pub fn categories(&self, column: &str) -> Option<&[String]> {
        self.column(column).map(|c| c.categories.as_slice())
    }

    /// Encode one value. Values outside the fitted vocabulary are an error,
    /// not a sentinel code.
    pub fn encode(&self, column: &str, value: &str) -> Result<f64, EncodeError> {
        let col = self
            .column(column)
            .ok_or_else(|| EncodeError::UnknownColumn(column.to_string()))?;
        col.codes
            .get(value)
            .map(|code| *code as f64)
            .ok_or_else(|| EncodeError::UnknownCategory {
                column: column.to_string(),
                value: value.to_string(),
            })
    }
}

// ═══════════════════════════════════════════════════════════
// Label decoder
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct LabelDecoderExport {
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "LabelDecoderExport")]
pub struct LabelDecoder {
    classes: Vec<String>,
}

impl TryFrom<LabelDecoderExport> for LabelDecoder {
    type Error = InvalidArtifact;

    fn try_from(export: LabelDecoderExport) -> Result<Self, Self::Error> {
        if export.classes.is_empty() {
            return Err(InvalidArtifact("label decoder has no classes".into()));
        }
        {
            let mut seen = HashSet::new();
            if let Some(dup) = export.classes.iter().find(|c| !seen.insert(c.as_str())) {
                return Err(InvalidArtifact(format!("label {dup:?} appears twice")));
            }
        }
        Ok(Self {
            classes: export.classes,
        })
    }
}

impl LabelDecoder {
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn decode(&self, class: usize) -> Result<&str, InferenceError> {
        self.classes
            .get(class)
            .map(String::as_str)
            .ok_or(InferenceError::UnknownClass(class))
    }
}
