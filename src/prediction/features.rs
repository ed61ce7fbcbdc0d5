//! Name-keyed feature row.
//!
//! Values are bound by field name and only turned into a positional
//! vector at the end, following the column order the artifacts declare.

use std::collections::BTreeMap;

use ndarray::Array1;

use crate::artifacts::InferenceError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRow {
    values: BTreeMap<&'static str, f64>,
}

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind (or rebind) a value to a column name.
    pub fn bind(&mut self, name: &'static str, value: f64) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Materialize the row in `order`. Unused bindings are dropped;
    /// a name in `order` with no binding is an error.
    pub fn to_ordered(&self, order: &[String]) -> Result<Array1<f64>, InferenceError> {
        order
            .iter()
            .map(|name| {
                self.get(name)
                    .ok_or_else(|| InferenceError::MissingFeature(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Array1::from)
    }
}
