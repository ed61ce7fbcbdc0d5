//! Random forest classifier.
//!
//! Each tree is kept as flat per-node arrays (structure of arrays) and
//! walked from the root for a single row. Leaf class weights are
//! normalized at load time so prediction is a plain average of per-tree
//! distributions followed by an argmax.

use ndarray::{Array1, ArrayView1};
use serde::Deserialize;

use super::{InferenceError, InvalidArtifact};

/// Child index marking a leaf in the exported node arrays.
const TREE_LEAF: i64 = -1;

// ═══════════════════════════════════════════════════════════
// Export format
// ═══════════════════════════════════════════════════════════

/// One tree as exported by the training pipeline: parallel node arrays.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeExport {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights (counts or fractions), `classes.len()` wide.
    pub value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForestExport {
    pub n_features: usize,
    /// Class indices in fitted order; each addresses a label in the label decoder.
    pub classes: Vec<usize>,
    pub trees: Vec<TreeExport>,
}

// ═══════════════════════════════════════════════════════════
// Decision tree
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct DecisionTree {
    /// Split feature index per node (unused for leaves)
    split_features: Box<[u32]>,
    /// Split threshold per node (unused for leaves)
    thresholds: Box<[f64]>,
    left_children: Box<[u32]>,
    right_children: Box<[u32]>,
    is_leaf: Box<[bool]>,
    /// Normalized class distribution, `n_classes` values per node (zeros for splits)
    distributions: Box<[f64]>,
    n_classes: usize,
}

impl DecisionTree {
    /// Validate an exported tree and convert it to flat storage.
    ///
    /// Children must point strictly forward (nodes are exported in
    /// depth-first pre-order), which also rules out cycles.
    fn from_export(
        tree_idx: usize,
        export: TreeExport,
        n_features: usize,
        n_classes: usize,
    ) -> Result<Self, InvalidArtifact> {
        let invalid = |reason: String| InvalidArtifact(format!("tree {tree_idx}: {reason}"));

        let n_nodes = export.children_left.len();
        if n_nodes == 0 {
            return Err(invalid("has no nodes".into()));
        }
        if export.children_right.len() != n_nodes
            || export.feature.len() != n_nodes
            || export.threshold.len() != n_nodes
            || export.value.len() != n_nodes
        {
            return Err(invalid(format!(
                "node arrays differ in length (children_left={}, children_right={}, feature={}, threshold={}, value={})",
                n_nodes,
                export.children_right.len(),
                export.feature.len(),
                export.threshold.len(),
                export.value.len()
            )));
        }

        let mut split_features = Vec::with_capacity(n_nodes);
        let mut thresholds = Vec::with_capacity(n_nodes);
        let mut left_children = Vec::with_capacity(n_nodes);
        let mut right_children = Vec::with_capacity(n_nodes);
        let mut is_leaf = Vec::with_capacity(n_nodes);
        let mut distributions = Vec::with_capacity(n_nodes * n_classes);

        for node in 0..n_nodes {
            let left = export.children_left[node];
            let right = export.children_right[node];

            if left == TREE_LEAF || right == TREE_LEAF {
                if left != right {
                    return Err(invalid(format!("node {node} has only one child")));
                }
                let weights = &export.value[node];
                if weights.len() != n_classes {
                    return Err(invalid(format!(
                        "leaf {node} has {} class weights, expected {n_classes}",
                        weights.len()
                    )));
                }
                let total: f64 = weights.iter().sum();
                if !total.is_finite() || total <= 0.0 || weights.iter().any(|w| *w < 0.0) {
                    return Err(invalid(format!("leaf {node} has invalid class weights")));
                }
                distributions.extend(weights.iter().map(|w| w / total));
                split_features.push(0);
                thresholds.push(0.0);
                left_children.push(0);
                right_children.push(0);
                is_leaf.push(true);
                continue;
            }

            let child = |c: i64| -> Result<u32, InvalidArtifact> {
                if c <= node as i64 || c >= n_nodes as i64 {
                    return Err(invalid(format!("node {node} has out-of-range child {c}")));
                }
                Ok(c as u32)
            };
            let feature = export.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(invalid(format!(
                    "node {node} splits on feature {feature}, forest has {n_features}"
                )));
            }
            let threshold = export.threshold[node];
            if !threshold.is_finite() {
                return Err(invalid(format!("node {node} has a non-finite threshold")));
            }

            split_features.push(feature as u32);
            thresholds.push(threshold);
            left_children.push(child(left)?);
            right_children.push(child(right)?);
            is_leaf.push(false);
            distributions.extend(std::iter::repeat(0.0).take(n_classes));
        }

        Ok(Self {
            split_features: split_features.into_boxed_slice(),
            thresholds: thresholds.into_boxed_slice(),
            left_children: left_children.into_boxed_slice(),
            right_children: right_children.into_boxed_slice(),
            is_leaf: is_leaf.into_boxed_slice(),
            distributions: distributions.into_boxed_slice(),
            n_classes,
        })
    }

    /// Number of nodes in this tree.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    /// Walk to the leaf for `row` and return its class distribution.
    ///
    /// Feature values are compared in single precision, the precision
    /// the trees were grown on. `row` must be at least `n_features` long.
    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> ArrayView1<'_, f64> {
        let mut idx = 0usize;

        while !self.is_leaf[idx] {
            let value = row[self.split_features[idx] as usize] as f32 as f64;
            idx = if value <= self.thresholds[idx] {
                self.left_children[idx] as usize
            } else {
                self.right_children[idx] as usize
            };
        }

        let start = idx * self.n_classes;
        ArrayView1::from(&self.distributions[start..start + self.n_classes])
    }
}

// ═══════════════════════════════════════════════════════════
// Forest
// ═══════════════════════════════════════════════════════════

/// Forest output for one row.
#[derive(Debug, Clone, PartialEq)]
pub struct ForestPrediction {
    /// Class index (into the label decoder) with the highest mean probability.
    pub class: usize,
    /// Mean probability per fitted class, in `classes()` order.
    pub probabilities: Array1<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "ForestExport")]
pub struct RandomForest {
    n_features: usize,
    classes: Vec<usize>,
    trees: Vec<DecisionTree>,
}

impl TryFrom<ForestExport> for RandomForest {
    type Error = InvalidArtifact;

    fn try_from(export: ForestExport) -> Result<Self, Self::Error> {
        if export.n_features == 0 {
            return Err(InvalidArtifact("forest declares zero features".into()));
        }
        if export.classes.is_empty() {
            return Err(InvalidArtifact("forest declares no classes".into()));
        }
        if export.trees.is_empty() {
            return Err(InvalidArtifact("forest has no trees".into()));
        }

        let n_classes = export.classes.len();
        let trees = export
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, tree)| DecisionTree::from_export(i, tree, export.n_features, n_classes))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            n_features: export.n_features,
            classes: export.classes,
            trees,
        })
    }
}

impl RandomForest {
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Total node count over all trees.
    pub fn num_nodes(&self) -> usize {
        self.trees.iter().map(DecisionTree::num_nodes).sum()
    }

    /// Mean class distribution over all trees.
    ///
    /// Rows with a value that overflows single precision are rejected.
    pub fn predict_proba(&self, row: ArrayView1<'_, f64>) -> Result<Array1<f64>, InferenceError> {
        if row.len() != self.n_features {
            return Err(InferenceError::FeatureCount {
                stage: "classifier",
                expected: self.n_features,
                actual: row.len(),
            });
        }
        if let Some(col) = row.iter().position(|x| !(*x as f32).is_finite()) {
            return Err(InferenceError::NonFiniteInput(col));
        }

        let mut sum = Array1::<f64>::zeros(self.classes.len());
        for tree in &self.trees {
            sum += &tree.predict_row(row);
        }
        sum /= self.trees.len() as f64;
        Ok(sum)
    }

    /// Predict the class for one row. Ties go to the earliest class.
    pub fn predict(&self, row: ArrayView1<'_, f64>) -> Result<ForestPrediction, InferenceError> {
        let probabilities = self.predict_proba(row)?;

        let mut best = 0usize;
        for (i, p) in probabilities.iter().enumerate() {
            if *p > probabilities[best] {
                best = i;
            }
        }

        Ok(ForestPrediction {
            class: self.classes[best],
            probabilities,
        })
    }
}
