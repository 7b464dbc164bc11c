//! Random forest of binary decision trees.
//!
//! Each tree is a flat node array rooted at index 0. A split sends a row
//! left when `x <= threshold`; absent values follow `missing_left`. Leaves
//! carry the positive-class fraction, and the forest probability is the
//! mean over trees.

use arrow::record_batch::RecordBatch;
use serde::Deserialize;

use super::Predictor;
use crate::error::{ModelLoadError, PredictionError};

#[derive(Debug, Deserialize)]
pub(crate) struct ForestSpec {
    trees: Vec<TreeSpec>,
}

#[derive(Debug, Deserialize)]
struct TreeSpec {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default = "default_missing_left")]
        missing_left: bool,
    },
    Leaf {
        value: f64,
    },
}

fn default_missing_left() -> bool {
    true
}

#[derive(Debug)]
pub struct RandomForest {
    trees: Vec<Vec<Node>>,
    n_features: usize,
}

impl RandomForest {
    /// Validate a deserialized forest against the bundle's feature count.
    ///
    /// Children must point strictly forward so every traversal terminates.
    pub(crate) fn build(spec: ForestSpec, n_features: usize) -> Result<Self, ModelLoadError> {
        if spec.trees.is_empty() {
            return Err(ModelLoadError::InvalidModel("forest has no trees".into()));
        }

        for (t, tree) in spec.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelLoadError::InvalidModel(format!("tree {t} is empty")));
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                match *node {
                    Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                        ..
                    } => {
                        if feature >= n_features {
                            return Err(ModelLoadError::InvalidModel(format!(
                                "tree {t} node {i}: feature {feature} exceeds {n_features} inputs"
                            )));
                        }
                        if !threshold.is_finite() {
                            return Err(ModelLoadError::InvalidModel(format!(
                                "tree {t} node {i}: non-finite split threshold"
                            )));
                        }
                        for child in [left, right] {
                            if child <= i || child >= tree.nodes.len() {
                                return Err(ModelLoadError::InvalidModel(format!(
                                    "tree {t} node {i}: child index {child} is invalid"
                                )));
                            }
                        }
                    }
                    Node::Leaf { value } => {
                        if !(0.0..=1.0).contains(&value) {
                            return Err(ModelLoadError::InvalidModel(format!(
                                "tree {t} node {i}: leaf value {value} outside [0, 1]"
                            )));
                        }
                    }
                }
            }
        }

        Ok(Self {
            trees: spec.trees.into_iter().map(|t| t.nodes).collect(),
            n_features,
        })
    }

    fn predict_row(&self, row: &[Option<f64>]) -> f64 {
        let total: f64 = self.trees.iter().map(|nodes| leaf_value(nodes, row)).sum();
        total / self.trees.len() as f64
    }
}

fn leaf_value(nodes: &[Node], row: &[Option<f64>]) -> f64 {
    let mut idx = 0;
    loop {
        match nodes[idx] {
            Node::Leaf { value } => return value,
            Node::Split {
                feature,
                threshold,
                left,
                right,
                missing_left,
            } => {
                let go_left = match row[feature] {
                    Some(x) => x <= threshold,
                    None => missing_left,
                };
                idx = if go_left { left } else { right };
            }
        }
    }
}

impl Predictor for RandomForest {
    fn predict_proba(&self, batch: &RecordBatch) -> Result<Vec<f64>, PredictionError> {
        let rows = super::rows(batch, self.n_features)?;
        Ok(rows.iter().map(|row| self.predict_row(row)).collect())
    }

    fn model_type(&self) -> &'static str {
        "Random Forest"
    }

    fn n_estimators(&self) -> Option<usize> {
        Some(self.trees.len())
    }
}
