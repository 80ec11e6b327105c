//! Linear Scoring Model

use feature_normalizer::FeatureRecord;
use serde::{Deserialize, Serialize};

/// A linear model over named features.
///
/// Deterministic stand-in with the same input/output contract as the trained
/// artifacts: a feature row in, a grade on the 0-20 scale out. Model files
/// are JSON of this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    /// (feature name, weight) pairs; features missing from the row count as 0
    pub weights: Vec<(String, f64)>,
}

impl LinearModel {
    /// Score a feature row: intercept plus the weighted named features.
    pub fn score(&self, row: &FeatureRecord) -> f64 {
        self.weights.iter().fold(self.intercept, |acc, (name, w)| {
            acc + w * row.number(name).unwrap_or(0.0)
        })
    }
}
