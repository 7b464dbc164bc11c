//! Classification results and batch summaries.
//!
//! Results are derived per request from a probability and the bundle's
//! threshold. A batch summary is a pure aggregation over per-record results.

use serde::{Serialize, Serializer};

use crate::confidence::{self, Confidence};

/// Predicted class. Serialized as `0` (false positive) or `1` (planet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    FalsePositive,
    Planet,
}

impl Label {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::FalsePositive => 0,
            Self::Planet => 1,
        }
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// Outcome of classifying one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub prediction: Label,
    /// Positive-class probability, unrounded.
    pub probability: f64,
    pub confidence: Confidence,
    pub threshold: f64,
}

impl Classification {
    /// Apply the decision threshold and confidence banding to a probability.
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        let prediction = if probability >= threshold {
            Label::Planet
        } else {
            Label::FalsePositive
        };
        Self {
            prediction,
            probability,
            confidence: Confidence::from_probability(probability),
            threshold,
        }
    }
}

/// Aggregate statistics for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total_candidates: usize,
    pub predicted_planets: usize,
    pub predicted_false_positives: usize,
    /// Mean probability; `0.0` for an empty batch.
    pub mean_probability: f64,
    pub high_confidence: usize,
    pub threshold_used: f64,
}

impl BatchSummary {
    pub fn from_results(results: &[Classification], threshold: f64) -> Self {
        let total = results.len();
        let planets = results
            .iter()
            .filter(|r| r.prediction == Label::Planet)
            .count();
        let high = results
            .iter()
            .filter(|r| confidence::is_high_confidence(r.probability))
            .count();
        let mean = if total == 0 {
            0.0
        } else {
            results.iter().map(|r| r.probability).sum::<f64>() / total as f64
        };

        Self {
            total_candidates: total,
            predicted_planets: planets,
            predicted_false_positives: total - planets,
            mean_probability: mean,
            high_confidence: high,
            threshold_used: threshold,
        }
    }
}

/// Per-record results in input order, plus their summary.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchClassification {
    pub results: Vec<Classification>,
    pub summary: BatchSummary,
}

impl BatchClassification {
    pub fn from_probabilities(probabilities: &[f64], threshold: f64) -> Self {
        let results: Vec<Classification> = probabilities
            .iter()
            .map(|&p| Classification::from_probability(p, threshold))
            .collect();
        let summary = BatchSummary::from_results(&results, threshold);
        Self { results, summary }
    }
}
