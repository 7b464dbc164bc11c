//! Classification service: probability → threshold → confidence band.
//!
//! Pure functions of `(records, bundle)`. Single and batch classification
//! share one code path, so a batch result always equals what independent
//! per-record calls would produce.

use exoclass_core::{BatchClassification, Classification, FeatureRecord};
use tracing::debug;

use crate::align::{self, FeatureSource};
use crate::bundle::ModelBundle;
use crate::error::PredictionError;

/// Raw positive-class probabilities, one per record, in input order.
pub fn predict<S: FeatureSource>(
    records: &[S],
    bundle: &ModelBundle,
) -> Result<Vec<f64>, PredictionError> {
    let batch = align::feature_matrix(records, bundle.features())?;
    let probabilities = bundle.predictor().predict_proba(&batch)?;

    if probabilities.len() != records.len() {
        return Err(PredictionError::RowCount {
            expected: records.len(),
            actual: probabilities.len(),
        });
    }
    if let Some((row, &value)) = probabilities
        .iter()
        .enumerate()
        .find(|(_, p)| !(0.0..=1.0).contains(*p))
    {
        return Err(PredictionError::InvalidProbability { row, value });
    }

    Ok(probabilities)
}

pub fn classify(
    record: &FeatureRecord,
    bundle: &ModelBundle,
) -> Result<Classification, PredictionError> {
    let probability = predict(std::slice::from_ref(record), bundle)?
        .first()
        .copied()
        .ok_or(PredictionError::RowCount {
            expected: 1,
            actual: 0,
        })?;

    let result = Classification::from_probability(probability, bundle.threshold());
    debug!(
        probability,
        prediction = result.prediction.as_u8(),
        confidence = %result.confidence,
        "classified candidate"
    );
    Ok(result)
}

pub fn classify_batch(
    records: &[FeatureRecord],
    bundle: &ModelBundle,
) -> Result<BatchClassification, PredictionError> {
    let probabilities = predict(records, bundle)?;
    let batch = BatchClassification::from_probabilities(&probabilities, bundle.threshold());
    debug!(
        total = batch.summary.total_candidates,
        planets = batch.summary.predicted_planets,
        "classified batch"
    );
    Ok(batch)
}
