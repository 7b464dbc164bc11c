//! Feature alignment: reorder record fields by name into the column order
//! a predictor expects.
//!
//! Alignment is by name, never by position. Fields the bundle does not list
//! are dropped; listed fields a record lacks become nulls. Values that do
//! not coerce to a finite number are also null rather than an error.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use exoclass_core::{Feature, FeatureRecord, feature_schema};
use serde_json::{Map, Value};

/// Anything that can supply a feature value by name.
pub trait FeatureSource {
    /// Value for `name`, or `None` when absent or not numeric.
    fn feature(&self, name: &str) -> Option<f64>;
}

impl FeatureSource for FeatureRecord {
    fn feature(&self, name: &str) -> Option<f64> {
        self.value_of(name)
    }
}

/// Raw JSON objects are coerced leniently: numbers and numeric strings pass,
/// anything else is absent.
impl FeatureSource for Map<String, Value> {
    fn feature(&self, name: &str) -> Option<f64> {
        let value = self.get(name).or_else(|| {
            let feature = Feature::from_name(name)?;
            self.get(feature.name())
                .or_else(|| self.get(feature.koi_alias()))
        })?;
        coerce(value)
    }
}

fn coerce(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Build a columnar feature matrix: one nullable `Float64` column per name
/// in `features`, one row per record, in input order.
pub fn feature_matrix<S: FeatureSource>(
    records: &[S],
    features: &[String],
) -> Result<RecordBatch, ArrowError> {
    let schema = feature_schema(features);
    let columns: Vec<ArrayRef> = features
        .iter()
        .map(|name| {
            let values: Vec<Option<f64>> = records
                .iter()
                .map(|r| r.feature(name).filter(|v| v.is_finite()))
                .collect();
            Arc::new(Float64Array::from(values)) as ArrayRef
        })
        .collect();

    RecordBatch::try_new(Arc::new(schema), columns)
}
