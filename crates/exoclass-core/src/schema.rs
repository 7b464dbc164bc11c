use arrow::datatypes::{DataType, Field, Schema};

use crate::feature::Feature;

/// Schema for an aligned feature matrix: one nullable `Float64` column per
/// expected feature, in the order the predictor was trained on.
pub fn feature_schema<S: AsRef<str>>(features: &[S]) -> Schema {
    Schema::new(
        features
            .iter()
            .map(|name| Field::new(name.as_ref(), DataType::Float64, true))
            .collect::<Vec<_>>(),
    )
}

/// Canonical feature order used when a bundle does not name its features.
pub fn canonical_features() -> Vec<String> {
    Feature::ALL.iter().map(|f| f.name().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_schema_has_six_nullable_columns() {
        let schema = feature_schema(&canonical_features());
        assert_eq!(schema.fields().len(), 6);
        assert_eq!(schema.field(0).name(), "orbital_period");
        assert_eq!(schema.field(5).name(), "inclination");
        assert!(schema.fields().iter().all(|f| f.is_nullable()));
        assert!(
            schema
                .fields()
                .iter()
                .all(|f| f.data_type() == &DataType::Float64)
        );
    }

    #[test]
    fn preserves_given_order() {
        let schema = feature_schema(&["koi_depth", "koi_period"]);
        assert_eq!(schema.field(0).name(), "koi_depth");
        assert_eq!(schema.field(1).name(), "koi_period");
    }
}
