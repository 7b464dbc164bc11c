pub mod classification;
pub mod confidence;
pub mod feature;
pub mod schema;

pub use classification::{BatchClassification, BatchSummary, Classification, Label};
pub use confidence::Confidence;
pub use feature::{Feature, FeatureRecord, ValidationError, Violation};
pub use schema::{canonical_features, feature_schema};
