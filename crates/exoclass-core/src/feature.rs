//! Feature records for transiting exoplanet candidates.
//!
//! A [`FeatureRecord`] holds the six physical measurements the classifier
//! consumes. Records are built from loosely-typed JSON maps and every
//! constraint is checked before a record exists, so downstream code never
//! sees an out-of-range value.
//!
//! # Field names
//!
//! Canonical names are snake_case (`orbital_period`, ...). The Kepler KOI
//! column names (`koi_period`, ...) are accepted as aliases. When both are
//! present, the canonical key wins.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// One of the six measurements describing a transit signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    OrbitalPeriod,
    TransitDuration,
    TransitDepth,
    ImpactParameter,
    StellarDensity,
    Inclination,
}

impl Feature {
    /// All features in canonical model order.
    pub const ALL: [Feature; 6] = [
        Feature::OrbitalPeriod,
        Feature::TransitDuration,
        Feature::TransitDepth,
        Feature::ImpactParameter,
        Feature::StellarDensity,
        Feature::Inclination,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::OrbitalPeriod => "orbital_period",
            Self::TransitDuration => "transit_duration",
            Self::TransitDepth => "transit_depth",
            Self::ImpactParameter => "impact_parameter",
            Self::StellarDensity => "stellar_density",
            Self::Inclination => "inclination",
        }
    }

    /// Kepler Objects of Interest column name for this feature.
    pub fn koi_alias(self) -> &'static str {
        match self {
            Self::OrbitalPeriod => "koi_period",
            Self::TransitDuration => "koi_duration",
            Self::TransitDepth => "koi_depth",
            Self::ImpactParameter => "koi_impact",
            Self::StellarDensity => "koi_srho",
            Self::Inclination => "koi_incl",
        }
    }

    /// Resolve a canonical name or KOI alias.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == name || f.koi_alias() == name)
    }

    pub fn is_required(self) -> bool {
        matches!(
            self,
            Self::OrbitalPeriod | Self::TransitDuration | Self::TransitDepth
        )
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::OrbitalPeriod => "days",
            Self::TransitDuration => "hours",
            Self::TransitDepth => "ppm",
            Self::ImpactParameter => "",
            Self::StellarDensity => "g/cm³",
            Self::Inclination => "degrees",
        }
    }

    /// Human-readable description, as served by `/model/info`.
    pub fn description(self) -> &'static str {
        match self {
            Self::OrbitalPeriod => "Orbital period in days",
            Self::TransitDuration => "Transit duration in hours",
            Self::TransitDepth => "Transit depth in parts per million",
            Self::ImpactParameter => "Impact parameter (0-1, optional)",
            Self::StellarDensity => "Stellar density in g/cm³ (optional)",
            Self::Inclination => "Orbital inclination in degrees (optional)",
        }
    }

    pub fn bounds(self) -> Bounds {
        match self {
            Self::OrbitalPeriod => Bounds::positive_up_to(10_000.0),
            Self::TransitDuration => Bounds::positive_up_to(24.0),
            Self::TransitDepth => Bounds::positive_up_to(100_000.0),
            Self::ImpactParameter => Bounds::closed(0.0, 1.0),
            Self::StellarDensity => Bounds {
                min: 0.0,
                min_inclusive: false,
                max: None,
            },
            Self::Inclination => Bounds::closed(0.0, 180.0),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Valid range for a feature. The upper bound is always inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub min_inclusive: bool,
    pub max: Option<f64>,
}

impl Bounds {
    fn positive_up_to(max: f64) -> Self {
        Self {
            min: 0.0,
            min_inclusive: false,
            max: Some(max),
        }
    }

    fn closed(min: f64, max: f64) -> Self {
        Self {
            min,
            min_inclusive: true,
            max: Some(max),
        }
    }

    pub fn contains(&self, v: f64) -> bool {
        let above_min = if self.min_inclusive {
            v >= self.min
        } else {
            v > self.min
        };
        above_min && self.max.is_none_or(|max| v <= max)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.min_inclusive { '[' } else { '(' };
        match self.max {
            Some(max) => write!(f, "{open}{}, {}]", self.min, max),
            None => write!(f, "{open}{}, ∞)", self.min),
        }
    }
}

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Field path, e.g. `orbital_period` or `candidates[2].orbital_period`.
    pub field: String,
    pub message: String,
}

/// Every constraint a submitted record violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid feature record: {}", summarize(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violations: vec![Violation {
                field: field.into(),
                message: message.into(),
            }],
        }
    }

    /// Prefix every field path, e.g. `candidates[3]`.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        for v in &mut self.violations {
            v.field = format!("{prefix}.{}", v.field);
        }
        self
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A validated candidate. Optional fields stay `None` when absent; they are
/// never defaulted to zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub orbital_period: f64,
    pub transit_duration: f64,
    pub transit_depth: f64,
    pub impact_parameter: Option<f64>,
    pub stellar_density: Option<f64>,
    pub inclination: Option<f64>,
}

impl FeatureRecord {
    /// Validate an arbitrary JSON value, which must be an object.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Err(ValidationError::single(
                "body",
                "expected a JSON object of feature values",
            )),
        }
    }

    /// Validate a field-name → value mapping, collecting every violation.
    ///
    /// Unknown keys are ignored.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut values = [None; 6];
        let mut violations = Vec::new();

        for (slot, feature) in values.iter_mut().zip(Feature::ALL) {
            let raw = map
                .get(feature.name())
                .or_else(|| map.get(feature.koi_alias()));

            match raw.map(parse_numeric).transpose() {
                Ok(parsed) => match parsed.flatten() {
                    Some(v) if !feature.bounds().contains(v) => violations.push(Violation {
                        field: feature.name().to_string(),
                        message: out_of_range(feature, v),
                    }),
                    Some(v) => *slot = Some(v),
                    None if feature.is_required() => violations.push(Violation {
                        field: feature.name().to_string(),
                        message: "field required".to_string(),
                    }),
                    None => {}
                },
                Err(message) => violations.push(Violation {
                    field: feature.name().to_string(),
                    message: message.to_string(),
                }),
            }
        }

        // A missing required slot always carries a violation.
        match values {
            [
                Some(orbital_period),
                Some(transit_duration),
                Some(transit_depth),
                impact_parameter,
                stellar_density,
                inclination,
            ] if violations.is_empty() => Ok(Self {
                orbital_period,
                transit_duration,
                transit_depth,
                impact_parameter,
                stellar_density,
                inclination,
            }),
            _ => Err(ValidationError { violations }),
        }
    }

    pub fn get(&self, feature: Feature) -> Option<f64> {
        match feature {
            Feature::OrbitalPeriod => Some(self.orbital_period),
            Feature::TransitDuration => Some(self.transit_duration),
            Feature::TransitDepth => Some(self.transit_depth),
            Feature::ImpactParameter => self.impact_parameter,
            Feature::StellarDensity => self.stellar_density,
            Feature::Inclination => self.inclination,
        }
    }

    /// Look up a value by canonical name or KOI alias. Unknown names are absent.
    pub fn value_of(&self, name: &str) -> Option<f64> {
        Feature::from_name(name).and_then(|f| self.get(f))
    }
}

/// Interpret a JSON value as a number.
///
/// `null` is absent. Numbers and numeric strings are accepted; anything
/// else is an error message.
fn parse_numeric(value: &Value) -> Result<Option<f64>, &'static str> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_f64().map(Some).ok_or("must be a number"),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            Ok(_) => Err("must be a finite number"),
            Err(_) => Err("must be a number"),
        },
        _ => Err("must be a number"),
    }
}

fn out_of_range(feature: Feature, v: f64) -> String {
    let unit = feature.unit();
    if unit.is_empty() {
        format!("{v} is outside the valid range {}", feature.bounds())
    } else {
        format!("{v} is outside the valid range {} {unit}", feature.bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            other => panic!("expected object, got {other}"),
        }
    }

    fn fields(err: &ValidationError) -> Vec<&str> {
        err.violations.iter().map(|v| v.field.as_str()).collect()
    }

    #[test]
    fn accepts_full_record() {
        let rec = FeatureRecord::from_map(&map(json!({
            "orbital_period": 365.25,
            "transit_duration": 2.5,
            "transit_depth": 1000,
            "impact_parameter": 0.3,
            "stellar_density": 1.4,
            "inclination": 89.5
        })))
        .unwrap();

        assert_eq!(rec.orbital_period, 365.25);
        assert_eq!(rec.transit_depth, 1000.0);
        assert_eq!(rec.inclination, Some(89.5));
    }

    #[test]
    fn missing_optionals_stay_absent() {
        let rec = FeatureRecord::from_map(&map(json!({
            "orbital_period": 50.0,
            "transit_duration": 2.0,
            "transit_depth": 1500
        })))
        .unwrap();

        assert_eq!(rec.impact_parameter, None);
        assert_eq!(rec.stellar_density, None);
        assert_eq!(rec.inclination, None);
    }

    #[test]
    fn null_optional_is_absent() {
        let rec = FeatureRecord::from_map(&map(json!({
            "orbital_period": 50.0,
            "transit_duration": 2.0,
            "transit_depth": 1500,
            "impact_parameter": null
        })))
        .unwrap();
        assert_eq!(rec.impact_parameter, None);
    }

    #[test]
    fn negative_period_rejected() {
        let err = FeatureRecord::from_map(&map(json!({
            "orbital_period": -10,
            "transit_duration": 2.0,
            "transit_depth": 1500
        })))
        .unwrap_err();

        assert_eq!(fields(&err), vec!["orbital_period"]);
        assert!(err.violations[0].message.contains("(0, 10000]"));
    }

    #[test]
    fn zero_is_not_positive() {
        let err = FeatureRecord::from_map(&map(json!({
            "orbital_period": 0,
            "transit_duration": 2.0,
            "transit_depth": 1500
        })))
        .unwrap_err();
        assert_eq!(fields(&err), vec!["orbital_period"]);
    }

    #[test]
    fn upper_bounds_inclusive() {
        let rec = FeatureRecord::from_map(&map(json!({
            "orbital_period": 10000,
            "transit_duration": 24,
            "transit_depth": 100000,
            "impact_parameter": 1.0,
            "inclination": 180
        })))
        .unwrap();
        assert_eq!(rec.transit_duration, 24.0);

        let err = FeatureRecord::from_map(&map(json!({
            "orbital_period": 10000.5,
            "transit_duration": 24.1,
            "transit_depth": 100001
        })))
        .unwrap_err();
        assert_eq!(
            fields(&err),
            vec!["orbital_period", "transit_duration", "transit_depth"]
        );
    }

    #[test]
    fn reports_every_violation() {
        let err = FeatureRecord::from_map(&map(json!({
            "transit_duration": "long",
            "transit_depth": -5,
            "impact_parameter": 1.5,
            "stellar_density": 0,
            "inclination": 181
        })))
        .unwrap_err();

        assert_eq!(
            fields(&err),
            vec![
                "orbital_period",
                "transit_duration",
                "transit_depth",
                "impact_parameter",
                "stellar_density",
                "inclination",
            ]
        );
        assert_eq!(err.violations[0].message, "field required");
        assert_eq!(err.violations[1].message, "must be a number");
    }

    #[test]
    fn impact_parameter_closed_range() {
        for ok in [0.0, 1.0] {
            let rec = FeatureRecord::from_map(&map(json!({
                "orbital_period": 5,
                "transit_duration": 1,
                "transit_depth": 10,
                "impact_parameter": ok
            })))
            .unwrap();
            assert_eq!(rec.impact_parameter, Some(ok));
        }
    }

    #[test]
    fn booleans_and_arrays_are_not_numbers() {
        let err = FeatureRecord::from_map(&map(json!({
            "orbital_period": true,
            "transit_duration": [1.0],
            "transit_depth": {"v": 1}
        })))
        .unwrap_err();
        assert_eq!(err.violations.len(), 3);
        for v in &err.violations {
            assert_eq!(v.message, "must be a number");
        }
    }

    #[test]
    fn numeric_strings_coerced() {
        let rec = FeatureRecord::from_map(&map(json!({
            "orbital_period": "12.5",
            "transit_duration": " 3 ",
            "transit_depth": 900
        })))
        .unwrap();
        assert_eq!(rec.orbital_period, 12.5);
        assert_eq!(rec.transit_duration, 3.0);
    }

    #[test]
    fn non_finite_string_rejected() {
        let err = FeatureRecord::from_map(&map(json!({
            "orbital_period": 12.5,
            "transit_duration": 3,
            "transit_depth": 900,
            "stellar_density": "inf"
        })))
        .unwrap_err();
        assert_eq!(err.violations[0].message, "must be a finite number");
    }

    #[test]
    fn koi_aliases_accepted() {
        let rec = FeatureRecord::from_map(&map(json!({
            "koi_period": 10.5,
            "koi_duration": 1.2,
            "koi_depth": 500,
            "koi_impact": 0.1,
            "koi_srho": 2.0,
            "koi_incl": 88.0
        })))
        .unwrap();
        assert_eq!(rec.orbital_period, 10.5);
        assert_eq!(rec.stellar_density, Some(2.0));
    }

    #[test]
    fn canonical_key_wins_over_alias() {
        let rec = FeatureRecord::from_map(&map(json!({
            "orbital_period": 10.5,
            "koi_period": 99.0,
            "transit_duration": 1.2,
            "transit_depth": 500
        })))
        .unwrap();
        assert_eq!(rec.orbital_period, 10.5);
    }

    #[test]
    fn unknown_keys_ignored() {
        let rec = FeatureRecord::from_map(&map(json!({
            "orbital_period": 10.5,
            "transit_duration": 1.2,
            "transit_depth": 500,
            "kepler_name": "Kepler-22 b"
        })));
        assert!(rec.is_ok());
    }

    #[test]
    fn non_object_rejected() {
        let err = FeatureRecord::from_value(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(fields(&err), vec!["body"]);
    }

    #[test]
    fn prefix_applies_to_all_fields() {
        let err = FeatureRecord::from_map(&map(json!({}))).unwrap_err();
        let err = err.with_prefix("candidates[2]");
        assert_eq!(
            fields(&err),
            vec![
                "candidates[2].orbital_period",
                "candidates[2].transit_duration",
                "candidates[2].transit_depth",
            ]
        );
    }

    #[test]
    fn value_of_resolves_aliases() {
        let rec = FeatureRecord {
            orbital_period: 1.0,
            transit_duration: 2.0,
            transit_depth: 3.0,
            impact_parameter: None,
            stellar_density: Some(1.4),
            inclination: None,
        };
        assert_eq!(rec.value_of("koi_srho"), Some(1.4));
        assert_eq!(rec.value_of("transit_duration"), Some(2.0));
        assert_eq!(rec.value_of("koi_impact"), None);
        assert_eq!(rec.value_of("teff"), None);
    }

    #[test]
    fn bounds_display() {
        assert_eq!(Feature::OrbitalPeriod.bounds().to_string(), "(0, 10000]");
        assert_eq!(Feature::Inclination.bounds().to_string(), "[0, 180]");
        assert_eq!(Feature::StellarDensity.bounds().to_string(), "(0, ∞)");
    }
}
