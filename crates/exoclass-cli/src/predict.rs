//! Offline classification of a JSON input file.
//!
//! Output matches what `/predict` or `/predict/batch` would return.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use exoclass_ai::ModelBundle;
use exoclass_core::FeatureRecord;
use exoclass_server::api::{BatchPredictionResponse, PredictionResponse, parse_batch};
use serde_json::Value;

pub fn run(input: &Path, paths: &[PathBuf]) -> anyhow::Result<Value> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let body: Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing {} as JSON", input.display()))?;

    let bundle = exoclass_ai::load_first(paths)
        .context("loading model bundle")?;
    render(&body, &bundle)
}

/// Validate and classify a single candidate or a `{"candidates": [...]}` batch.
pub fn render(body: &Value, bundle: &ModelBundle) -> anyhow::Result<Value> {
    if body.get("candidates").is_some() {
        let records = parse_batch(body)?;
        eprintln!("  Classifying {} candidates", records.len());
        let batch = exoclass_ai::classify_batch(&records, bundle)?;
        Ok(serde_json::to_value(BatchPredictionResponse::new(&batch))?)
    } else {
        let record = FeatureRecord::from_value(body)?;
        let result = exoclass_ai::classify(&record, bundle)?;
        let response = PredictionResponse::new(&result, bundle.info());
        Ok(serde_json::to_value(response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn bundle() -> ModelBundle {
        exoclass_ai::bundle::from_value(
            json!({
                "model": {
                    "type": "random_forest",
                    "trees": [{"nodes": [
                        {"feature": 0, "threshold": 100.0, "left": 1, "right": 2},
                        {"value": 0.875},
                        {"value": 0.125}
                    ]}]
                },
                "threshold": 0.5,
                "features": ["orbital_period"]
            }),
            None,
        )
        .unwrap()
    }

    #[test]
    fn single_candidate_matches_http_shape() {
        let out = render(
            &json!({"orbital_period": 50.0, "transit_duration": 2.0, "transit_depth": 1500}),
            &bundle(),
        )
        .unwrap();
        assert_eq!(out["prediction"], 1);
        assert_eq!(out["probability"], 0.875);
        assert_eq!(out["confidence"], "HIGH");
        assert_eq!(out["model_info"]["features"], json!(["orbital_period"]));
    }

    #[test]
    fn batch_input() {
        let out = render(
            &json!({"candidates": [
                {"orbital_period": 50.0, "transit_duration": 2.0, "transit_depth": 1500},
                {"orbital_period": 500.0, "transit_duration": 2.0, "transit_depth": 1500}
            ]}),
            &bundle(),
        )
        .unwrap();
        assert_eq!(out["predictions"][1]["prediction"], 0);
        assert_eq!(out["summary"]["predicted_planets"], 1);
        assert_eq!(out["summary"]["mean_probability"], 0.5);
    }

    #[test]
    fn invalid_input_is_an_error() {
        let body = json!({"orbital_period": -10.0});
        let err = render(&body, &bundle()).unwrap_err();
        assert!(err.to_string().contains("orbital_period"));
    }

    #[test]
    fn run_reads_input_file() {
        let dir = TempDir::new().unwrap();
        let model = dir.path().join("model.json");
        let forest = json!({"type": "random_forest", "trees": [{"nodes": [{"value": 0.25}]}]});
        std::fs::write(&model, forest.to_string()).unwrap();
        let input = dir.path().join("candidate.json");
        std::fs::write(
            &input,
            r#"{"koi_period": 10, "koi_duration": 3, "koi_depth": 800}"#,
        )
        .unwrap();

        let out = run(&input, &[model]).unwrap();
        assert_eq!(out["probability"], 0.25);
        assert_eq!(out["prediction"], 0);
    }
}
