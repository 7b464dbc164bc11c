//! Pre-flight check: find the model, load it, and classify a known candidate.

use std::path::PathBuf;

use anyhow::Context;
use exoclass_core::{FeatureRecord, Label};

/// Reference candidate with an Earth-like orbit.
pub fn sample_candidate() -> FeatureRecord {
    FeatureRecord {
        orbital_period: 365.25,
        transit_duration: 2.5,
        transit_depth: 1000.0,
        impact_parameter: Some(0.3),
        stellar_density: Some(1.4),
        inclination: Some(89.5),
    }
}

fn label_name(label: Label) -> &'static str {
    match label {
        Label::Planet => "CONFIRMED PLANET",
        Label::FalsePositive => "FALSE POSITIVE",
    }
}

pub fn run(paths: &[PathBuf]) -> anyhow::Result<()> {
    eprintln!("Model search paths:");
    for path in paths {
        let status = if path.is_file() { "found  " } else { "missing" };
        eprintln!("  [{status}] {}", path.display());
    }

    let bundle = exoclass_ai::load_first(paths)
        .context("loading model bundle")?;
    let info = bundle.info();

    println!("Model type:  {}", info.model_type);
    println!("Version:     {}", info.version);
    if let Some(source) = &info.source {
        println!("Source:      {source}");
    }
    if let Some(n) = info.n_estimators {
        println!("Estimators:  {n}");
    }
    println!("Threshold:   {:.4}", info.threshold);
    println!("Features:    {}", info.features.join(", "));

    let result = exoclass_ai::classify(&sample_candidate(), &bundle)
        .context("running sample prediction")?;
    println!(
        "Sample:      {} (probability {:.4}, confidence {})",
        label_name(result.prediction),
        result.probability,
        result.confidence
    );
    Ok(())
}
