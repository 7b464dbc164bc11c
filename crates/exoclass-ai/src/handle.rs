//! Process-wide model state.
//!
//! The loaded bundle lives behind one `Arc` that is swapped wholesale on
//! reload. Readers clone the `Arc` and work on an immutable snapshot, so a
//! request observes either the old or the new bundle, never a mix of one's
//! predictor with the other's threshold or feature order.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use exoclass_core::{BatchClassification, Classification, FeatureRecord};
use tracing::{info, warn};

use crate::bundle::{self, ModelBundle, ModelInfo};
use crate::classifier;
use crate::error::{ClassifyError, ModelLoadError};

#[derive(Clone, Default)]
pub struct ModelHandle {
    inner: Arc<RwLock<Option<Arc<ModelBundle>>>>,
}

impl ModelHandle {
    /// An unloaded handle.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bundle(bundle: ModelBundle) -> Self {
        let handle = Self::new();
        handle.replace(bundle);
        handle
    }

    /// Snapshot of the current bundle, if any.
    pub fn current(&self) -> Option<Arc<ModelBundle>> {
        // The slot only ever holds a complete bundle, so a poisoned lock
        // still guards consistent data.
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.current().is_some()
    }

    pub fn info(&self) -> Option<ModelInfo> {
        self.current().map(|b| b.info().clone())
    }

    /// Publish a new bundle, returning the one it replaced.
    pub fn replace(&self, bundle: ModelBundle) -> Option<Arc<ModelBundle>> {
        let next = Arc::new(bundle);
        let mut slot = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        slot.replace(next)
    }

    /// Load from the first existing candidate and publish it.
    ///
    /// On failure the current state is left untouched: a healthy bundle
    /// stays loaded, an unloaded handle stays unloaded.
    pub fn load_from(&self, candidates: &[PathBuf]) -> Result<ModelInfo, ModelLoadError> {
        match bundle::load_first(candidates) {
            Ok(bundle) => {
                let info = bundle.info().clone();
                let previous = self.replace(bundle);
                info!(
                    model_type = %info.model_type,
                    threshold = info.threshold,
                    replaced = previous.is_some(),
                    "model published"
                );
                Ok(info)
            }
            Err(e) => {
                warn!(error = %e, kept_previous = self.is_loaded(), "model load failed");
                Err(e)
            }
        }
    }

    fn require(&self) -> Result<Arc<ModelBundle>, ClassifyError> {
        self.current().ok_or(ClassifyError::ModelUnavailable)
    }

    /// Classify one record against the current bundle.
    ///
    /// Returns the snapshot that produced the result so callers can report
    /// its metadata without a second read racing a reload.
    pub fn classify(
        &self,
        record: &FeatureRecord,
    ) -> Result<(Classification, Arc<ModelBundle>), ClassifyError> {
        let bundle = self.require()?;
        let result = classifier::classify(record, &bundle)?;
        Ok((result, bundle))
    }

    /// Classify records in order against a single bundle snapshot.
    pub fn classify_batch(
        &self,
        records: &[FeatureRecord],
    ) -> Result<BatchClassification, ClassifyError> {
        let bundle = self.require()?;
        Ok(classifier::classify_batch(records, &bundle)?)
    }
}
