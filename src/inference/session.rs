//! Loaded risk model and per-session inference

use crate::artifact::ArtifactBundle;
use crate::classifier::{LogisticRegression, Prediction, RiskLabel};
use crate::error::Result;
use crate::preprocessing::Preprocessor;
use crate::schema::FeatureSchema;
use ndarray::Array1;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use super::RiskState;

/// One raw inference input: feature name to numeric value
pub type RawSample = HashMap<String, f64>;

/// Immutable, loaded prediction model.
///
/// Built once from a validated artifact bundle at process start and shared
/// read-only (`Arc`) across all concurrent sessions; it is never mutated
/// after construction, so no locking is needed. Retraining publishes a new
/// bundle file out-of-band; a running process keeps its loaded model until it
/// deliberately swaps.
#[derive(Debug)]
pub struct RiskModel {
    preprocessor: Preprocessor,
    classifier: LogisticRegression,
}

impl RiskModel {
    /// Build a model from a validated bundle.
    pub fn from_bundle(bundle: &ArtifactBundle) -> Self {
        let schema = FeatureSchema::diabetes();
        Self::from_bundle_with_schema(bundle, schema)
    }

    /// Build against an explicit schema, for fixture bundles in tests.
    pub fn from_bundle_with_schema(bundle: &ArtifactBundle, schema: FeatureSchema) -> Self {
        let medians = bundle.preprocessor.iter().map(|p| p.median).collect();
        let means = bundle.preprocessor.iter().map(|p| p.mean).collect();
        let stds = bundle.preprocessor.iter().map(|p| p.std).collect();

        let preprocessor = Preprocessor::from_params(schema, medians, means, stds);
        let classifier = LogisticRegression::from_params(
            Array1::from_vec(bundle.classifier.coefficients.clone()),
            bundle.classifier.intercept,
        );

        Self {
            preprocessor,
            classifier,
        }
    }

    /// Load and validate a bundle from disk, then build the model.
    ///
    /// A load failure here is fatal at process startup: the process must not
    /// serve predictions with a partially or incorrectly loaded bundle.
    pub fn load(path: &Path) -> Result<Self> {
        let schema = FeatureSchema::diabetes();
        let bundle = ArtifactBundle::load(path, &schema)?;
        Ok(Self::from_bundle_with_schema(&bundle, schema))
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.preprocessor.schema()
    }

    /// Classify one raw sample. Pure; no session state involved.
    pub fn predict_sample(&self, sample: &RawSample) -> Result<Prediction> {
        let standardized = self.preprocessor.transform_sample(sample)?;
        self.classifier.predict_one(standardized.view())
    }
}

/// One user interaction session.
///
/// Sole writer of its risk state; advice-content consumers read it through
/// [`InferenceSession::risk`] and never infer a default when it is `Unknown`.
#[derive(Debug)]
pub struct InferenceSession {
    model: Arc<RiskModel>,
    risk: RiskState,
}

impl InferenceSession {
    /// Start a session against a loaded model. Risk state begins `Unknown`.
    pub fn new(model: Arc<RiskModel>) -> Self {
        Self {
            model,
            risk: RiskState::Unknown,
        }
    }

    /// Classify a raw sample and record the result in the session risk state.
    ///
    /// The state is mutated exactly once per successful call; on any failure
    /// it is left unchanged and the error is surfaced to the caller (the UI
    /// renders it as "prediction unavailable", never a default label).
    pub fn predict(&mut self, sample: &RawSample) -> Result<RiskLabel> {
        Ok(self.assess(sample)?.label)
    }

    /// Like [`predict`](Self::predict), but returns the probability as well.
    pub fn assess(&mut self, sample: &RawSample) -> Result<Prediction> {
        let prediction = self.model.predict_sample(sample)?;
        self.risk = prediction.label.into();
        debug!(
            probability = prediction.probability,
            label = ?prediction.label,
            "risk recorded"
        );
        Ok(prediction)
    }

    /// Current session risk state (read-only accessor for advice content).
    pub fn risk(&self) -> RiskState {
        self.risk
    }

    /// End-of-session reset back to `Unknown`.
    pub fn reset(&mut self) {
        self.risk = RiskState::Unknown;
    }

    pub fn model(&self) -> &RiskModel {
        &self.model
    }
}
