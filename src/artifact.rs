//! Versioned artifact bundle
//!
//! The serialized unit binding preprocessor parameters, classifier parameters
//! and the feature schema, so training and inference can never drift apart.
//! Immutable once written; replaced wholesale on retrain.

use crate::classifier::LogisticRegression;
use crate::error::{Result, RiskError};
use crate::preprocessing::Preprocessor;
use crate::schema::FeatureSchema;
use crate::training::ClassificationReport;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tempfile::NamedTempFile;

/// Current bundle format version
pub const FORMAT_VERSION: u32 = 1;

/// Frozen preprocessing parameters for one feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureParams {
    pub name: String,
    pub zero_is_missing: bool,
    /// Training-set median over non-zero values; present iff zero_is_missing
    pub median: Option<f64>,
    pub mean: f64,
    pub std: f64,
}

/// Frozen classifier parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierParams {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// The persisted prediction artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactBundle {
    pub format_version: u32,
    /// RFC 3339 training timestamp
    pub trained_at: String,
    /// Ordered feature names; must agree byte-for-byte with the caller's schema
    pub feature_names: Vec<String>,
    pub preprocessor: Vec<FeatureParams>,
    pub classifier: ClassifierParams,
    /// Diagnostic evaluation from the training run; not used by inference
    pub report: Option<ClassificationReport>,
}

impl ArtifactBundle {
    /// Assemble a bundle from fitted components.
    pub fn new(
        preprocessor: &Preprocessor,
        classifier: &LogisticRegression,
        report: Option<ClassificationReport>,
    ) -> Result<Self> {
        let schema = preprocessor.schema();
        let medians = preprocessor.imputer().medians();
        let means = preprocessor.scaler().means();
        let stds = preprocessor.scaler().stds();

        let params = schema
            .features()
            .iter()
            .enumerate()
            .map(|(j, spec)| FeatureParams {
                name: spec.name.clone(),
                zero_is_missing: spec.zero_is_missing,
                median: medians[j],
                mean: means[j],
                std: stds[j],
            })
            .collect();

        let coefficients = classifier
            .coefficients()
            .ok_or_else(|| RiskError::Fit("classifier is not fitted".to_string()))?
            .to_vec();
        let intercept = classifier
            .intercept()
            .ok_or_else(|| RiskError::Fit("classifier is not fitted".to_string()))?;

        Ok(Self {
            format_version: FORMAT_VERSION,
            trained_at: chrono::Utc::now().to_rfc3339(),
            feature_names: schema.names().iter().map(|s| s.to_string()).collect(),
            preprocessor: params,
            classifier: ClassifierParams {
                coefficients,
                intercept,
            },
            report,
        })
    }

    /// Persist atomically: write to a temporary file in the target directory,
    /// then publish via rename. A concurrent loader can never observe a
    /// partially written bundle.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(tmp.as_file_mut(), self)?;
        tmp.persist(path).map_err(|e| RiskError::Io(e.error))?;
        Ok(())
    }

    /// Load and validate against the schema the calling process expects.
    ///
    /// Fails with a corrupt-artifact error on unreadable JSON, a format
    /// version mismatch, a feature-name list differing in length or order
    /// from the expected schema, or parameter arity disagreements.
    pub fn load(path: &Path, expected: &FeatureSchema) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let bundle: Self = serde_json::from_str(&json)
            .map_err(|e| RiskError::CorruptArtifact(format!("unreadable bundle: {}", e)))?;
        bundle.validate(expected)?;
        Ok(bundle)
    }

    fn validate(&self, expected: &FeatureSchema) -> Result<()> {
        if self.format_version != FORMAT_VERSION {
            return Err(RiskError::CorruptArtifact(format!(
                "format version {} (expected {})",
                self.format_version, FORMAT_VERSION
            )));
        }

        let expected_names = expected.names();
        if self.feature_names.len() != expected_names.len() {
            return Err(RiskError::CorruptArtifact(format!(
                "bundle has {} features, schema expects {}",
                self.feature_names.len(),
                expected_names.len()
            )));
        }
        for (stored, wanted) in self.feature_names.iter().zip(expected_names.iter()) {
            if stored != wanted {
                return Err(RiskError::CorruptArtifact(format!(
                    "feature order mismatch: bundle has '{}' where schema expects '{}'",
                    stored, wanted
                )));
            }
        }

        if self.preprocessor.len() != self.feature_names.len() {
            return Err(RiskError::CorruptArtifact(
                "preprocessor parameter count disagrees with feature list".to_string(),
            ));
        }
        for (params, name) in self.preprocessor.iter().zip(self.feature_names.iter()) {
            if &params.name != name {
                return Err(RiskError::CorruptArtifact(format!(
                    "preprocessor parameters for '{}' out of order",
                    params.name
                )));
            }
            if params.zero_is_missing && params.median.is_none() {
                return Err(RiskError::CorruptArtifact(format!(
                    "missing imputation median for '{}'",
                    params.name
                )));
            }
        }

        if self.classifier.coefficients.len() != self.feature_names.len() {
            return Err(RiskError::CorruptArtifact(
                "classifier coefficient count disagrees with feature list".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FeatureSpec, ValueKind};
    use ndarray::array;

    fn two_feature_schema() -> FeatureSchema {
        FeatureSchema::new(
            vec![
                FeatureSpec {
                    name: "Glucose".to_string(),
                    kind: ValueKind::Continuous,
                    min: 0.0,
                    max: 300.0,
                    zero_is_missing: true,
                },
                FeatureSpec {
                    name: "Age".to_string(),
                    kind: ValueKind::Count,
                    min: 1.0,
                    max: 120.0,
                    zero_is_missing: false,
                },
            ],
            "Outcome",
        )
    }

    fn fitted_bundle(schema: &FeatureSchema) -> ArtifactBundle {
        let x = array![
            [0.0, 25.0],
            [100.0, 30.0],
            [120.0, 35.0],
            [140.0, 45.0],
        ];
        let preprocessor = Preprocessor::fit(x.view(), schema).unwrap();
        let classifier = LogisticRegression::from_params(array![0.4, -0.2], 0.1);
        ArtifactBundle::new(&preprocessor, &classifier, None).unwrap()
    }

    #[test]
    fn test_save_load_round_trip() {
        let schema = two_feature_schema();
        let bundle = fitted_bundle(&schema);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        bundle.save(&path).unwrap();

        let loaded = ArtifactBundle::load(&path, &schema).unwrap();
        assert_eq!(loaded.feature_names, bundle.feature_names);
        assert_eq!(loaded.preprocessor, bundle.preprocessor);
        assert_eq!(loaded.classifier, bundle.classifier);
    }

    #[test]
    fn test_reordered_feature_list_rejected() {
        let schema = two_feature_schema();
        let mut bundle = fitted_bundle(&schema);
        bundle.feature_names.reverse();
        bundle.preprocessor.reverse();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        bundle.save(&path).unwrap();

        let err = ArtifactBundle::load(&path, &schema).unwrap_err();
        assert!(matches!(err, RiskError::CorruptArtifact(_)));
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let schema = two_feature_schema();
        let mut bundle = fitted_bundle(&schema);
        bundle.format_version = 99;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        bundle.save(&path).unwrap();

        assert!(matches!(
            ArtifactBundle::load(&path, &schema),
            Err(RiskError::CorruptArtifact(_))
        ));
    }

    #[test]
    fn test_coefficient_arity_rejected() {
        let schema = two_feature_schema();
        let mut bundle = fitted_bundle(&schema);
        bundle.classifier.coefficients.pop();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        bundle.save(&path).unwrap();

        assert!(matches!(
            ArtifactBundle::load(&path, &schema),
            Err(RiskError::CorruptArtifact(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let schema = two_feature_schema();
        let err = ArtifactBundle::load(Path::new("/nonexistent/model.json"), &schema).unwrap_err();
        assert!(matches!(err, RiskError::Io(_)));
    }

    #[test]
    fn test_garbage_file_is_corrupt() {
        let schema = two_feature_schema();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            ArtifactBundle::load(&path, &schema),
            Err(RiskError::CorruptArtifact(_))
        ));
    }
}
