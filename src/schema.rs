//! Fixed clinical feature schema
//!
//! The ordered list of named, typed features the model expects. Order and
//! names must be byte-identical between training and inference; the artifact
//! bundle validates against this schema on load.

use crate::error::{Result, RiskError};
use serde::{Deserialize, Serialize};

/// Semantic kind of a feature value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    /// Non-negative integer count
    Count,
    /// Continuous physical measurement
    Continuous,
    /// Bounded ratio / score
    Ratio,
}

/// One named feature with its valid input range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub name: String,
    pub kind: ValueKind,
    /// Inclusive input bounds, used by callers for input validation
    pub min: f64,
    pub max: f64,
    /// Whether a literal zero means "not recorded" for this feature
    pub zero_is_missing: bool,
}

impl FeatureSpec {
    fn new(name: &str, kind: ValueKind, min: f64, max: f64, zero_is_missing: bool) -> Self {
        Self {
            name: name.to_string(),
            kind,
            min,
            max,
            zero_is_missing,
        }
    }
}

/// Ordered, immutable feature schema plus the labeled outcome column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSchema {
    features: Vec<FeatureSpec>,
    target: String,
}

impl FeatureSchema {
    /// Create a schema from an ordered feature list.
    pub fn new(features: Vec<FeatureSpec>, target: impl Into<String>) -> Self {
        Self {
            features,
            target: target.into(),
        }
    }

    /// The fixed Pima diabetes schema used by the application.
    ///
    /// Zero is a "not recorded" sentinel for measurements that cannot be zero
    /// in a living subject: glucose, blood pressure, skin thickness, insulin
    /// and BMI.
    pub fn diabetes() -> Self {
        use ValueKind::*;
        Self::new(
            vec![
                FeatureSpec::new("Pregnancies", Count, 0.0, 20.0, false),
                FeatureSpec::new("Glucose", Continuous, 0.0, 300.0, true),
                FeatureSpec::new("BloodPressure", Continuous, 0.0, 200.0, true),
                FeatureSpec::new("SkinThickness", Continuous, 0.0, 100.0, true),
                FeatureSpec::new("Insulin", Continuous, 0.0, 900.0, true),
                FeatureSpec::new("BMI", Continuous, 0.0, 70.0, true),
                FeatureSpec::new("DiabetesPedigreeFunction", Ratio, 0.0, 3.0, false),
                FeatureSpec::new("Age", Count, 1.0, 120.0, false),
            ],
            "Outcome",
        )
    }

    /// Ordered feature names.
    pub fn names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name.as_str()).collect()
    }

    /// Ordered feature specs.
    pub fn features(&self) -> &[FeatureSpec] {
        &self.features
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Name of the outcome column in the training dataset.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Valid input range for a feature, for caller-side input validation.
    pub fn range_of(&self, name: &str) -> Result<(f64, f64)> {
        self.features
            .iter()
            .find(|f| f.name == name)
            .map(|f| (f.min, f.max))
            .ok_or_else(|| RiskError::Schema(name.to_string()))
    }

    /// Position of a feature in the schema order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.features.iter().position(|f| f.name == name)
    }
}
