//! SugarSense core - diabetes risk assessment pipeline
//!
//! This crate implements the risk assessment contract behind the SugarSense
//! application: an offline trainer that produces a versioned artifact bundle,
//! and an online inference session that consumes it. Training-time and
//! inference-time feature handling share one frozen set of parameters so the
//! two can never drift apart.

pub mod artifact;
pub mod classifier;
pub mod dataset;
pub mod error;
pub mod inference;
pub mod preprocessing;
pub mod schema;
pub mod training;

pub use error::{Result, RiskError};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::artifact::ArtifactBundle;
    pub use crate::classifier::{LogisticRegression, Prediction, RiskLabel};
    pub use crate::error::{Result, RiskError};
    pub use crate::inference::{InferenceSession, RawSample, RiskModel, RiskState};
    pub use crate::preprocessing::Preprocessor;
    pub use crate::schema::{FeatureSchema, FeatureSpec, ValueKind};
    pub use crate::training::{ClassificationReport, Trainer, TrainerConfig};
}
