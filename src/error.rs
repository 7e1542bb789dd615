//! Error types for the SugarSense risk pipeline

use thiserror::Error;

/// Result type alias for risk pipeline operations
pub type Result<T> = std::result::Result<T, RiskError>;

/// Main error type for the risk assessment pipeline
#[derive(Error, Debug)]
pub enum RiskError {
    /// Schema lookup failed (unknown feature name)
    #[error("Schema error: unknown feature '{0}'")]
    Schema(String),

    /// An inference input does not cover exactly the feature schema
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Fitting the preprocessor failed (e.g. a column with no usable values)
    #[error("Fit error: {0}")]
    Fit(String),

    /// A feature's frozen standard deviation is zero; standardization would
    /// divide by zero
    #[error("Degenerate feature '{feature}': standard deviation is zero")]
    DegenerateFeature { feature: String },

    /// The classifier did not converge within its iteration budget
    #[error("Convergence failed after {iterations} iterations (gradient norm {gradient_norm:.3e})")]
    Convergence {
        iterations: usize,
        gradient_norm: f64,
    },

    /// A persisted artifact bundle is unreadable or disagrees with the schema
    #[error("Corrupt artifact: {0}")]
    CorruptArtifact(String),

    /// A training stage aborted the run; the stage name identifies where
    #[error("Training stage {stage} failed: {source}")]
    Training {
        stage: &'static str,
        #[source]
        source: Box<RiskError>,
    },

    #[error("Data error: {0}")]
    Data(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    Shape { expected: String, actual: String },
}

impl RiskError {
    /// Wrap an error with the training stage it occurred in.
    pub fn in_stage(self, stage: &'static str) -> Self {
        RiskError::Training {
            stage,
            source: Box::new(self),
        }
    }
}

impl From<polars::error::PolarsError> for RiskError {
    fn from(err: polars::error::PolarsError) -> Self {
        RiskError::Data(err.to_string())
    }
}

impl From<serde_json::Error> for RiskError {
    fn from(err: serde_json::Error) -> Self {
        RiskError::Serialization(err.to_string())
    }
}
