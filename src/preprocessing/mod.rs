//! Data preprocessing
//!
//! Deterministic cleaning (sentinel-zero imputation) and standardization,
//! fitted once at training time and replayed identically at inference time.

mod imputer;
mod pipeline;
mod scaler;

pub use imputer::MedianImputer;
pub use pipeline::Preprocessor;
pub use scaler::StandardScaler;
