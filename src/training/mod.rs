//! Offline training pipeline
//!
//! Loads the labeled dataset, validates it, fits the preprocessor and
//! classifier on a deterministic stratified split, evaluates on the held-out
//! fraction, and persists the artifact bundle. Any stage failure aborts the
//! run with the stage name attached; no partial bundle is ever persisted.

mod config;
mod metrics;
mod trainer;

pub use config::TrainerConfig;
pub use metrics::{ClassMetrics, ClassificationReport};
pub use trainer::{TrainStage, Trainer, TrainingOutcome};
