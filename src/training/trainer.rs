//! Staged offline training pipeline

use crate::artifact::ArtifactBundle;
use crate::classifier::LogisticRegression;
use crate::dataset;
use crate::error::{Result, RiskError};
use crate::preprocessing::Preprocessor;
use crate::schema::FeatureSchema;
use ndarray::{Array1, Axis};
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::path::Path;
use tracing::info;

use super::{ClassificationReport, TrainerConfig};

/// Stages of the training run, in execution order.
///
/// Every stage is terminal-on-failure: the stage name travels in the error
/// and no partial bundle is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainStage {
    LoadDataset,
    CleanColumns,
    SplitTrainTest,
    FitPreprocessor,
    FitClassifier,
    Evaluate,
    PersistBundle,
}

impl TrainStage {
    pub fn name(&self) -> &'static str {
        match self {
            TrainStage::LoadDataset => "LoadDataset",
            TrainStage::CleanColumns => "CleanColumns",
            TrainStage::SplitTrainTest => "SplitTrainTest",
            TrainStage::FitPreprocessor => "FitPreprocessor",
            TrainStage::FitClassifier => "FitClassifier",
            TrainStage::Evaluate => "Evaluate",
            TrainStage::PersistBundle => "PersistBundle",
        }
    }
}

/// Result of a completed training run
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub bundle: ArtifactBundle,
    pub report: ClassificationReport,
    pub n_train: usize,
    pub n_test: usize,
}

/// Offline trainer: labeled dataset in, persisted artifact bundle out.
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainerConfig,
    schema: FeatureSchema,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self {
            config,
            schema: FeatureSchema::diabetes(),
        }
    }

    /// Trainer over a custom schema, for fixture pipelines.
    pub fn with_schema(config: TrainerConfig, schema: FeatureSchema) -> Self {
        Self { config, schema }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Run the full pipeline and persist the bundle at `output`.
    pub fn run(&self, dataset_path: &Path, output: &Path) -> Result<TrainingOutcome> {
        let df = stage(TrainStage::LoadDataset, || dataset::load_csv(dataset_path))?;
        info!(rows = df.height(), cols = df.width(), "dataset loaded");

        // Imputation is deliberately NOT done here: its statistics are fitted
        // on the training split only, inside FitPreprocessor.
        let (x, y) = stage(TrainStage::CleanColumns, || {
            dataset::extract_matrix(&df, &self.schema)
        })?;

        let (train_idx, test_idx) = stage(TrainStage::SplitTrainTest, || {
            stratified_split(&y, self.config.test_fraction, self.config.seed)
        })?;
        info!(
            n_train = train_idx.len(),
            n_test = test_idx.len(),
            seed = self.config.seed,
            "stratified split"
        );

        let x_train = x.select(Axis(0), &train_idx);
        let y_train = y.select(Axis(0), &train_idx);
        let x_test = x.select(Axis(0), &test_idx);
        let y_test = y.select(Axis(0), &test_idx);

        let (preprocessor, x_train_std, x_test_std) =
            stage(TrainStage::FitPreprocessor, || {
                let preprocessor = Preprocessor::fit(x_train.view(), &self.schema)?;
                let x_train_std = preprocessor.transform_matrix(x_train.view())?;
                let x_test_std = preprocessor.transform_matrix(x_test.view())?;
                Ok((preprocessor, x_train_std, x_test_std))
            })?;

        let classifier = stage(TrainStage::FitClassifier, || {
            let mut model = LogisticRegression::new()
                .with_learning_rate(self.config.learning_rate)
                .with_l2(self.config.l2)
                .with_max_iter(self.config.max_iter)
                .with_tol(self.config.tol);
            model.fit(x_train_std.view(), y_train.view())?;
            Ok(model)
        })?;

        let report = stage(TrainStage::Evaluate, || {
            let y_pred = classifier.predict(x_test_std.view())?;
            Ok(ClassificationReport::compute(y_test.view(), y_pred.view()))
        })?;
        info!(accuracy = report.accuracy, "held-out evaluation");

        let bundle = stage(TrainStage::PersistBundle, || {
            let bundle = ArtifactBundle::new(&preprocessor, &classifier, Some(report.clone()))?;
            bundle.save(output)?;
            Ok(bundle)
        })?;
        info!(path = %output.display(), "bundle persisted");

        Ok(TrainingOutcome {
            bundle,
            report,
            n_train: train_idx.len(),
            n_test: test_idx.len(),
        })
    }
}

fn stage<T>(stage: TrainStage, f: impl FnOnce() -> Result<T>) -> Result<T> {
    f().map_err(|e| e.in_stage(stage.name()))
}

/// Deterministic stratified split: shuffle each class with a seeded RNG and
/// hold out `test_fraction` of each. Identical input and seed always produce
/// identical partitions.
fn stratified_split(
    y: &Array1<f64>,
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(0.0..1.0).contains(&test_fraction) || test_fraction == 0.0 {
        return Err(RiskError::Data(format!(
            "test fraction must be in (0, 1), got {}",
            test_fraction
        )));
    }

    let mut negatives: Vec<usize> = Vec::new();
    let mut positives: Vec<usize> = Vec::new();
    for (i, label) in y.iter().enumerate() {
        if *label == 1.0 {
            positives.push(i);
        } else {
            negatives.push(i);
        }
    }
    if negatives.len() < 2 || positives.len() < 2 {
        return Err(RiskError::Data(
            "stratified split requires at least two samples of each outcome class".to_string(),
        ));
    }

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    negatives.shuffle(&mut rng);
    positives.shuffle(&mut rng);

    let mut train = Vec::with_capacity(y.len());
    let mut test = Vec::new();
    for class in [&negatives, &positives] {
        let n_test = ((class.len() as f64) * test_fraction).round() as usize;
        let n_test = n_test.clamp(1, class.len() - 1);
        test.extend_from_slice(&class[..n_test]);
        train.extend_from_slice(&class[n_test..]);
    }

    // Stable row order within each partition keeps downstream fits
    // independent of the shuffle order.
    train.sort_unstable();
    test.sort_unstable();
    Ok((train, test))
}
