//! Integration test: full pipeline (load → clean → split → fit → evaluate → persist → infer)

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use sugarsense::artifact::ArtifactBundle;
use sugarsense::inference::{InferenceSession, RawSample, RiskModel, RiskState};
use sugarsense::schema::FeatureSchema;
use sugarsense::training::{Trainer, TrainerConfig};
use sugarsense::RiskError;

const FEATURES: [&str; 8] = [
    "Pregnancies",
    "Glucose",
    "BloodPressure",
    "SkinThickness",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
];

/// Synthetic dataset with a clear glucose signal, a few sentinel zeros in the
/// measurement columns, and non-degenerate variance everywhere.
fn write_dataset(path: &Path) {
    let mut file = std::fs::File::create(path).unwrap();
    writeln!(file, "{},Outcome", FEATURES.join(",")).unwrap();

    for i in 0..40 {
        let outcome = if i % 2 == 0 { 0 } else { 1 };
        let glucose = if outcome == 0 {
            85.0 + (i % 10) as f64 * 2.0
        } else {
            150.0 + (i % 10) as f64 * 3.0
        };
        // Every fifth row has unrecorded insulin / skin thickness.
        let insulin = if i % 5 == 0 { 0.0 } else { 80.0 + i as f64 * 2.0 };
        let skin = if i % 5 == 0 { 0.0 } else { 15.0 + (i % 12) as f64 };

        writeln!(
            file,
            "{},{},{},{},{},{},{},{},{}",
            i % 6,
            glucose,
            60.0 + (i % 15) as f64 * 2.0,
            skin,
            insulin,
            22.0 + (i % 14) as f64,
            0.2 + i as f64 * 0.02,
            21 + i,
            outcome
        )
        .unwrap();
    }
}

fn test_config() -> TrainerConfig {
    TrainerConfig::new()
        .with_learning_rate(0.2)
        .with_tol(1e-3)
        .with_max_iter(200_000)
}

fn sample(glucose: f64) -> RawSample {
    let mut s = RawSample::new();
    s.insert("Pregnancies".to_string(), 2.0);
    s.insert("Glucose".to_string(), glucose);
    s.insert("BloodPressure".to_string(), 70.0);
    s.insert("SkinThickness".to_string(), 20.0);
    s.insert("Insulin".to_string(), 90.0);
    s.insert("BMI".to_string(), 28.0);
    s.insert("DiabetesPedigreeFunction".to_string(), 0.5);
    s.insert("Age".to_string(), 33.0);
    s
}

#[test]
fn test_train_persist_load_predict() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("diabetes.csv");
    let bundle_path = dir.path().join("models/model.json");
    write_dataset(&data);

    let trainer = Trainer::new(test_config());
    let outcome = trainer.run(&data, &bundle_path).unwrap();
    assert!(outcome.report.accuracy > 0.7, "accuracy {}", outcome.report.accuracy);
    assert_eq!(outcome.n_train + outcome.n_test, 40);

    // Round-trip: the persisted bundle reproduces in-memory predictions
    // exactly.
    let in_memory = RiskModel::from_bundle(&outcome.bundle);
    let loaded = RiskModel::load(&bundle_path).unwrap();
    for glucose in [70.0, 100.0, 130.0, 160.0, 190.0] {
        let a = in_memory.predict_sample(&sample(glucose)).unwrap();
        let b = loaded.predict_sample(&sample(glucose)).unwrap();
        assert_eq!(a.probability, b.probability);
        assert_eq!(a.label, b.label);
    }

    // The glucose signal dominates the synthetic data.
    let mut session = InferenceSession::new(Arc::new(loaded));
    assert_eq!(session.risk(), RiskState::Unknown);

    session.predict(&sample(190.0)).unwrap();
    assert_eq!(session.risk(), RiskState::High);

    session.predict(&sample(80.0)).unwrap();
    assert_eq!(session.risk(), RiskState::Low);
}

#[test]
fn test_training_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("diabetes.csv");
    write_dataset(&data);

    let a = Trainer::new(test_config())
        .run(&data, &dir.path().join("a.json"))
        .unwrap();
    let b = Trainer::new(test_config())
        .run(&data, &dir.path().join("b.json"))
        .unwrap();

    assert_eq!(a.report, b.report);
    assert_eq!(a.bundle.classifier, b.bundle.classifier);
    assert_eq!(a.bundle.preprocessor, b.bundle.preprocessor);
}

#[test]
fn test_incomplete_sample_leaves_session_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("diabetes.csv");
    let bundle_path = dir.path().join("model.json");
    write_dataset(&data);
    Trainer::new(test_config()).run(&data, &bundle_path).unwrap();

    let model = Arc::new(RiskModel::load(&bundle_path).unwrap());
    let mut session = InferenceSession::new(model);

    let mut incomplete = sample(100.0);
    incomplete.remove("BMI");
    let err = session.predict(&incomplete).unwrap_err();
    assert!(matches!(err, RiskError::SchemaMismatch(_)));
    assert_eq!(session.risk(), RiskState::Unknown);
}

#[test]
fn test_reordered_bundle_rejected_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("diabetes.csv");
    let bundle_path = dir.path().join("model.json");
    write_dataset(&data);
    let outcome = Trainer::new(test_config()).run(&data, &bundle_path).unwrap();

    let mut tampered = outcome.bundle.clone();
    tampered.feature_names.reverse();
    tampered.preprocessor.reverse();
    tampered.classifier.coefficients.reverse();
    let tampered_path = dir.path().join("tampered.json");
    tampered.save(&tampered_path).unwrap();

    let err = RiskModel::load(&tampered_path).unwrap_err();
    assert!(matches!(err, RiskError::CorruptArtifact(_)));

    let err = ArtifactBundle::load(&tampered_path, &FeatureSchema::diabetes()).unwrap_err();
    assert!(matches!(err, RiskError::CorruptArtifact(_)));
}

#[test]
fn test_failed_run_persists_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("bad.csv");
    let bundle_path = dir.path().join("model.json");

    // All-zero glucose: the imputation median is undefined and the
    // FitPreprocessor stage must abort the run.
    let mut file = std::fs::File::create(&data).unwrap();
    writeln!(file, "{},Outcome", FEATURES.join(",")).unwrap();
    for i in 0..10 {
        writeln!(
            file,
            "1,0,{},20,80,25,0.3,{},{}",
            60 + i,
            25 + i,
            i % 2
        )
        .unwrap();
    }
    drop(file);

    let err = Trainer::new(test_config()).run(&data, &bundle_path).unwrap_err();
    match err {
        RiskError::Training { stage, .. } => assert_eq!(stage, "FitPreprocessor"),
        other => panic!("expected stage-tagged error, got {}", other),
    }
    assert!(!bundle_path.exists());
}
