//! Integration tests for artifact loading and validated prediction.

use std::path::{Path, PathBuf};

use rand::Rng;
use predikt_classifiers::models::factory::load_model;
use predikt_classifiers::{ModelConfig, ModelError, ModelFormat, Predictor};

fn demo_forest() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/iris_forest.json")
}

fn iris_predictor() -> Predictor {
    let config = ModelConfig::new(demo_forest(), ModelFormat::RandomForest).with_n_features(4);
    Predictor::from_config(&config).expect("demo forest should load")
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

#[test]
fn setosa_sample_predicts_class_zero() {
    assert_eq!(iris_predictor().predict_one(&[5.1, 3.5, 1.4, 0.2]).unwrap(), 0);
}

#[test]
fn versicolor_and_virginica_samples() {
    let p = iris_predictor();
    assert_eq!(p.predict_one(&[6.0, 2.7, 4.1, 1.0]).unwrap(), 1);
    assert_eq!(p.predict_one(&[6.7, 3.0, 5.2, 2.3]).unwrap(), 2);
}

#[test]
fn repeated_predictions_are_identical() {
    let p = iris_predictor();
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let x: Vec<f64> = (0..4).map(|_| rng.gen_range(0.0..8.0)).collect();
        let first = p.predict_one(&x).unwrap();
        let second = p.predict_one(&x).unwrap();
        assert_eq!(first, second, "prediction changed for {:?}", x);
    }
}

#[test]
fn bad_inputs_do_not_poison_the_predictor() {
    let p = iris_predictor();
    assert!(matches!(p.predict_one(&[]), Err(ModelError::EmptyFeatures)));
    assert!(matches!(
        p.predict_one(&[1.0, 2.0, 3.0]),
        Err(ModelError::DimensionMismatch { expected: 4, got: 3 })
    ));
    assert!(p.predict_one(&[5.1, 3.5, 1.4, 0.2]).is_ok());
}

#[test]
fn info_reports_artifact_metadata() {
    let info = iris_predictor().info();
    assert_eq!(info.name, "random_forest");
    assert_eq!(info.format, ModelFormat::RandomForest);
    assert_eq!(info.n_features, 4);
    assert_eq!(info.classes, vec![0, 1, 2]);
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn missing_artifact_is_io_error() {
    let config = ModelConfig::new("/nonexistent/model.json", ModelFormat::RandomForest);
    assert!(matches!(load_model(&config), Err(ModelError::Io { .. })));
}

#[test]
fn corrupt_artifact_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    std::fs::write(&path, b"\x80\x04\x95 not json").unwrap();
    let config = ModelConfig::new(&path, ModelFormat::RandomForest);
    let err = load_model(&config).err().expect("corrupt artifact must fail");
    assert!(!err.is_input_error());
    assert!(err.to_string().contains("Failed to"));
}

#[test]
fn wrong_format_for_artifact_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    std::fs::write(&path, r#"{"trees": []}"#).unwrap();
    let config = ModelConfig::new(&path, ModelFormat::RandomForest);
    assert!(matches!(load_model(&config), Err(ModelError::Parse { .. })));
}

#[test]
fn declared_dimensionality_must_match_artifact() {
    let config = ModelConfig::new(demo_forest(), ModelFormat::RandomForest).with_n_features(7);
    match load_model(&config) {
        Err(ModelError::InvalidArtifact(msg)) => assert!(msg.contains("7")),
        Err(other) => panic!("unexpected error {}", other),
        Ok(_) => panic!("mismatched n_features should fail to load"),
    }
}

#[test]
fn artifact_dimensionality_used_when_not_declared() {
    let config = ModelConfig::new(demo_forest(), ModelFormat::RandomForest);
    let p = Predictor::from_config(&config).unwrap();
    assert_eq!(p.n_features(), 4);
}
