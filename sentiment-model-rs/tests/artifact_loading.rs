use sentiment_model::{ModelError, ModelInterface, Sentiment};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_json(dir: &Path, name: &str, value: serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_vec_pretty(&value).unwrap()).unwrap();
    path
}

fn vectorizer_json() -> serde_json::Value {
    json!({
        "vocabulary": { "bad": 0, "good": 1, "great": 2, "not": 3 }
    })
}

fn gaussian_json() -> serde_json::Value {
    json!({
        "kind": "gaussian_nb",
        "classes": [0, 1],
        "class_prior": [0.5, 0.5],
        "theta": [[0.8, 0.1, 0.05, 0.6], [0.05, 0.7, 0.8, 0.1]],
        "var": [[0.2, 0.2, 0.2, 0.2], [0.2, 0.2, 0.2, 0.2]]
    })
}

#[test]
fn test_load_and_predict_from_disk() {
    let dir = TempDir::new().unwrap();
    let vectorizer = write_json(dir.path(), "vectorizer.json", vectorizer_json());
    let classifier = write_json(dir.path(), "classifier.json", gaussian_json());

    let model = ModelInterface::load(&vectorizer, &classifier).unwrap();
    assert_eq!(model.vocabulary_size(), 4);
    assert_eq!(model.classifier_kind(), "gaussian_nb");

    assert_eq!(model.predict("What a great meal", false).unwrap(), Sentiment::Positive);
    assert_eq!(model.predict("This was bad, not good", false).unwrap(), Sentiment::Negative);
}

#[test]
fn test_missing_artifact_is_io_error() {
    let dir = TempDir::new().unwrap();
    let classifier = write_json(dir.path(), "classifier.json", gaussian_json());

    let result = ModelInterface::load(dir.path().join("missing.json"), &classifier);
    assert!(matches!(result, Err(ModelError::Io { .. })));
}

#[test]
fn test_corrupt_artifact_is_json_error() {
    let dir = TempDir::new().unwrap();
    let vectorizer = write_json(dir.path(), "vectorizer.json", vectorizer_json());
    let classifier = dir.path().join("classifier.json");
    fs::write(&classifier, b"\x80\x04\x95 pickled bytes").unwrap();

    let err = ModelInterface::load(&vectorizer, &classifier).unwrap_err();
    assert!(matches!(err, ModelError::Json { .. } | ModelError::Io { .. }));
    assert!(err.to_string().contains("classifier.json"));
}

#[test]
fn test_mismatched_artifacts_rejected() {
    let dir = TempDir::new().unwrap();
    let vectorizer = write_json(
        dir.path(),
        "vectorizer.json",
        json!({ "vocabulary": { "bad": 0, "good": 1 } }),
    );
    let classifier = write_json(dir.path(), "classifier.json", gaussian_json());

    assert!(matches!(
        ModelInterface::load(&vectorizer, &classifier),
        Err(ModelError::DimensionMismatch { expected: 4, actual: 2 })
    ));
}

#[test]
fn test_bundled_artifacts_load() {
    let models = Path::new(env!("CARGO_MANIFEST_DIR")).join("../models");
    let model = ModelInterface::load(
        models.join("bow_vectorizer.json"),
        models.join("classifier.json"),
    )
    .unwrap();

    let sentiment = model.predict("This movie was great", false).unwrap();
    assert!(sentiment.label() <= 1);
    assert_eq!(model.predict("Wow... Loved this place.", false).unwrap(), Sentiment::Positive);
    assert_eq!(model.predict("The food was cold and the staff rude", false).unwrap(), Sentiment::Negative);
}
