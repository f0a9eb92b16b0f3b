use axum::body::{to_bytes, Body};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{Request, StatusCode};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use model_service::metrics::install_recorder;
use model_service::{router, AppState};
use once_cell::sync::Lazy;
use sentiment_model::{BagOfWordsVectorizer, LogisticRegression, ModelInterface};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

const FORM: &str = "application/x-www-form-urlencoded";

// One recorder per test binary; assertions on /metrics use labels unique to each test.
static RECORDER: Lazy<PrometheusHandle> =
    Lazy::new(|| install_recorder().expect("install Prometheus recorder"));

fn test_model() -> ModelInterface {
    // sorted columns: bad, great, movi, not
    let vectorizer = BagOfWordsVectorizer::from_terms(&["great", "bad", "movi", "not"]).unwrap();
    let classifier = LogisticRegression::new(vec![0, 1], vec![-2.0, 2.0, 0.0, -1.0], 0.0).unwrap();
    ModelInterface::new(vectorizer, Box::new(classifier)).unwrap()
}

fn test_app() -> (Arc<AppState>, Router) {
    let state = Arc::new(AppState::new(Arc::new(test_model()), RECORDER.clone()));
    (state.clone(), router(state))
}

async fn post(app: &Router, uri: &str, content_type: Option<&str>, body: &str) -> (StatusCode, String) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_LENGTH, body.len());
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_predict_returns_sentiment() {
    let (state, app) = test_app();

    let (status, body) = post(&app, "/predict", Some(FORM), "data=This+movie+was+great").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["sentiment"], 1);
    assert_eq!(state.metrics.predictions(), 1);
}

#[tokio::test]
async fn test_predict_negative_review() {
    let (_, app) = test_app();
    let (status, body) = post(&app, "/predict", Some(FORM), "data=Bad+movie%2C+not+great").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"sentiment":0}"#);
}

#[tokio::test]
async fn test_predict_multipart() {
    let (state, app) = test_app();
    let body = "--B\r\nContent-Disposition: form-data; name=\"data\"\r\n\r\nGreat movie\r\n\
--B\r\nContent-Disposition: form-data; name=\"sender\"\r\n\r\nfrontend\r\n--B--\r\n";

    let (status, body) = post(&app, "/predict", Some("multipart/form-data; boundary=B"), body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"sentiment":1}"#);

    let snapshot = state.metrics.snapshot().await;
    assert_eq!(snapshot.predictions_by_sender.get("frontend"), Some(&1));
}

#[tokio::test]
async fn test_predict_without_data_is_bad_request() {
    let (state, app) = test_app();

    let (status, body) = post(&app, "/predict", Some(FORM), "sender=web").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "The request should be form data with a key called \"data\".");

    let (status, _) = post(&app, "/predict", None, "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(state.metrics.predictions(), 0);
}

#[tokio::test]
async fn test_validate_true_counts_one_correct() {
    let (state, app) = test_app();
    let before = state.metrics.validation_tally();

    let (status, body) = post(&app, "/validate", Some(FORM), "validation=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Thank you");

    let after = state.metrics.validation_tally();
    assert_eq!(after.correct, before.correct + 1);
    assert_eq!(after.incorrect, before.incorrect);
}

#[tokio::test]
async fn test_validate_rated_object() {
    let (state, app) = test_app();

    let payload = "validation=%7B%22prediction%22%3A1%2C%22rating%22%3A0%2C%22review%22%3A%22meh%22%7D&sender=alice";
    let (status, _) = post(&app, "/validate", Some(FORM), payload).await;
    assert_eq!(status, StatusCode::OK);

    let snapshot = state.metrics.snapshot().await;
    assert_eq!(snapshot.validations.incorrect, 1);
    assert_eq!(snapshot.validations_by_sender["alice"].incorrect, 1);
}

#[tokio::test]
async fn test_validate_errors() {
    let (state, app) = test_app();

    let (status, body) = post(&app, "/validate", Some(FORM), "sender=web").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "The request should be form data with a key called \"validation\".");

    let (status, body) = post(&app, "/validate", Some(FORM), "validation=%7Bnot+json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("not valid JSON"));

    let (status, _) = post(&app, "/validate", Some(FORM), "validation=%22yes%22").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(state.metrics.validation_tally().total(), 0);
}

#[tokio::test]
async fn test_counters_never_decrease() {
    let (state, app) = test_app();
    let requests = [
        ("/predict", "data=great"),
        ("/validate", "validation=false"),
        ("/predict", "sender=web"),
        ("/validate", "validation=oops"),
        ("/predict", "data=bad&sender=web"),
        ("/validate", "validation=true&sender=web"),
    ];

    let mut last = state.metrics.snapshot().await;
    for (uri, body) in requests {
        post(&app, uri, Some(FORM), body).await;
        let current = state.metrics.snapshot().await;
        assert!(current.predictions >= last.predictions);
        assert!(current.validations.correct >= last.validations.correct);
        assert!(current.validations.incorrect >= last.validations.incorrect);
        last = current;
    }

    assert_eq!(last.predictions, 2);
    assert_eq!(last.validations.total(), 2);
    assert_eq!(last.validations.accuracy_percent(), Some(50.0));
}

#[tokio::test]
async fn test_metrics_endpoint_renders_recorder() {
    let (_, app) = test_app();
    post(&app, "/predict", Some(FORM), "data=great&sender=metrics-endpoint").await;
    post(&app, "/predict", Some(FORM), "data=bad&sender=metrics-endpoint").await;
    post(&app, "/validate", Some(FORM), "validation=true&sender=metrics-endpoint").await;
    post(&app, "/validate", Some(FORM), "validation=false&sender=metrics-endpoint").await;

    let (status, body) = get(&app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("# TYPE predictions_total counter"));
    assert!(body.contains("predictions_total{sender=\"metrics-endpoint\"} 2"));
    assert!(body.contains("predictions_by_sentiment_total{sentiment=\"1\"}"));
    assert!(body.contains("validations_total{is_correct=\"true\"}"));
    assert!(body.contains("validations_total{is_correct=\"false\"}"));
    assert!(body.contains(
        "validations_by_sender_total{sender=\"metrics-endpoint\",is_correct=\"true\"} 1"
    ));
    assert!(body.contains(
        "validations_by_sender_total{sender=\"metrics-endpoint\",is_correct=\"false\"} 1"
    ));
    assert!(body.contains("validation_accuracy_percent "));
}

#[tokio::test]
async fn test_health_and_index() {
    let (_, app) = test_app();

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["healthy"], true);
    assert_eq!(json["vocabulary_size"], 4);
    assert_eq!(json["classifier"], "logistic_regression");

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/predict"));
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let (_, app) = test_app();
    let body = format!("data={}", "a".repeat(model_service::MAX_BODY_SIZE + 1));
    let (status, _) = post(&app, "/predict", Some(FORM), &body).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_oversized_streamed_multipart_rejected() {
    let (state, app) = test_app();
    let body = format!(
        "--B\r\nContent-Disposition: form-data; name=\"data\"\r\n\r\n{}\r\n--B--\r\n",
        "a".repeat(model_service::MAX_BODY_SIZE + 1)
    );

    // No Content-Length: the limit is only hit while reading the body
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header(CONTENT_TYPE, "multipart/form-data; boundary=B")
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(state.metrics.predictions(), 0);
}

#[tokio::test]
async fn test_bundled_artifacts_serve_predictions() {
    let models = Path::new(env!("CARGO_MANIFEST_DIR")).join("../models");
    let model = ModelInterface::load(
        models.join("bow_vectorizer.json"),
        models.join("classifier.json"),
    )
    .unwrap();
    let app = router(Arc::new(AppState::new(Arc::new(model), RECORDER.clone())));

    let (status, body) = post(&app, "/predict", Some(FORM), "data=This+movie+was+great").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    let sentiment = json["sentiment"].as_u64().unwrap();
    assert!(sentiment == 0 || sentiment == 1);
}
