// model-service-rs/src/handlers.rs
// Route handlers: /predict, /validate, /metrics, /health and /

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sentiment_model::Sentiment;
use serde::Serialize;
use std::sync::Arc;

use crate::config::SERVICE_NAME;
use crate::error::ServiceError;
use crate::form::FormFields;
use crate::validation::ValidationPayload;
use crate::AppState;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub sentiment: Sentiment,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub service_name: String,
    pub uptime_seconds: u64,
    pub status: String,
    pub vocabulary_size: usize,
    pub classifier: String,
}

/// POST /predict - Classify the review in the `data` field
///
/// Responds `{"sentiment": 0|1}` where 1 is positive.
pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    form: FormFields,
) -> Result<Json<PredictResponse>, ServiceError> {
    let review = form.require("data")?;
    let sender = form.sender();
    tracing::debug!(sender = sender.unwrap_or("-"), review = %review, "Received review");

    let processed = state.model.preprocess(review);
    let sentiment = state.model.predict(&processed, true)?;

    state.metrics.record_prediction(sender, sentiment).await;
    tracing::info!(sender = sender.unwrap_or("-"), sentiment = sentiment.label(), "Prediction served");

    Ok(Json(PredictResponse { sentiment }))
}

/// POST /validate - Record whether a prediction was correct
pub async fn validate_handler(
    State(state): State<Arc<AppState>>,
    form: FormFields,
) -> Result<impl IntoResponse, ServiceError> {
    let payload = ValidationPayload::parse(form.require("validation")?)?;
    let sender = form.sender();
    let correct = payload.is_correct();

    if let ValidationPayload::Rated(rated) = &payload {
        tracing::debug!(
            prediction = rated.prediction.label(),
            rating = rated.rating.label(),
            review_len = rated.review.as_deref().map_or(0, str::len),
            "Received rated review"
        );
    }

    state.metrics.record_validation(sender, correct).await;
    tracing::info!(sender = sender.unwrap_or("-"), correct, "Validation recorded");

    Ok((StatusCode::OK, "Thank you"))
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ([(CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], state.prometheus.render())
}

/// GET /health - Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        healthy: true,
        service_name: SERVICE_NAME.to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        status: "SERVING".to_string(),
        vocabulary_size: state.model.vocabulary_size(),
        classifier: state.model.classifier_kind().to_string(),
    })
}

/// GET / - Root endpoint
pub async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "POST /predict (form: data, sender?)",
            "POST /validate (form: validation, sender?)",
            "GET /metrics",
            "GET /health"
        ]
    }))
}
