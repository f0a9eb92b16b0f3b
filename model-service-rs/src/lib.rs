//! Model Service
//!
//! HTTP front end for the sentiment model: `/predict` classifies a review,
//! `/validate` collects user feedback on predictions and `/metrics` exposes
//! the resulting counters.

use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use sentiment_model::ModelInterface;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod form;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod validation;

pub use config::ModelServiceConfig;
pub use error::ServiceError;
pub use crate::metrics::{MetricsSnapshot, ServiceMetrics};
pub use validation::{ValidationPayload, ValidationPayloadError};

/// Maximum accepted request body (1MB)
pub const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Shared application state
///
/// The model is loaded before the router exists and never changes; the
/// metrics registry is the only mutable part.
pub struct AppState {
    pub model: Arc<ModelInterface>,
    pub metrics: ServiceMetrics,
    /// Renders the process-wide Prometheus recorder for `/metrics`
    pub prometheus: PrometheusHandle,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(model: Arc<ModelInterface>, prometheus: PrometheusHandle) -> Self {
        Self {
            model,
            metrics: ServiceMetrics::new(),
            prometheus,
            started_at: Instant::now(),
        }
    }
}

/// Build the service router with its middleware stack
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root_handler))
        .route("/health", get(handlers::health_handler))
        .route("/predict", post(handlers::predict_handler))
        .route("/validate", post(handlers::validate_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
