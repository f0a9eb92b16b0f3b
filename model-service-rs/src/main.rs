// model-service-rs/src/main.rs
// Sentiment model service - HTTP entry point
//
// Loads the vectorizer and classifier artifacts once, then serves
// /predict, /validate and /metrics until interrupted.

use anyhow::Context;
use model_service::logging::init_logging;
use model_service::metrics::install_recorder;
use model_service::{router, AppState, ModelServiceConfig};
use sentiment_model::ModelInterface;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = config_rs::load_dotenv();
    let config = ModelServiceConfig::from_env();

    init_logging(&config.logging).context("Failed to initialize logging")?;
    dotenv.log();

    // Missing or corrupt artifacts are fatal; there is no fallback model
    let model = ModelInterface::load(&config.vectorizer_path, &config.classifier_path)
        .with_context(|| {
            format!(
                "Failed to load model artifacts ({}, {})",
                config.vectorizer_path.display(),
                config.classifier_path.display()
            )
        })?;

    let prometheus = install_recorder().context("Failed to install Prometheus recorder")?;

    let state = Arc::new(AppState::new(Arc::new(model), prometheus));
    let app = router(state);

    let listener = TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;

    tracing::info!(addr = %config.bind_address, "Model service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Model service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
