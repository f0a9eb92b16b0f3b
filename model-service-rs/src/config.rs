// model-service-rs/src/config.rs
// Startup configuration resolved from the environment (and .env) via config-rs

use config_rs::ServiceConfig;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::logging::LoggingConfig;

pub const SERVICE_NAME: &str = "model-service";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_VECTORIZER_PATH: &str = "models/bow_vectorizer.json";
pub const DEFAULT_CLASSIFIER_PATH: &str = "models/classifier.json";

#[derive(Debug, Clone)]
pub struct ModelServiceConfig {
    pub bind_address: SocketAddr,
    pub vectorizer_path: PathBuf,
    pub classifier_path: PathBuf,
    pub logging: LoggingConfig,
}

impl ModelServiceConfig {
    /// Resolve every setting; call `config_rs::load_dotenv` first to honour `.env`.
    ///
    /// * `MODEL_SERVICE_PORT` / `MODEL_SERVICE_ADDR`
    /// * `MODEL_SERVICE_VECTORIZER_PATH` / `MODEL_SERVICE_CLASSIFIER_PATH`
    /// * `LOG_LEVEL` / `LOG_FORMAT` (`text` or `json`)
    pub fn from_env() -> Self {
        let service = ServiceConfig::new(SERVICE_NAME);

        let logging = LoggingConfig {
            level: config_rs::get_string("LOG_LEVEL", "info"),
            service_name: SERVICE_NAME.to_string(),
            json_format: config_rs::get_string("LOG_FORMAT", "text").eq_ignore_ascii_case("json"),
        };

        Self {
            bind_address: service.get_bind_address(DEFAULT_PORT),
            vectorizer_path: service.get_path("vectorizer_path", DEFAULT_VECTORIZER_PATH),
            classifier_path: service.get_path("classifier_path", DEFAULT_CLASSIFIER_PATH),
            logging,
        }
    }
}
