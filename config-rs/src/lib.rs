//! config-rs/lib.rs
//! Shared configuration utilities for consistent service configuration
//! Provides standardized functions for port, address and artifact path lookup

use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

/// Outcome of a `.env` lookup
///
/// Loading happens before any logger exists, so the outcome is returned and
/// reported later through [`DotenvStatus::log`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotenvStatus {
    Loaded(PathBuf),
    NotFound,
    Unreadable(String),
}

impl DotenvStatus {
    fn from_result(result: dotenv::Result<PathBuf>) -> Self {
        match result {
            Ok(path) => DotenvStatus::Loaded(path),
            Err(err) if err.not_found() => DotenvStatus::NotFound,
            Err(err) => DotenvStatus::Unreadable(err.to_string()),
        }
    }

    /// Report the outcome through `log`
    pub fn log(&self) {
        match self {
            DotenvStatus::Loaded(path) => log::info!("Loaded environment from {}", path.display()),
            DotenvStatus::NotFound => log::debug!("No .env file found"),
            DotenvStatus::Unreadable(err) => log::warn!("Ignoring unreadable .env file: {}", err),
        }
    }
}

/// Load variables from a `.env` file in the working directory or its parents.
///
/// Values already set in the process environment win over the file.
pub fn load_dotenv() -> DotenvStatus {
    DotenvStatus::from_result(dotenv::dotenv())
}

/// Load variables from a specific `.env` file
pub fn load_dotenv_from<P: AsRef<Path>>(path: P) -> DotenvStatus {
    let path = path.as_ref();
    DotenvStatus::from_result(dotenv::from_path(path).map(|()| path.to_path_buf()))
}

/// Environment variable prefix for a service, e.g. "model-service" -> "MODEL_SERVICE"
pub fn env_prefix(service_name: &str) -> String {
    service_name.replace('-', "_").to_uppercase()
}

/// Get service port from environment variables with proper fallback
///
/// # Arguments
/// * `service_name` - The name of the service (e.g., "MODEL_SERVICE")
/// * `default_port` - The default port to use if not specified in environment
///
/// # Returns
/// The port number to use for the service
pub fn get_service_port(service_name: &str, default_port: u16) -> u16 {
    let var_name = format!("{}_PORT", env_prefix(service_name));
    match env::var(&var_name) {
        Ok(value) => value.parse::<u16>().unwrap_or_else(|_| {
            log::warn!("Invalid port in {}, using default {}", var_name, default_port);
            default_port
        }),
        Err(_) => default_port,
    }
}

/// Create a SocketAddr for binding a service
///
/// A full `<SERVICE>_ADDR` override (plain `host:port` or `http://host:port`)
/// wins over the port lookup. Otherwise the service binds every interface.
pub fn get_bind_address(service_name: &str, default_port: u16) -> SocketAddr {
    let var_name = format!("{}_ADDR", env_prefix(service_name));

    if let Ok(addr_str) = env::var(&var_name) {
        let trimmed = addr_str
            .strip_prefix("http://")
            .or_else(|| addr_str.strip_prefix("https://"))
            .unwrap_or(&addr_str);

        match trimmed.parse::<SocketAddr>() {
            Ok(addr) => return addr,
            Err(_) => log::warn!("Invalid address format in {}, using default", var_name),
        }
    }

    let port = get_service_port(service_name, default_port);
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))
}

/// Get a filesystem path setting, e.g. `MODEL_SERVICE_VECTORIZER_PATH`
///
/// # Arguments
/// * `service_name` - The name of the service
/// * `key` - The setting name (e.g., "vectorizer_path")
/// * `default_path` - Path used when the variable is unset or empty
pub fn get_path(service_name: &str, key: &str, default_path: &str) -> PathBuf {
    let var_name = format!("{}_{}", env_prefix(service_name), key.to_uppercase());
    match env::var(&var_name) {
        Ok(value) if !value.trim().is_empty() => PathBuf::from(value.trim()),
        _ => PathBuf::from(default_path),
    }
}

/// Get a plain string setting with a fallback
pub fn get_string(var_name: &str, default_value: &str) -> String {
    env::var(var_name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default_value.to_string())
}

/// Per-service view over the lookups above
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    service_name: String,
}

impl ServiceConfig {
    pub fn new(service_name: &str) -> Self {
        Self {
            service_name: service_name.to_string(),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn get_service_port(&self, default_port: u16) -> u16 {
        get_service_port(&self.service_name, default_port)
    }

    pub fn get_bind_address(&self, default_port: u16) -> SocketAddr {
        get_bind_address(&self.service_name, default_port)
    }

    pub fn get_path(&self, key: &str, default_path: &str) -> PathBuf {
        get_path(&self.service_name, key, default_path)
    }
}
