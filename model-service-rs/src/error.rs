use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sentiment_model::ModelError;
use thiserror::Error;

use crate::validation::ValidationPayloadError;

/// Request-level failures. Every variant renders as a plain-text body.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("The request should be form data with a key called \"{0}\".")]
    MissingField(&'static str),

    #[error("Invalid form data: {0}")]
    InvalidForm(String),

    #[error("Request body is too large")]
    PayloadTooLarge,

    #[error(transparent)]
    InvalidValidation(#[from] ValidationPayloadError),

    #[error("Prediction failed: {0}")]
    Model(#[from] ModelError),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::MissingField(_)
            | ServiceError::InvalidForm(_)
            | ServiceError::InvalidValidation(_) => StatusCode::BAD_REQUEST,
            ServiceError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ServiceError::Model(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Rejected request");
        }
        (status, self.to_string()).into_response()
    }
}
