// model-service-rs/src/form.rs
// Form field extraction for multipart and url-encoded request bodies

use axum::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::Form;
use std::collections::HashMap;

use crate::error::ServiceError;

/// Longest sender name kept as a metric label
pub const MAX_SENDER_LENGTH: usize = 64;

/// Text fields of a submitted form. The first value wins for repeated names.
///
/// Bodies that are neither `multipart/form-data` nor
/// `application/x-www-form-urlencoded` yield an empty form, so handlers
/// answer them with their usual missing-field error.
#[derive(Debug, Clone, Default)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn require(&self, name: &'static str) -> Result<&str, ServiceError> {
        self.get(name).ok_or(ServiceError::MissingField(name))
    }

    /// Optional `sender` attribution, trimmed; blank values count as absent.
    pub fn sender(&self) -> Option<&str> {
        let sender = self.get("sender")?.trim();
        if sender.is_empty() {
            return None;
        }
        match sender.char_indices().nth(MAX_SENDER_LENGTH) {
            Some((cut, _)) => Some(&sender[..cut]),
            None => Some(sender),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, name: String, value: String) {
        self.0.entry(name).or_insert(value);
    }
}

/// Body-limit hits keep their 413; every other extraction failure is a bad form.
fn form_error(status: StatusCode, body_text: String) -> ServiceError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ServiceError::PayloadTooLarge
    } else {
        ServiceError::InvalidForm(body_text)
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let mut fields = FormFields::default();

        if content_type.starts_with("multipart/form-data") {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| form_error(e.status(), e.body_text()))?;

            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|e| form_error(e.status(), e.body_text()))?
            {
                // File parts and unnamed parts carry no form value
                if field.file_name().is_some() {
                    continue;
                }
                let Some(name) = field.name().map(str::to_owned) else {
                    continue;
                };
                let value = field
                    .text()
                    .await
                    .map_err(|e| form_error(e.status(), e.body_text()))?;
                fields.insert(name, value);
            }
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| form_error(e.status(), e.body_text()))?;
            for (name, value) in pairs {
                fields.insert(name, value);
            }
        }

        Ok(fields)
    }
}
