//! User feedback payloads for `/validate`
//!
//! The `validation` form field carries JSON in one of two shapes:
//!
//! * a bare boolean, `true` or `false`: whether the prediction shown to the
//!   user was correct;
//! * an object `{"prediction": 0|1, "rating": 0|1, "review": "..."}`: the
//!   label the service returned and the label the user chose. The prediction
//!   counts as correct when the two agree. `review` is optional.
//!
//! Anything else is rejected with a [`ValidationPayloadError`].

use sentiment_model::Sentiment;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Validation error for feedback payloads
#[derive(Debug, Error)]
pub enum ValidationPayloadError {
    #[error("The \"validation\" field is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("The \"validation\" field must be a boolean or an object, got {0}")]
    UnsupportedShape(&'static str),

    #[error("The \"validation\" object is missing or mistypes a field: {0}")]
    InvalidObject(#[source] serde_json::Error),

    #[error("The \"validation\" field \"{field}\" must be 0 or 1, got {value}")]
    InvalidLabel { field: &'static str, value: i64 },
}

#[derive(Debug, Deserialize)]
struct RawRatedReview {
    prediction: i64,
    rating: i64,
    #[serde(default)]
    review: Option<String>,
}

/// A predicted label checked against the user's own rating
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatedReview {
    pub prediction: Sentiment,
    pub rating: Sentiment,
    pub review: Option<String>,
}

/// Decoded `validation` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationPayload {
    Verdict(bool),
    Rated(RatedReview),
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn label(field: &'static str, value: i64) -> Result<Sentiment, ValidationPayloadError> {
    Sentiment::try_from(value).map_err(|_| ValidationPayloadError::InvalidLabel { field, value })
}

impl ValidationPayload {
    /// Decode the raw form value
    pub fn parse(raw: &str) -> Result<Self, ValidationPayloadError> {
        let value: Value =
            serde_json::from_str(raw.trim()).map_err(ValidationPayloadError::Malformed)?;

        match value {
            Value::Bool(correct) => Ok(ValidationPayload::Verdict(correct)),
            Value::Object(_) => {
                let raw: RawRatedReview =
                    serde_json::from_value(value).map_err(ValidationPayloadError::InvalidObject)?;
                Ok(ValidationPayload::Rated(RatedReview {
                    prediction: label("prediction", raw.prediction)?,
                    rating: label("rating", raw.rating)?,
                    review: raw.review,
                }))
            }
            other => Err(ValidationPayloadError::UnsupportedShape(json_kind(&other))),
        }
    }

    /// Whether the user confirmed the prediction
    pub fn is_correct(&self) -> bool {
        match self {
            ValidationPayload::Verdict(correct) => *correct,
            ValidationPayload::Rated(rated) => rated.prediction == rated.rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_boolean() {
        assert_eq!(ValidationPayload::parse("true").unwrap(), ValidationPayload::Verdict(true));
        assert!(!ValidationPayload::parse(" false ").unwrap().is_correct());
    }

    #[test]
    fn test_rated_object() {
        let payload =
            ValidationPayload::parse(r#"{"prediction": 1, "rating": 1, "review": "Loved it"}"#)
                .unwrap();
        assert!(payload.is_correct());

        let payload = ValidationPayload::parse(r#"{"prediction": 1, "rating": 0}"#).unwrap();
        assert!(!payload.is_correct());
        match payload {
            ValidationPayload::Rated(rated) => assert!(rated.review.is_none()),
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn test_rejected_shapes() {
        assert!(matches!(
            ValidationPayload::parse("True"),
            Err(ValidationPayloadError::Malformed(_))
        ));
        assert!(matches!(
            ValidationPayload::parse("1"),
            Err(ValidationPayloadError::UnsupportedShape("a number"))
        ));
        assert!(matches!(
            ValidationPayload::parse(r#"{"rating": 1}"#),
            Err(ValidationPayloadError::InvalidObject(_))
        ));
        assert!(matches!(
            ValidationPayload::parse(r#"{"prediction": 1, "rating": 5}"#),
            Err(ValidationPayloadError::InvalidLabel { field: "rating", value: 5 })
        ));
    }
}
