//! The uniform success/failure wrapper used by every backend call.
//!
//! On the wire the envelope is a flag plus an optional payload:
//! `{"success": true, "data": ...}` or
//! `{"success": false, "error": {"message": ..., "code": ...}}`.
//! [`Envelope`] turns that into a sum type so the payload can only be
//! reached after matching on the variant.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::types::null_as_empty;

/// Structured failure detail sent by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            code: Some(code.into()),
        }
    }
}

/// Errors while reading an envelope out of a response body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    #[error("response body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("response body is not a JSON object")]
    NotAnObject,

    #[error("response envelope has no boolean 'success' flag")]
    MissingSuccessFlag,

    #[error("successful response envelope has no 'data' payload")]
    MissingData,

    #[error("response payload has an unexpected shape: {0}")]
    InvalidData(String),
}

/// Success or failure of one backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope<T> {
    Success(T),
    Failure(ApiError),
}

impl<T> Envelope<T> {
    /// Build a failure envelope with a message and machine-readable code.
    pub fn failure(message: impl Into<String>, code: impl Into<String>) -> Self {
        Envelope::Failure(ApiError::new(message, code))
    }

    /// Transform the success payload, leaving failures untouched.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Envelope<U> {
        match self {
            Envelope::Success(data) => Envelope::Success(f(data)),
            Envelope::Failure(err) => Envelope::Failure(err),
        }
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Parse an envelope from a JSON value.
    ///
    /// A failure envelope without an `error` object is accepted and
    /// yields an empty [`ApiError`]; callers supply their own fallback
    /// text for empty messages.
    pub fn from_value(value: serde_json::Value) -> Result<Self, EnvelopeError> {
        let serde_json::Value::Object(mut obj) = value else {
            return Err(EnvelopeError::NotAnObject);
        };

        let success = obj
            .get("success")
            .and_then(|v| v.as_bool())
            .ok_or(EnvelopeError::MissingSuccessFlag)?;

        if success {
            let data = match obj.remove("data") {
                Some(serde_json::Value::Null) | None => return Err(EnvelopeError::MissingData),
                Some(data) => data,
            };
            let payload = serde_json::from_value(data)
                .map_err(|e| EnvelopeError::InvalidData(e.to_string()))?;
            Ok(Envelope::Success(payload))
        } else {
            let error = match obj.remove("error") {
                Some(serde_json::Value::Null) | None => ApiError::default(),
                Some(err) => serde_json::from_value(err)
                    .map_err(|e| EnvelopeError::InvalidData(e.to_string()))?,
            };
            Ok(Envelope::Failure(error))
        }
    }

    /// Parse an envelope from a raw response body.
    pub fn from_body(body: &str) -> Result<Self, EnvelopeError> {
        let value: serde_json::Value =
            serde_json::from_str(body).map_err(|e| EnvelopeError::InvalidJson(e.to_string()))?;
        Self::from_value(value)
    }
}
