//! # Response Formatting
//!
//! Turns canonical values into JSON or XML bodies according to the
//! negotiated format.

use std::sync::Arc;

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ApiError;
use super::format::WireFormat;
use super::xml::{self, XmlError};

/// Root element naming for XML responses.
///
/// Sequences use `sequence` (items named `sequence_item`), records that
/// carry `identity_field` use `identified`, anything else uses `fallback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlRootPolicy {
    #[serde(default = "default_sequence")]
    pub sequence: String,

    #[serde(default = "default_sequence_item")]
    pub sequence_item: String,

    #[serde(default = "default_identified")]
    pub identified: String,

    #[serde(default = "default_identity_field")]
    pub identity_field: String,

    #[serde(default = "default_fallback")]
    pub fallback: String,
}

fn default_sequence() -> String {
    "stores".to_string()
}

fn default_sequence_item() -> String {
    "store".to_string()
}

fn default_identified() -> String {
    "store".to_string()
}

fn default_identity_field() -> String {
    "id".to_string()
}

fn default_fallback() -> String {
    "response".to_string()
}

impl Default for XmlRootPolicy {
    fn default() -> Self {
        Self {
            sequence: default_sequence(),
            sequence_item: default_sequence_item(),
            identified: default_identified(),
            identity_field: default_identity_field(),
            fallback: default_fallback(),
        }
    }
}

impl XmlRootPolicy {
    /// Root element name for a payload
    pub fn root_for(&self, value: &Value) -> &str {
        match value {
            Value::Array(_) => &self.sequence,
            Value::Object(fields) if fields.contains_key(&self.identity_field) => &self.identified,
            _ => &self.fallback,
        }
    }

    /// Render a payload as an XML document
    pub fn render(&self, value: &Value) -> Result<String, XmlError> {
        xml::write_document(self.root_for(value), &self.sequence_item, value)
    }
}

/// Writes responses in one negotiated format
#[derive(Debug, Clone)]
pub struct Responder {
    format: WireFormat,
    policy: Arc<XmlRootPolicy>,
}

impl Responder {
    pub fn new(format: WireFormat, policy: Arc<XmlRootPolicy>) -> Self {
        Self { format, policy }
    }

    /// Serialize a successful payload
    pub fn ok<T: Serialize>(&self, status: StatusCode, payload: &T) -> Response {
        match serde_json::to_value(payload) {
            Ok(value) => self.value(status, value),
            Err(e) => self.error(ApiError::Internal(format!("response serialization: {}", e))),
        }
    }

    /// Render an error in the negotiated format
    pub fn error(&self, err: ApiError) -> Response {
        err.log();
        self.value(err.status_code(), err.body())
    }

    /// Convenience for handlers returning `ApiResult`
    pub fn result<T: Serialize>(&self, status: StatusCode, result: Result<T, ApiError>) -> Response {
        match result {
            Ok(payload) => self.ok(status, &payload),
            Err(err) => self.error(err),
        }
    }

    fn value(&self, status: StatusCode, value: Value) -> Response {
        match self.format {
            WireFormat::Json => (status, Json(value)).into_response(),
            WireFormat::Xml => match self.policy.render(&value) {
                Ok(body) => (status, [(CONTENT_TYPE, self.format.content_type())], body)
                    .into_response(),
                Err(e) => {
                    let err = ApiError::Internal(format!("XML rendering: {}", e));
                    err.log();
                    (err.status_code(), Json(err.body())).into_response()
                }
            },
        }
    }
}

/// Plain message payload, e.g. delete confirmations
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
