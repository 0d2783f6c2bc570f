//! # Canonical Records
//!
//! Between the wire and the validator every payload is a format-agnostic
//! key/value record, tagged with the format it arrived in.

use serde_json::{Map, Value};

use super::errors::{ApiError, ApiResult};
use super::format::BodyFormat;
use super::xml;

/// Format-agnostic key/value record
pub type Record = Map<String, Value>;

/// Name of the optional envelope element wrapping a store payload
pub const STORE_ENVELOPE: &str = "store";

/// A normalized request body
#[derive(Debug, Clone, PartialEq)]
pub struct InboundPayload {
    /// Format the body was declared in
    pub format: BodyFormat,
    pub record: Record,
}

impl InboundPayload {
    /// Normalize a raw request body according to its declared format.
    ///
    /// Bodies of an unrecognized content type are not parsed and yield an
    /// empty record. An empty body is an empty record in every format.
    pub fn normalize(format: BodyFormat, body: &[u8]) -> ApiResult<Self> {
        let record = match format {
            BodyFormat::Xml => {
                xml::parse_bytes(body).map_err(|e| ApiError::InvalidPayload(e.to_string()))?
            }
            BodyFormat::Json => parse_json(body)?,
            BodyFormat::Other => Map::new(),
        };

        Ok(Self { format, record })
    }

    /// The record fields should be read from, after the envelope unwrap
    pub fn fields(&self) -> &Record {
        unwrap_store_envelope(&self.record)
    }
}

fn parse_json(body: &[u8]) -> ApiResult<Record> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(_) => Err(ApiError::InvalidPayload(
            "JSON body must be an object".to_string(),
        )),
        Err(e) => Err(ApiError::InvalidPayload(e.to_string())),
    }
}

/// Read fields from a nested `store` record when the payload carries one.
///
/// This is the only place the envelope is recognized.
pub fn unwrap_store_envelope(record: &Record) -> &Record {
    match record.get(STORE_ENVELOPE) {
        Some(Value::Object(inner)) => inner,
        _ => record,
    }
}

/// Text form of a scalar value, `None` for null.
///
/// Compound values have no text form and are returned as their JSON text.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_json() {
        let payload =
            InboundPayload::normalize(BodyFormat::Json, br#"{"name":"Acme","phone":null}"#).unwrap();
        assert_eq!(payload.format, BodyFormat::Json);
        assert_eq!(payload.record["name"], "Acme");
        assert_eq!(payload.record["phone"], Value::Null);
    }

    #[test]
    fn test_normalize_xml() {
        let payload = InboundPayload::normalize(
            BodyFormat::Xml,
            b"<store><name>Acme</name><address>1 Main St</address></store>",
        )
        .unwrap();
        assert_eq!(payload.format, BodyFormat::Xml);
        assert_eq!(
            Value::Object(payload.record),
            json!({"name": "Acme", "address": "1 Main St"})
        );
    }

    #[test]
    fn test_normalize_other_skips_body() {
        let payload = InboundPayload::normalize(BodyFormat::Other, b"name=Acme").unwrap();
        assert!(payload.record.is_empty());
    }

    #[test]
    fn test_empty_bodies() {
        for format in [BodyFormat::Json, BodyFormat::Xml] {
            let payload = InboundPayload::normalize(format, b"   ").unwrap();
            assert!(payload.record.is_empty());
        }
    }

    #[test]
    fn test_invalid_payloads_carry_detail() {
        let err = InboundPayload::normalize(BodyFormat::Xml, b"<store><name>").unwrap_err();
        match err {
            ApiError::InvalidPayload(detail) => assert!(!detail.is_empty()),
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(matches!(
            InboundPayload::normalize(BodyFormat::Json, b"{nope"),
            Err(ApiError::InvalidPayload(_))
        ));
        assert!(matches!(
            InboundPayload::normalize(BodyFormat::Json, b"[1,2]"),
            Err(ApiError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_envelope_unwrap() {
        let wrapped = InboundPayload::normalize(
            BodyFormat::Xml,
            b"<request><store><phone>555</phone></store></request>",
        )
        .unwrap();
        assert_eq!(wrapped.fields()["phone"], "555");

        let bare = InboundPayload::normalize(BodyFormat::Json, br#"{"phone":"555"}"#).unwrap();
        assert_eq!(bare.fields()["phone"], "555");

        // a scalar named `store` is an ordinary field
        let scalar = InboundPayload::normalize(BodyFormat::Json, br#"{"store":"x"}"#).unwrap();
        assert_eq!(scalar.fields()["store"], "x");
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&json!(1)), Some("1".to_string()));
        assert_eq!(scalar_text(&json!("a")), Some("a".to_string()));
        assert_eq!(scalar_text(&json!(true)), Some("true".to_string()));
        assert_eq!(scalar_text(&Value::Null), None);
    }
}
