//! # Content Negotiation
//!
//! Inbound bodies are tagged with the format their `Content-Type` declares;
//! outbound bodies use the format the `Accept` header asks for.

use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::HeaderMap;

/// Response serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireFormat {
    #[default]
    Json,
    Xml,
}

impl WireFormat {
    /// Pick the response format from the request's `Accept` header.
    ///
    /// Any XML media range selects XML. Everything else, including a
    /// missing header or `*/*`, falls back to JSON.
    pub fn from_accept(headers: &HeaderMap) -> Self {
        let accepts_xml = headers
            .get_all(ACCEPT)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .any(|range| is_xml_media_type(&media_type(range)));

        if accepts_xml {
            WireFormat::Xml
        } else {
            WireFormat::Json
        }
    }

    /// `Content-Type` value for bodies in this format
    pub fn content_type(&self) -> &'static str {
        match self {
            WireFormat::Json => "application/json",
            WireFormat::Xml => "application/xml; charset=utf-8",
        }
    }
}

/// Format an inbound body was declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Json,
    Xml,
    /// Missing or unrecognized content type; the body is not normalized
    Other,
}

impl BodyFormat {
    /// Classify the request's `Content-Type` header
    pub fn from_content_type(headers: &HeaderMap) -> Self {
        let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
            return BodyFormat::Other;
        };

        let mime = media_type(value);
        if is_xml_media_type(&mime) {
            BodyFormat::Xml
        } else if mime == "application/json" || mime.ends_with("+json") {
            BodyFormat::Json
        } else {
            BodyFormat::Other
        }
    }
}

/// Lowercased `type/subtype` with parameters stripped
fn media_type(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn is_xml_media_type(mime: &str) -> bool {
    mime == "application/xml" || mime == "text/xml" || mime.ends_with("+xml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(name: axum::http::HeaderName, value: &'static str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(name, HeaderValue::from_static(value));
        map
    }

    #[test]
    fn test_accept_defaults_to_json() {
        assert_eq!(WireFormat::from_accept(&HeaderMap::new()), WireFormat::Json);
        assert_eq!(WireFormat::from_accept(&headers(ACCEPT, "*/*")), WireFormat::Json);
        assert_eq!(
            WireFormat::from_accept(&headers(ACCEPT, "application/json")),
            WireFormat::Json
        );
    }

    #[test]
    fn test_accept_selects_xml() {
        assert_eq!(
            WireFormat::from_accept(&headers(ACCEPT, "application/xml")),
            WireFormat::Xml
        );
        assert_eq!(
            WireFormat::from_accept(&headers(ACCEPT, "text/html, text/xml;q=0.9")),
            WireFormat::Xml
        );
        assert_eq!(
            WireFormat::from_accept(&headers(ACCEPT, "application/atom+xml")),
            WireFormat::Xml
        );
    }

    #[test]
    fn test_content_type_classification() {
        assert_eq!(
            BodyFormat::from_content_type(&headers(CONTENT_TYPE, "application/json; charset=utf-8")),
            BodyFormat::Json
        );
        assert_eq!(
            BodyFormat::from_content_type(&headers(CONTENT_TYPE, "Text/XML")),
            BodyFormat::Xml
        );
        assert_eq!(
            BodyFormat::from_content_type(&headers(CONTENT_TYPE, "text/plain")),
            BodyFormat::Other
        );
        assert_eq!(BodyFormat::from_content_type(&HeaderMap::new()), BodyFormat::Other);
    }
}
