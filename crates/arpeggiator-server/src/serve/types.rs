//! Transport-independent HTTP response type.

use std::io::Cursor;

use arpeggiator_spec::{ErrorDetail, ValidationError, ValidationErrorResponse};
use serde::Serialize;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_MIDI: &str = "audio/midi";

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";

/// A complete response produced by the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// Headers beyond content type and CORS.
    pub headers: Vec<(&'static str, String)>,
}

impl HttpResponse {
    /// Serializes `value` as a JSON body.
    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::with_body(status, CONTENT_TYPE_JSON, body),
            Err(e) => {
                log::error!("Failed to serialize response: {}", e);
                Self::with_body(
                    500,
                    CONTENT_TYPE_JSON,
                    br#"{"detail":"Failed to serialize response"}"#.to_vec(),
                )
            }
        }
    }

    /// `{"detail": message}` with the given status.
    pub fn error(status: u16, detail: impl Into<String>) -> Self {
        Self::json(status, &ErrorDetail::new(detail))
    }

    /// 422 with one entry per validation error.
    pub fn validation(errors: &[ValidationError]) -> Self {
        Self::json(422, &ValidationErrorResponse::from_errors(errors))
    }

    pub fn method_not_allowed(allowed: &'static str) -> Self {
        Self::error(405, "Method Not Allowed").with_header("Allow", allowed)
    }

    /// 204 answer to a CORS preflight.
    pub fn preflight() -> Self {
        Self::with_body(204, CONTENT_TYPE_JSON, Vec::new())
            .with_header("Access-Control-Allow-Methods", ALLOWED_METHODS)
            .with_header("Access-Control-Allow-Headers", ALLOWED_HEADERS)
    }

    /// A MIDI file download.
    pub fn midi_attachment(bytes: Vec<u8>, filename: &str) -> Self {
        Self::with_body(200, CONTENT_TYPE_MIDI, bytes).with_header(
            "Content-Disposition",
            format!("attachment; filename={}", filename),
        )
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Value of an extra header, if set.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parses the body as JSON.
    pub fn body_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_slice(&self.body)
    }

    /// Converts to a tiny_http response carrying content type and CORS headers.
    pub fn into_tiny_http(self) -> tiny_http::Response<Cursor<Vec<u8>>> {
        let mut response = tiny_http::Response::from_data(self.body).with_status_code(self.status);
        let fixed = [
            ("Content-Type", self.content_type.to_string()),
            ("Access-Control-Allow-Origin", "*".to_string()),
        ];
        for (name, value) in fixed.into_iter().chain(self.headers) {
            match tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                Ok(header) => response.add_header(header),
                Err(()) => log::warn!("Dropping invalid header {}: {:?}", name, value),
            }
        }
        response
    }

    fn with_body(status: u16, content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
            headers: Vec::new(),
        }
    }
}
