//! Error types for request validation and generation backends.

use thiserror::Error;

/// Error codes for request validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// E001: Key does not match `^[A-G](#|b)?$`
    InvalidKey,
    /// E002: Mood is not one of the eight presets
    UnknownMood,
    /// E003: Tempo outside the configured BPM bounds
    BpmOutOfRange,
    /// E004: Bar count outside the configured bounds
    BarsOutOfRange,
    /// E005: Pattern style is not one of the five styles
    UnknownPatternStyle,
    /// E006: Request body is not a JSON object of the expected shape
    MalformedRequest,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::InvalidKey => "E001",
            ErrorCode::UnknownMood => "E002",
            ErrorCode::BpmOutOfRange => "E003",
            ErrorCode::BarsOutOfRange => "E004",
            ErrorCode::UnknownPatternStyle => "E005",
            ErrorCode::MalformedRequest => "E006",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and optional field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Request field that failed (e.g., "bpm").
    pub path: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation error attached to a request field.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// Result of request validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of validation errors. Empty means the request is accepted.
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Adds an error to the result.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Top-level error type for request parsing.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The body could not be parsed into a request.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The request parsed but failed validation.
    #[error("request validation failed with {} error(s)", .0.len())]
    Invalid(Vec<ValidationError>),
}

impl RequestError {
    /// Flattens the error into the individual validation errors it carries.
    pub fn into_validation_errors(self) -> Vec<ValidationError> {
        match self {
            RequestError::JsonParse(e) => vec![ValidationError::with_path(
                ErrorCode::MalformedRequest,
                format!("Invalid request JSON: {}", e),
                "body",
            )],
            RequestError::Invalid(errors) => errors,
        }
    }
}

/// Common trait for backend errors.
///
/// Every non-validation error type in the workspace implements this so the
/// HTTP layer and the CLI can report a stable code alongside the message.
pub trait BackendError: std::error::Error {
    /// Stable error code such as "MIDI_001".
    fn code(&self) -> &'static str;

    /// Human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Error category for grouping related errors ("midi", "model", ...).
    fn category(&self) -> &'static str;
}
