//! Response bodies returned by the HTTP API.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::request::{Mood, PatternStyle};

/// A single rendered note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteData {
    /// MIDI pitch number (0-127)
    pub pitch: u8,
    /// Start time in seconds
    pub start_time: f64,
    /// End time in seconds
    pub end_time: f64,
    /// Note velocity (0-127)
    pub velocity: u8,
}

/// Body of a successful `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub notes: Vec<NoteData>,
    pub midi_base64: String,
    pub tempo: u16,
    pub key: String,
    pub mood: String,
    /// Seconds from the first note-on to the last note-off.
    pub duration: f64,
    pub pattern_description: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub version: String,
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerResponse {
    pub message: String,
    pub version: String,
    pub docs: String,
    pub status: String,
}

/// Body of `GET /api/moods`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodsResponse {
    pub moods: Vec<String>,
    pub default: String,
}

impl MoodsResponse {
    /// Lists every mood preset.
    pub fn all() -> Self {
        Self {
            moods: Mood::ALL.iter().map(|m| m.as_str().to_string()).collect(),
            default: Mood::DEFAULT.as_str().to_string(),
        }
    }
}

/// One entry of `GET /api/pattern-styles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternStyleInfo {
    pub value: String,
    pub label: String,
    pub description: String,
}

/// Body of `GET /api/pattern-styles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternStylesResponse {
    pub styles: Vec<PatternStyleInfo>,
    pub default: String,
}

impl PatternStylesResponse {
    /// Lists every pattern style with its label and description.
    pub fn all() -> Self {
        Self {
            styles: PatternStyle::ALL
                .iter()
                .map(|s| PatternStyleInfo {
                    value: s.as_str().to_string(),
                    label: s.label().to_string(),
                    description: s.description().to_string(),
                })
                .collect(),
            default: PatternStyle::DEFAULT.as_str().to_string(),
        }
    }
}

/// Error body with a single message (503, 500, 404).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// One entry of a validation error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Stable error code (e.g., "E003")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Request field that failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<&ValidationError> for FieldError {
    fn from(err: &ValidationError) -> Self {
        Self {
            code: err.code.code().to_string(),
            message: err.message.clone(),
            field: err.path.clone(),
        }
    }
}

/// Error body for rejected requests (422).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub detail: Vec<FieldError>,
}

impl ValidationErrorResponse {
    pub fn from_errors(errors: &[ValidationError]) -> Self {
        Self {
            detail: errors.iter().map(FieldError::from).collect(),
        }
    }
}
