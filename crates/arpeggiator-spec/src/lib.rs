//! Arpeggiator Request Library
//!
//! This crate provides the types shared by the arpeggio engine, the HTTP
//! server, and the CLI: the generation request and its validation, the
//! response bodies, and the error codes used for reporting.
//!
//! # Example
//!
//! ```
//! use arpeggiator_spec::{GenerationRequest, Mood, PatternStyle, RequestLimits};
//! use arpeggiator_spec::validation::validate_request;
//!
//! let request = GenerationRequest {
//!     mood: "calm".to_string(),
//!     pattern_style: "descending".to_string(),
//!     num_bars: 1,
//!     seed: Some(42),
//!     ..GenerationRequest::default()
//! };
//!
//! let params = validate_request(&request, &RequestLimits::default()).unwrap();
//! assert_eq!(params.mood, Mood::Calm);
//! assert_eq!(params.pattern_style, PatternStyle::Descending);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error codes, validation errors, and the backend error trait
//! - [`request`]: Wire request, validated parameters, mood and style enums
//! - [`response`]: Response bodies for every endpoint
//! - [`validation`]: Request validation functions

pub mod error;
pub mod request;
pub mod response;
pub mod validation;

pub use error::{BackendError, ErrorCode, RequestError, ValidationError, ValidationResult};
pub use request::{
    ArpeggioParams, GenerationRequest, Mood, PatternStyle, RequestLimits, DEFAULT_BPM,
    DEFAULT_KEY, DEFAULT_NUM_BARS,
};
pub use response::{
    BannerResponse, ErrorDetail, FieldError, GenerationResponse, HealthResponse, MoodsResponse,
    NoteData, PatternStyleInfo, PatternStylesResponse, ValidationErrorResponse,
};
pub use validation::{is_valid_key, parse_request, validate_request};
