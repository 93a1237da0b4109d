//! Request validation logic.
//!
//! Validation is all-or-nothing: every field is checked, all violations are
//! collected, and a request with any violation is rejected as a whole.

#[cfg(test)]
mod tests;

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ErrorCode, RequestError, ValidationError, ValidationResult};
use crate::request::{ArpeggioParams, GenerationRequest, Mood, PatternStyle, RequestLimits};

/// Regex pattern for a valid key: note letter with an optional sharp or flat.
pub const KEY_PATTERN: &str = r"^[A-G](#|b)?$";

static KEY_REGEX: OnceLock<Regex> = OnceLock::new();

fn key_regex() -> &'static Regex {
    KEY_REGEX.get_or_init(|| Regex::new(KEY_PATTERN).expect("invalid regex pattern"))
}

/// Returns true if `key` is an accepted key name.
///
/// # Example
/// ```
/// use arpeggiator_spec::validation::is_valid_key;
///
/// assert!(is_valid_key("F#"));
/// assert!(is_valid_key("Bb"));
/// assert!(!is_valid_key("H"));
/// assert!(!is_valid_key("c"));
/// ```
pub fn is_valid_key(key: &str) -> bool {
    key_regex().is_match(key)
}

/// Parses a JSON request body and validates it.
///
/// An empty (or whitespace-only) body is treated as `{}`, so every field
/// takes its default.
pub fn parse_request(body: &[u8], limits: &RequestLimits) -> Result<ArpeggioParams, RequestError> {
    let request: GenerationRequest = if body.iter().all(u8::is_ascii_whitespace) {
        GenerationRequest::default()
    } else {
        serde_json::from_slice(body)?
    };
    validate_request(&request, limits).map_err(RequestError::Invalid)
}

/// Validates a request against the given limits.
///
/// # Returns
/// * `Ok(ArpeggioParams)` if every field is valid
/// * `Err(errors)` listing every violation otherwise
pub fn validate_request(
    request: &GenerationRequest,
    limits: &RequestLimits,
) -> Result<ArpeggioParams, Vec<ValidationError>> {
    let mut result = ValidationResult::default();

    validate_key(&request.key, &mut result);
    let mood = validate_mood(&request.mood, &mut result);
    let bpm = validate_bpm(request.bpm, limits, &mut result);
    let num_bars = validate_num_bars(request.num_bars, limits, &mut result);
    let pattern_style = validate_pattern_style(&request.pattern_style, &mut result);

    match (mood, bpm, num_bars, pattern_style) {
        (Some(mood), Some(bpm), Some(num_bars), Some(pattern_style)) if result.is_ok() => {
            Ok(ArpeggioParams {
                key: request.key.clone(),
                mood,
                bpm,
                num_bars,
                pattern_style,
                seed: request.seed,
            })
        }
        _ => Err(result.errors),
    }
}

fn validate_key(key: &str, result: &mut ValidationResult) {
    if !is_valid_key(key) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidKey,
            format!("key must match pattern '{}', got '{}'", KEY_PATTERN, key),
            "key",
        ));
    }
}

fn validate_mood(name: &str, result: &mut ValidationResult) -> Option<Mood> {
    let mood = Mood::from_name(name);
    if mood.is_none() {
        let allowed: Vec<&str> = Mood::ALL.iter().map(|m| m.as_str()).collect();
        result.add_error(ValidationError::with_path(
            ErrorCode::UnknownMood,
            format!("mood must be one of [{}], got '{}'", allowed.join(", "), name),
            "mood",
        ));
    }
    mood
}

fn validate_bpm(bpm: i64, limits: &RequestLimits, result: &mut ValidationResult) -> Option<u16> {
    let (min, max) = (i64::from(limits.min_bpm), i64::from(limits.max_bpm));
    if (min..=max).contains(&bpm) {
        u16::try_from(bpm).ok()
    } else {
        result.add_error(ValidationError::with_path(
            ErrorCode::BpmOutOfRange,
            format!("bpm must be in [{}, {}], got {}", min, max, bpm),
            "bpm",
        ));
        None
    }
}

fn validate_num_bars(
    num_bars: i64,
    limits: &RequestLimits,
    result: &mut ValidationResult,
) -> Option<u8> {
    let (min, max) = (i64::from(limits.min_bars), i64::from(limits.max_bars));
    if (min..=max).contains(&num_bars) {
        u8::try_from(num_bars).ok()
    } else {
        result.add_error(ValidationError::with_path(
            ErrorCode::BarsOutOfRange,
            format!("num_bars must be in [{}, {}], got {}", min, max, num_bars),
            "num_bars",
        ));
        None
    }
}

fn validate_pattern_style(name: &str, result: &mut ValidationResult) -> Option<PatternStyle> {
    let style = PatternStyle::from_name(name);
    if style.is_none() {
        let allowed: Vec<&str> = PatternStyle::ALL.iter().map(|s| s.as_str()).collect();
        result.add_error(ValidationError::with_path(
            ErrorCode::UnknownPatternStyle,
            format!(
                "pattern_style must be one of [{}], got '{}'",
                allowed.join(", "),
                name
            ),
            "pattern_style",
        ));
    }
    style
}
