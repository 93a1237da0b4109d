//! Tests for request validation.

use pretty_assertions::assert_eq;

use super::*;

fn request() -> GenerationRequest {
    GenerationRequest::default()
}

#[test]
fn test_defaults_validate() {
    let params = validate_request(&request(), &RequestLimits::default()).unwrap();
    assert_eq!(params.key, "C");
    assert_eq!(params.mood, Mood::Happy);
    assert_eq!(params.bpm, 120);
    assert_eq!(params.num_bars, 2);
    assert_eq!(params.pattern_style, PatternStyle::AiGenerated);
    assert_eq!(params.seed, None);
}

#[test]
fn test_key_pattern() {
    for key in ["C", "C#", "Db", "E", "Fb", "B#", "Ab", "G"] {
        assert!(is_valid_key(key), "{key} should be accepted");
    }
    for key in ["", "H", "c", "C##", "Cb#", "C4", "Bbb", " C", "C "] {
        assert!(!is_valid_key(key), "{key:?} should be rejected");
    }
}

#[test]
fn test_bpm_bounds_are_inclusive() {
    let limits = RequestLimits::default();
    for (bpm, ok) in [(39, false), (40, true), (240, true), (241, false), (-1, false)] {
        let req = GenerationRequest { bpm, ..request() };
        assert_eq!(validate_request(&req, &limits).is_ok(), ok, "bpm={bpm}");
    }
}

#[test]
fn test_bar_bounds_are_inclusive() {
    let limits = RequestLimits::default();
    for (num_bars, ok) in [(0, false), (1, true), (8, true), (9, false)] {
        let req = GenerationRequest {
            num_bars,
            ..request()
        };
        assert_eq!(validate_request(&req, &limits).is_ok(), ok, "bars={num_bars}");
    }
}

#[test]
fn test_custom_limits() {
    let limits = RequestLimits {
        min_bpm: 60,
        max_bpm: 90,
        min_bars: 2,
        max_bars: 3,
    };
    let req = GenerationRequest {
        bpm: 120,
        num_bars: 1,
        ..request()
    };
    let errors = validate_request(&req, &limits).unwrap_err();
    let codes: Vec<ErrorCode> = errors.iter().map(|e| e.code).collect();
    assert_eq!(codes, vec![ErrorCode::BpmOutOfRange, ErrorCode::BarsOutOfRange]);
}

#[test]
fn test_all_violations_reported_together() {
    let req = GenerationRequest {
        key: "X".to_string(),
        mood: "jazzy".to_string(),
        bpm: 10,
        num_bars: 100,
        pattern_style: "spiral".to_string(),
        seed: Some(1),
    };
    let errors = validate_request(&req, &RequestLimits::default()).unwrap_err();
    let paths: Vec<Option<&str>> = errors.iter().map(|e| e.path.as_deref()).collect();
    assert_eq!(
        paths,
        vec![
            Some("key"),
            Some("mood"),
            Some("bpm"),
            Some("num_bars"),
            Some("pattern_style")
        ]
    );
}

#[test]
fn test_parse_request_empty_body_uses_defaults() {
    let params = parse_request(b"  ", &RequestLimits::default()).unwrap();
    assert_eq!(params.mood, Mood::Happy);
}

#[test]
fn test_parse_request_full_body() {
    let body = br#"{"key":"A","mood":"dark","bpm":90,"num_bars":2,"pattern_style":"descending","seed":-7}"#;
    let params = parse_request(body, &RequestLimits::default()).unwrap();
    assert_eq!(params.key, "A");
    assert_eq!(params.mood, Mood::Dark);
    assert_eq!(params.pattern_style, PatternStyle::Descending);
    assert_eq!(params.seed, Some(-7));
}

#[test]
fn test_parse_request_rejects_wrong_types() {
    let err = parse_request(br#"{"bpm":"fast"}"#, &RequestLimits::default()).unwrap_err();
    assert!(matches!(err, RequestError::JsonParse(_)));

    let err = parse_request(b"[1,2,3]", &RequestLimits::default()).unwrap_err();
    assert!(matches!(err, RequestError::JsonParse(_)));
}

#[test]
fn test_parse_request_reports_validation_errors() {
    let err = parse_request(br#"{"mood":"Happy"}"#, &RequestLimits::default()).unwrap_err();
    match err {
        RequestError::Invalid(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].code, ErrorCode::UnknownMood);
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}
