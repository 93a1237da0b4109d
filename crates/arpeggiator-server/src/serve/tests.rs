//! Tests for the HTTP handlers.

use arpeggiator_engine::ArpeggioGenerator;
use pretty_assertions::assert_eq;

use super::handler::{handle, Route};
use super::{read_body, HttpResponse, MAX_BODY_BYTES};
use crate::config::Settings;
use crate::state::AppState;

fn ready_state() -> AppState {
    AppState::ready(Settings::default(), ArpeggioGenerator::offline())
}

fn starting_state() -> AppState {
    AppState::new(Settings::default())
}

#[test]
fn test_route_matching_ignores_query() {
    assert_eq!(Route::from_path("/health?probe=1"), Some(Route::Health));
    assert_eq!(Route::from_path("/api/generate/midi"), Some(Route::GenerateMidi));
    assert_eq!(Route::from_path("/api/generate/"), None);
    assert_eq!(Route::Generate.method(), "POST");
}

#[test]
fn test_banner_reports_readiness() {
    let body = handle("GET", "/", b"", &starting_state()).body_json().unwrap();
    assert_eq!(body["status"], "initializing");
    assert_eq!(body["docs"], "/docs");

    let body = handle("GET", "/", b"", &ready_state()).body_json().unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["message"], "Welcome to AI Arpeggiator");
}

#[test]
fn test_health_without_model() {
    let response = handle("GET", "/health", b"", &ready_state());
    assert_eq!(response.status, 200);
    let body = response.body_json().unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], false);
}

#[test]
fn test_moods_unavailable_while_initializing() {
    let response = handle("GET", "/api/moods", b"", &starting_state());
    assert_eq!(response.status, 503);
    assert_eq!(response.body_json().unwrap()["detail"], "Service initializing");
}

#[test]
fn test_pattern_styles_always_available() {
    let response = handle("GET", "/api/pattern-styles", b"", &starting_state());
    assert_eq!(response.status, 200);
    let body = response.body_json().unwrap();
    assert_eq!(body["styles"].as_array().unwrap().len(), 5);
    assert_eq!(body["default"], "ai-generated");
}

#[test]
fn test_generate_while_initializing() {
    let response = handle("POST", "/api/generate", b"{}", &starting_state());
    assert_eq!(response.status, 503);
}

#[test]
fn test_malformed_body_is_422_even_while_initializing() {
    let response = handle("POST", "/api/generate", b"{not json", &starting_state());
    assert_eq!(response.status, 422);
    let body = response.body_json().unwrap();
    assert_eq!(body["detail"][0]["code"], "E006");
}

#[test]
fn test_validation_errors_are_collected() {
    let response = handle(
        "POST",
        "/api/generate",
        br#"{"key": "H", "bpm": 500, "num_bars": 0}"#,
        &ready_state(),
    );
    assert_eq!(response.status, 422);
    let codes: Vec<String> = response.body_json().unwrap()["detail"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["code"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(codes, vec!["E001", "E003", "E004"]);
}

#[test]
fn test_unknown_path_and_wrong_method() {
    let state = ready_state();
    let response = handle("GET", "/nope", b"", &state);
    assert_eq!(response.status, 404);
    assert_eq!(response.body_json().unwrap()["detail"], "Not Found");

    let response = handle("GET", "/api/generate", b"", &state);
    assert_eq!(response.status, 405);
    assert_eq!(response.header("Allow"), Some("POST"));
}

#[test]
fn test_preflight() {
    let response = handle("OPTIONS", "/api/generate", b"", &starting_state());
    assert_eq!(response.status, 204);
    assert!(response.body.is_empty());
    assert!(response.header("Access-Control-Allow-Methods").is_some());
}

#[test]
fn test_midi_download_headers() {
    let response = handle(
        "POST",
        "/api/generate/midi",
        br#"{"key": "F#", "mood": "dark", "bpm": 90, "seed": 1}"#,
        &ready_state(),
    );
    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, "audio/midi");
    assert_eq!(
        response.header("Content-Disposition"),
        Some("attachment; filename=arpeggio_F#_dark_90bpm.mid")
    );
    assert_eq!(&response.body[..4], b"MThd");
}

fn header_value<'a>(response: &'a tiny_http::Response<std::io::Cursor<Vec<u8>>>, name: &'static str) -> Option<&'a str> {
    response
        .headers()
        .iter()
        .find(|h| h.field.equiv(name))
        .map(|h| h.value.as_str())
}

#[test]
fn test_converted_responses_allow_any_origin() {
    let state = ready_state();
    for response in [
        handle("GET", "/health", b"", &state),
        handle("GET", "/missing", b"", &state),
        handle("POST", "/api/generate", br#"{"bpm": 10}"#, &state),
        handle("POST", "/api/generate/midi", b"", &state),
        handle("OPTIONS", "/api/generate", b"", &state),
    ] {
        let content_type = response.content_type;
        let status = response.status;
        let converted = response.into_tiny_http();
        assert_eq!(converted.status_code().0, status);
        assert_eq!(header_value(&converted, "Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(header_value(&converted, "Content-Type"), Some(content_type));
    }
}

#[test]
fn test_converted_response_keeps_extra_headers() {
    let converted = HttpResponse::midi_attachment(b"MThd".to_vec(), "a.mid").into_tiny_http();
    assert_eq!(
        header_value(&converted, "Content-Disposition"),
        Some("attachment; filename=a.mid")
    );
}

#[test]
fn test_body_at_limit_is_read() {
    let body = vec![b' '; MAX_BODY_BYTES as usize];
    let read = read_body(body.as_slice()).unwrap();
    assert_eq!(read.len(), body.len());
}

#[test]
fn test_body_over_limit_is_rejected() {
    let body = vec![b' '; MAX_BODY_BYTES as usize + 1];
    let response = read_body(body.as_slice()).unwrap_err();
    assert_eq!(response.status, 413);
    assert_eq!(response.body_json().unwrap()["detail"], "Request body too large");
}
