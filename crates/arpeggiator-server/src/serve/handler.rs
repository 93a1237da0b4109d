//! Request routing and response shaping.
//!
//! Handlers take the method, URL and body and return a complete
//! [`HttpResponse`]; they never touch the socket. Generation runs inline, so
//! callers must invoke [`handle`] from a blocking thread.

use arpeggiator_spec::{
    parse_request, ArpeggioParams, BannerResponse, HealthResponse, MoodsResponse,
    PatternStylesResponse,
};

use super::types::HttpResponse;
use crate::config::{APP_NAME, DOCS_PATH, VERSION};
use crate::state::AppState;

const INITIALIZING: &str = "Service initializing";
const GENERATE_INITIALIZING: &str = "Service is still initializing. Please try again in a moment.";

/// Known endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    Health,
    Moods,
    PatternStyles,
    Generate,
    GenerateMidi,
}

impl Route {
    /// Matches a request path, ignoring any query string.
    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.split('?').next().unwrap_or(path);
        match path {
            "/" => Some(Route::Root),
            "/health" => Some(Route::Health),
            "/api/moods" => Some(Route::Moods),
            "/api/pattern-styles" => Some(Route::PatternStyles),
            "/api/generate" => Some(Route::Generate),
            "/api/generate/midi" => Some(Route::GenerateMidi),
            _ => None,
        }
    }

    /// The single method each endpoint accepts.
    pub fn method(&self) -> &'static str {
        match self {
            Route::Root | Route::Health | Route::Moods | Route::PatternStyles => "GET",
            Route::Generate | Route::GenerateMidi => "POST",
        }
    }
}

/// Dispatches one request.
pub fn handle(method: &str, url: &str, body: &[u8], state: &AppState) -> HttpResponse {
    if method.eq_ignore_ascii_case("OPTIONS") {
        return HttpResponse::preflight();
    }

    let Some(route) = Route::from_path(url) else {
        return HttpResponse::error(404, "Not Found");
    };
    if !method.eq_ignore_ascii_case(route.method()) {
        return HttpResponse::method_not_allowed(route.method());
    }

    match route {
        Route::Root => banner(state),
        Route::Health => health(state),
        Route::Moods => moods(state),
        Route::PatternStyles => HttpResponse::json(200, &PatternStylesResponse::all()),
        Route::Generate => generate_json(body, state),
        Route::GenerateMidi => generate_midi(body, state),
    }
}

fn banner(state: &AppState) -> HttpResponse {
    HttpResponse::json(
        200,
        &BannerResponse {
            message: format!("Welcome to {}", APP_NAME),
            version: VERSION.to_string(),
            docs: DOCS_PATH.to_string(),
            status: if state.is_ready() { "ready" } else { "initializing" }.to_string(),
        },
    )
}

fn health(state: &AppState) -> HttpResponse {
    HttpResponse::json(
        200,
        &HealthResponse {
            status: if state.is_ready() { "healthy" } else { "initializing" }.to_string(),
            model_loaded: state.model_loaded(),
            version: VERSION.to_string(),
        },
    )
}

fn moods(state: &AppState) -> HttpResponse {
    if !state.is_ready() {
        return HttpResponse::error(503, INITIALIZING);
    }
    HttpResponse::json(200, &MoodsResponse::all())
}

/// Body validation runs before the readiness check, so a malformed request
/// gets its 422 even while the service is starting.
fn validated(body: &[u8], state: &AppState) -> Result<ArpeggioParams, HttpResponse> {
    parse_request(body, state.limits()).map_err(|e| {
        let errors = e.into_validation_errors();
        log::info!("Rejected generation request: {} error(s)", errors.len());
        HttpResponse::validation(&errors)
    })
}

fn generate_json(body: &[u8], state: &AppState) -> HttpResponse {
    let params = match validated(body, state) {
        Ok(params) => params,
        Err(response) => return response,
    };
    let Some(generator) = state.generator() else {
        return HttpResponse::error(503, GENERATE_INITIALIZING);
    };

    log::info!("Received generation request: {:?}", params);
    match generator.generate(&params) {
        Ok(result) => {
            log::info!(
                "Successfully generated arpeggio with {} notes, duration: {:.2}s",
                result.notes.len(),
                result.duration
            );
            HttpResponse::json(200, &result.to_response(&params))
        }
        Err(e) => {
            log::error!("Error generating arpeggio: {}", e);
            HttpResponse::error(500, format!("Failed to generate arpeggio: {}", e))
        }
    }
}

fn generate_midi(body: &[u8], state: &AppState) -> HttpResponse {
    let params = match validated(body, state) {
        Ok(params) => params,
        Err(response) => return response,
    };
    let Some(generator) = state.generator() else {
        return HttpResponse::error(503, INITIALIZING);
    };

    match generator.generate(&params) {
        Ok(result) => HttpResponse::midi_attachment(result.midi, &params.midi_filename()),
        Err(e) => {
            log::error!("Error generating MIDI file: {}", e);
            HttpResponse::error(500, e.to_string())
        }
    }
}
