//! HTTP server for arpeggio generation.
//!
//! ## Endpoints
//!
//! - `GET /`: banner with readiness status
//! - `GET /health`: health and model status
//! - `GET /api/moods`: available moods (503 while initializing)
//! - `GET /api/pattern-styles`: available pattern styles
//! - `POST /api/generate`: JSON notes plus base64 MIDI
//!   ```json
//!   {"key": "C", "mood": "happy", "bpm": 120, "num_bars": 2, "pattern_style": "ascending", "seed": 42}
//!   ```
//! - `POST /api/generate/midi`: the MIDI file as a download
//!
//! Every response allows any origin. `OPTIONS` on any path answers the CORS
//! preflight.
//!
//! tiny_http accepts connections on a blocking thread and each request is
//! handled on the tokio blocking pool, since generation (and model inference
//! in particular) is synchronous. The text model loads in the background
//! after the socket is bound; requests that need it get 503 until then.

mod handler;
mod types;

#[cfg(test)]
mod tests;

use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use tiny_http::{Request, Server};

use crate::config::{Settings, APP_NAME, VERSION};
use crate::state::{build_generator, AppState};

pub use handler::{handle, Route};
pub use types::{HttpResponse, CONTENT_TYPE_JSON, CONTENT_TYPE_MIDI};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: u64 = 64 * 1024;

/// How long shutdown waits for in-flight blocking work.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Run the HTTP server until Ctrl+C.
///
/// # Returns
/// Exit code: 0 on clean shutdown
pub fn run(settings: Settings) -> Result<ExitCode> {
    settings.validate()?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let result = rt.block_on(run_server(settings));
    rt.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

async fn run_server(settings: Settings) -> Result<ExitCode> {
    let addr = settings.bind_addr();
    let server = Server::http(&addr).map_err(|e| anyhow!("Failed to bind to {}: {}", addr, e))?;
    let server = Arc::new(server);

    log::info!("Starting up {} v{}...", APP_NAME, VERSION);
    log::info!("Listening on http://{}", addr);

    let state = Arc::new(AppState::new(settings));

    let loader_state = Arc::clone(&state);
    tokio::task::spawn_blocking(move || initialize(&loader_state));

    let shutdown = Arc::clone(&server);
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            log::info!("Shutting down...");
            shutdown.unblock();
        }
    });

    let runtime = tokio::runtime::Handle::current();
    let accept = tokio::task::spawn_blocking(move || {
        for request in server.incoming_requests() {
            let state = Arc::clone(&state);
            runtime.spawn_blocking(move || respond(request, &state));
        }
    });
    accept.await.context("Accept loop failed")?;

    log::info!("Server shutdown complete");
    Ok(ExitCode::SUCCESS)
}

/// Builds the generator and installs it into `state`.
pub fn initialize(state: &AppState) {
    let generator = build_generator(state.settings().model.as_ref());
    if state.install(generator) {
        log::info!("All services initialized successfully");
    }
}

fn respond(mut request: Request, state: &AppState) {
    let start = Instant::now();
    let method = request.method().as_str().to_string();
    let url = request.url().to_string();

    let response = match read_body(request.as_reader()) {
        Ok(body) => handle(&method, &url, &body, state),
        Err(response) => response,
    };

    log::info!(
        "{} {} -> {} ({:.1?})",
        method,
        url,
        response.status,
        start.elapsed()
    );
    if let Err(e) = request.respond(response.into_tiny_http()) {
        log::warn!("Failed to send response for {} {}: {}", method, url, e);
    }
}

/// Reads at most `MAX_BODY_BYTES`; anything longer is a 413.
fn read_body<R: Read>(reader: R) -> std::result::Result<Vec<u8>, HttpResponse> {
    let mut body = Vec::new();
    reader
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut body)
        .map_err(|e| {
            log::warn!("Failed to read request body: {}", e);
            HttpResponse::error(400, "Failed to read request body")
        })?;
    if body.len() as u64 > MAX_BODY_BYTES {
        return Err(HttpResponse::error(413, "Request body too large"));
    }
    Ok(body)
}
