//! Arpeggiator service library.
//!
//! This crate provides the HTTP service and the command implementations
//! behind the `arpeggiator` binary: settings, shared state and the startup
//! model loader, request routing, and the offline `generate` and `inspect`
//! commands.

pub mod commands;
pub mod config;
pub mod serve;
pub mod state;

pub use config::{Settings, APP_NAME, VERSION};
pub use state::{build_generator, AppState};
