//! Arpeggiator Engine - Mood-Driven Arpeggio Rendering
//!
//! This crate turns validated generation parameters into an arpeggio: an
//! interval pattern over a scale, rendered into timed notes and encoded as a
//! Standard MIDI File.
//!
//! # Features
//!
//! - **Mood Presets**: Eight static presets fixing scale, rhythm, density, octave spread and velocity
//! - **Pattern Styles**: Ascending, descending, alternating, random, and text-model driven
//! - **Graceful Fallback**: The model-driven style never fails; it falls back to per-mood patterns
//! - **MIDI Output**: Single-track SMF at 480 ticks per quarter, plus a decoder for inspection
//!
//! # Determinism
//!
//! Given a seed, output is byte-identical across runs. All randomness flows
//! from one PCG32 generator per request, and the text model's sampler seed is
//! derived from the same base seed with BLAKE3.
//!
//! # Example
//!
//! ```
//! use arpeggiator_engine::ArpeggioGenerator;
//! use arpeggiator_spec::{ArpeggioParams, Mood, PatternStyle};
//!
//! let params = ArpeggioParams {
//!     key: "C".to_string(),
//!     mood: Mood::Happy,
//!     bpm: 120,
//!     num_bars: 2,
//!     pattern_style: PatternStyle::Ascending,
//!     seed: Some(42),
//! };
//!
//! let result = ArpeggioGenerator::offline().generate(&params).unwrap();
//! assert_eq!(result.notes.len(), 32);
//! assert_eq!(&result.midi[..4], b"MThd");
//! ```
//!
//! # Module Structure
//!
//! - [`mood`]: Mood preset table
//! - [`scale`]: Key and scale resolution
//! - [`pattern`]: Interval pattern strategies and the text model capability
//! - [`render`]: Note rendering
//! - [`midi`]: MIDI encoding and decoding
//! - [`describe`]: Pattern descriptions
//! - [`generate`]: The generation pipeline

pub mod describe;
pub mod generate;
pub mod midi;
pub mod mood;
pub mod pattern;
pub mod render;
pub mod rng;
pub mod scale;

pub use describe::describe_pattern;
pub use generate::{ArpeggioGenerator, GenerateError, GeneratedArpeggio};
pub use midi::{decode, MidiContainer, MidiError, MidiInfo, MidiSummary};
pub use mood::{config_for, lookup, MoodConfig, NoteDensity, ScaleType};
pub use pattern::{ModelError, OfflineModel, SamplingParams, TextModel};
pub use render::{render_arpeggio, Note};
pub use scale::resolve_scale;

/// Engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
