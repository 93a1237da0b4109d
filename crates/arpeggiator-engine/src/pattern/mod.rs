//! Interval pattern strategies.
//!
//! A pattern is a sequence of scale degrees in [0, 7], one per note. The
//! rule-based styles live in [`style`]; the model-driven style lives in
//! [`ai`] and sits behind the [`TextModel`] capability.

pub mod ai;
pub mod model;
pub mod style;

pub use ai::{build_prompt, extract_intervals, fallback_pattern, mood_phrase, AiPatternGenerator};
pub use model::{ModelError, OfflineModel, SamplingParams, TextModel};
pub use style::{alternating, ascending, descending, pattern_for_style, random, DEGREES};
