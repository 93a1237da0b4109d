//! Generation request types.
//!
//! [`GenerationRequest`] is the wire shape accepted by the HTTP API and the
//! CLI: every field is optional and falls back to its documented default.
//! [`ArpeggioParams`] is the validated form consumed by the engine. The
//! service and CLI build it with [`crate::validation::validate_request`];
//! its fields are public, so code constructing it directly must keep the
//! values within [`RequestLimits`].

use serde::{Deserialize, Serialize};

/// Default key when a request omits one.
pub const DEFAULT_KEY: &str = "C";
/// Default tempo in beats per minute.
pub const DEFAULT_BPM: i64 = 120;
/// Default number of bars.
pub const DEFAULT_NUM_BARS: i64 = 2;

/// Mood presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Calm,
    Energetic,
    Dark,
    Ambient,
    Chaotic,
    Epic,
    Melancholic,
}

impl Mood {
    /// All moods in their canonical listing order.
    pub const ALL: [Mood; 8] = [
        Mood::Happy,
        Mood::Calm,
        Mood::Energetic,
        Mood::Dark,
        Mood::Ambient,
        Mood::Chaotic,
        Mood::Epic,
        Mood::Melancholic,
    ];

    /// The mood used when a request does not name one.
    pub const DEFAULT: Mood = Mood::Happy;

    /// Returns the lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Calm => "calm",
            Mood::Energetic => "energetic",
            Mood::Dark => "dark",
            Mood::Ambient => "ambient",
            Mood::Chaotic => "chaotic",
            Mood::Epic => "epic",
            Mood::Melancholic => "melancholic",
        }
    }

    /// Parses a wire name. Matching is exact (case-sensitive).
    pub fn from_name(name: &str) -> Option<Mood> {
        Mood::ALL.iter().copied().find(|m| m.as_str() == name)
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy used to produce the interval sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternStyle {
    AiGenerated,
    Ascending,
    Descending,
    Alternating,
    Random,
}

impl PatternStyle {
    /// All styles in their canonical listing order.
    pub const ALL: [PatternStyle; 5] = [
        PatternStyle::AiGenerated,
        PatternStyle::Ascending,
        PatternStyle::Descending,
        PatternStyle::Alternating,
        PatternStyle::Random,
    ];

    /// The style used when a request does not name one.
    pub const DEFAULT: PatternStyle = PatternStyle::AiGenerated;

    /// Returns the kebab-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternStyle::AiGenerated => "ai-generated",
            PatternStyle::Ascending => "ascending",
            PatternStyle::Descending => "descending",
            PatternStyle::Alternating => "alternating",
            PatternStyle::Random => "random",
        }
    }

    /// Display label for pickers.
    pub fn label(&self) -> &'static str {
        match self {
            PatternStyle::AiGenerated => "AI Generated",
            PatternStyle::Ascending => "Ascending",
            PatternStyle::Descending => "Descending",
            PatternStyle::Alternating => "Alternating",
            PatternStyle::Random => "Random",
        }
    }

    /// One-line description for pickers.
    pub fn description(&self) -> &'static str {
        match self {
            PatternStyle::AiGenerated => "Creative pattern generated by AI",
            PatternStyle::Ascending => "Notes move upward in pitch",
            PatternStyle::Descending => "Notes move downward in pitch",
            PatternStyle::Alternating => "Notes alternate up and down",
            PatternStyle::Random => "Random pattern within scale",
        }
    }

    /// Parses a wire name. Matching is exact (case-sensitive).
    pub fn from_name(name: &str) -> Option<PatternStyle> {
        PatternStyle::ALL.iter().copied().find(|s| s.as_str() == name)
    }
}

impl std::fmt::Display for PatternStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated generation request as received on the wire.
///
/// Unknown fields are ignored. Numeric fields are kept as `i64` so that
/// out-of-range values reach validation and produce a range error rather than
/// a deserialization error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationRequest {
    /// Musical key: a letter A-G with an optional `#` or `b`.
    pub key: String,
    /// Mood preset name.
    pub mood: String,
    /// Tempo in beats per minute.
    pub bpm: i64,
    /// Number of bars to generate.
    pub num_bars: i64,
    /// Pattern style name.
    pub pattern_style: String,
    /// Optional seed for reproducible output.
    pub seed: Option<i64>,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            key: DEFAULT_KEY.to_string(),
            mood: Mood::DEFAULT.as_str().to_string(),
            bpm: DEFAULT_BPM,
            num_bars: DEFAULT_NUM_BARS,
            pattern_style: PatternStyle::DEFAULT.as_str().to_string(),
            seed: None,
        }
    }
}

/// Inclusive bounds applied to tempo and bar count during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLimits {
    pub min_bpm: u16,
    pub max_bpm: u16,
    pub min_bars: u8,
    pub max_bars: u8,
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            min_bpm: 40,
            max_bpm: 240,
            min_bars: 1,
            max_bars: 8,
        }
    }
}

/// A validated generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArpeggioParams {
    pub key: String,
    pub mood: Mood,
    pub bpm: u16,
    pub num_bars: u8,
    pub pattern_style: PatternStyle,
    pub seed: Option<i64>,
}

impl ArpeggioParams {
    /// File name used for MIDI downloads.
    pub fn midi_filename(&self) -> String {
        format!("arpeggio_{}_{}_{}bpm.mid", self.key, self.mood, self.bpm)
    }
}
