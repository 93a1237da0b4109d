//! Mood configuration table.
//!
//! Each mood preset bundles a scale type, rhythm choices, velocity and
//! octave ranges, and a note density. The table is immutable static data.
//!
//! Lookups by name are total: an unrecognized name resolves to the `happy`
//! preset instead of failing. Validated requests never carry an unknown mood,
//! but every name-keyed lookup in the engine goes through [`lookup`] so the
//! default applies uniformly.

use arpeggiator_spec::Mood;

/// Scale family used to build the pitch set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleType {
    Major,
    Minor,
    Chromatic,
}

impl ScaleType {
    /// Lowercase name used in descriptions.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScaleType::Major => "major",
            ScaleType::Minor => "minor",
            ScaleType::Chromatic => "chromatic",
        }
    }

    /// Semitone offsets from the tonic, including the upper tonic.
    pub fn steps(&self) -> &'static [u8] {
        match self {
            ScaleType::Major => &[0, 2, 4, 5, 7, 9, 11, 12],
            ScaleType::Minor => &[0, 2, 3, 5, 7, 8, 10, 12],
            ScaleType::Chromatic => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
        }
    }
}

/// Qualitative note density tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteDensity {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl NoteDensity {
    /// Number of notes rendered per bar.
    pub fn notes_per_bar(&self) -> usize {
        match self {
            NoteDensity::VeryLow => 2,
            NoteDensity::Low => 4,
            NoteDensity::Medium => 8,
            NoteDensity::High => 16,
            NoteDensity::VeryHigh => 32,
        }
    }
}

/// An immutable mood preset.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodConfig {
    /// Wire name of the mood this preset belongs to.
    pub name: &'static str,
    pub scale_type: ScaleType,
    /// Roman-numeral progression. Informational; not used when rendering.
    pub chord_progression: &'static [&'static str],
    /// Candidate duration sequences, in seconds.
    pub rhythm_patterns: &'static [&'static [f64]],
    /// Inclusive velocity bounds.
    pub velocity_range: (u8, u8),
    /// Inclusive octave offset bounds.
    pub octave_range: (i8, i8),
    pub note_density: NoteDensity,
}

impl MoodConfig {
    /// Notes in an arpeggio of `num_bars` bars.
    pub fn total_notes(&self, num_bars: usize) -> usize {
        self.note_density.notes_per_bar() * num_bars
    }
}

static MOOD_CONFIGS: [MoodConfig; 8] = [
    MoodConfig {
        name: "happy",
        scale_type: ScaleType::Major,
        chord_progression: &["I", "IV", "V", "I"],
        rhythm_patterns: &[&[0.25, 0.25, 0.25, 0.25], &[0.5, 0.25, 0.25]],
        velocity_range: (80, 110),
        octave_range: (0, 1),
        note_density: NoteDensity::High,
    },
    MoodConfig {
        name: "calm",
        scale_type: ScaleType::Major,
        chord_progression: &["I", "vi", "IV", "V"],
        rhythm_patterns: &[&[0.5, 0.5], &[1.0]],
        velocity_range: (50, 80),
        octave_range: (0, 0),
        note_density: NoteDensity::Low,
    },
    MoodConfig {
        name: "energetic",
        scale_type: ScaleType::Major,
        chord_progression: &["I", "V", "vi", "IV"],
        rhythm_patterns: &[&[0.125, 0.125, 0.125, 0.125, 0.125, 0.125, 0.125, 0.125]],
        velocity_range: (90, 127),
        octave_range: (0, 2),
        note_density: NoteDensity::VeryHigh,
    },
    MoodConfig {
        name: "dark",
        scale_type: ScaleType::Minor,
        chord_progression: &["i", "iv", "v", "i"],
        rhythm_patterns: &[&[0.5, 0.5], &[0.75, 0.25]],
        velocity_range: (40, 70),
        octave_range: (-1, 0),
        note_density: NoteDensity::Medium,
    },
    MoodConfig {
        name: "ambient",
        scale_type: ScaleType::Major,
        chord_progression: &["I", "IV", "I", "V"],
        rhythm_patterns: &[&[1.0], &[2.0]],
        velocity_range: (30, 60),
        octave_range: (0, 1),
        note_density: NoteDensity::VeryLow,
    },
    MoodConfig {
        name: "chaotic",
        scale_type: ScaleType::Chromatic,
        chord_progression: &["I", "bII", "V", "i"],
        rhythm_patterns: &[
            &[0.125, 0.25, 0.125, 0.5],
            &[0.25, 0.125, 0.125, 0.25, 0.25],
        ],
        velocity_range: (60, 120),
        octave_range: (-1, 2),
        note_density: NoteDensity::High,
    },
    MoodConfig {
        name: "epic",
        scale_type: ScaleType::Minor,
        chord_progression: &["i", "VI", "III", "VII"],
        rhythm_patterns: &[&[0.5, 0.25, 0.25], &[0.25, 0.25, 0.5]],
        velocity_range: (80, 120),
        octave_range: (0, 2),
        note_density: NoteDensity::High,
    },
    MoodConfig {
        name: "melancholic",
        scale_type: ScaleType::Minor,
        chord_progression: &["i", "iv", "VI", "v"],
        rhythm_patterns: &[&[0.75, 0.25], &[0.5, 0.5]],
        velocity_range: (45, 75),
        octave_range: (0, 1),
        note_density: NoteDensity::Medium,
    },
];

/// Index of the default (`happy`) preset in the table.
const DEFAULT_INDEX: usize = 0;

/// Looks up a preset by mood name.
///
/// Total function: unknown names return the `happy` preset.
pub fn lookup(name: &str) -> &'static MoodConfig {
    MOOD_CONFIGS
        .iter()
        .find(|config| config.name == name)
        .unwrap_or(&MOOD_CONFIGS[DEFAULT_INDEX])
}

/// Returns the preset for a validated mood.
pub fn config_for(mood: Mood) -> &'static MoodConfig {
    lookup(mood.as_str())
}
