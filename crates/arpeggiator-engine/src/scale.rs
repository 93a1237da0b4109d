//! Scale resolution.
//!
//! Builds the pitch set of a scale rooted at a key, spread over four octave
//! transpositions (one below the key's middle octave to two above), clamped
//! to the 88-key piano range.

use thiserror::Error;

use crate::mood::ScaleType;

/// Lowest piano pitch (A0).
pub const PIANO_MIN: u8 = 21;
/// Highest piano pitch (C8).
pub const PIANO_MAX: u8 = 108;

/// Scale returned when a key cannot be resolved (C major, middle octave).
pub const FALLBACK_SCALE: [u8; 8] = [60, 62, 64, 65, 67, 69, 71, 72];

/// MIDI pitch of C in the key's reference octave (C4).
const REFERENCE_C: i32 = 60;

/// Octave transpositions applied to the scale's pitch set.
const OCTAVE_SHIFTS: [i32; 4] = [-1, 0, 1, 2];

/// Error raised when a key name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScaleError {
    #[error("empty key name")]
    EmptyKey,

    #[error("unknown note letter '{0}'")]
    UnknownLetter(char),

    #[error("unsupported accidental in key '{0}'")]
    BadAccidental(String),
}

/// Parses a key name ("C", "F#", "Bb") into its MIDI pitch in octave 4.
///
/// The letter fixes the octave, so "Cb" resolves to 59 and "B#" to 72.
///
/// # Examples
/// ```
/// use arpeggiator_engine::scale::key_to_midi;
///
/// assert_eq!(key_to_midi("C"), Ok(60));
/// assert_eq!(key_to_midi("F#"), Ok(66));
/// assert_eq!(key_to_midi("Bb"), Ok(70));
/// assert!(key_to_midi("H").is_err());
/// ```
pub fn key_to_midi(key: &str) -> Result<i32, ScaleError> {
    let mut chars = key.chars();
    let letter = chars.next().ok_or(ScaleError::EmptyKey)?;
    let semitone = match letter {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        other => return Err(ScaleError::UnknownLetter(other)),
    };
    let accidental = match chars.as_str() {
        "" => 0,
        "#" => 1,
        "b" => -1,
        _ => return Err(ScaleError::BadAccidental(key.to_string())),
    };
    Ok(REFERENCE_C + semitone + accidental)
}

/// Builds the scale pitch list, or an error if the key is unparseable.
pub fn try_resolve_scale(key: &str, scale_type: ScaleType) -> Result<Vec<u8>, ScaleError> {
    let root = key_to_midi(key)?;
    let mut pitches: Vec<u8> = OCTAVE_SHIFTS
        .iter()
        .flat_map(|shift| {
            scale_type
                .steps()
                .iter()
                .map(move |step| root + i32::from(*step) + shift * 12)
        })
        .filter(|midi| (i32::from(PIANO_MIN)..=i32::from(PIANO_MAX)).contains(midi))
        .filter_map(|midi| u8::try_from(midi).ok())
        .collect();
    pitches.sort_unstable();
    pitches.dedup();
    Ok(pitches)
}

/// Builds the scale pitch list: sorted, deduplicated, within [21, 108].
///
/// Never fails: an unparseable key yields [`FALLBACK_SCALE`].
pub fn resolve_scale(key: &str, scale_type: ScaleType) -> Vec<u8> {
    match try_resolve_scale(key, scale_type) {
        Ok(pitches) if !pitches.is_empty() => pitches,
        Ok(_) => {
            log::warn!("Scale for key '{}' is empty, using C major fallback", key);
            FALLBACK_SCALE.to_vec()
        }
        Err(e) => {
            log::warn!("Error getting scale for key '{}': {}", key, e);
            FALLBACK_SCALE.to_vec()
        }
    }
}
