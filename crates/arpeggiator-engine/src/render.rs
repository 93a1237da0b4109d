//! Arpeggio rendering.
//!
//! Turns an interval pattern into timed notes using the mood's rhythm,
//! octave spread, and velocity range. Note times are in seconds and follow the
//! mood's rhythm durations directly; the tempo only reaches the MIDI file.

use rand::Rng;

use crate::mood::{self, MoodConfig};
use crate::scale::{resolve_scale, PIANO_MAX, PIANO_MIN};

/// A rendered note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// MIDI pitch in [21, 108].
    pub pitch: u8,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    pub velocity: u8,
}

/// Renders `intervals` into notes for a key and mood.
///
/// Produces exactly `total_notes(mood, num_bars)` notes laid end to end from
/// time zero. Intervals are cycled when shorter than the note count; an empty
/// list renders as all zeros.
///
/// Draws from `rng` in a fixed order: the rhythm pattern once, then per note
/// the octave offset followed by the velocity.
pub fn render_arpeggio<R: Rng + ?Sized>(
    key: &str,
    mood: &str,
    intervals: &[u8],
    num_bars: usize,
    bpm: u16,
    rng: &mut R,
) -> Vec<Note> {
    let config = mood::lookup(mood);
    let scale = resolve_scale(key, config.scale_type);
    let total_notes = config.total_notes(num_bars);
    log::debug!(
        "Rendering {} {} notes in {} at {} bpm",
        total_notes,
        config.name,
        key,
        bpm
    );

    let rhythm = choose_rhythm(config, rng);
    let mut notes = Vec::with_capacity(total_notes);
    let mut cursor = 0.0;

    for i in 0..total_notes {
        let interval = if intervals.is_empty() {
            0
        } else {
            intervals[i % intervals.len()]
        };
        let base = scale[usize::from(interval) % scale.len()];

        let (low, high) = config.octave_range;
        let octave = i32::from(rng.gen_range(low..=high)) * 12;
        let pitch = (i32::from(base) + octave).clamp(i32::from(PIANO_MIN), i32::from(PIANO_MAX));

        let duration = rhythm[i % rhythm.len()];
        let (min_velocity, max_velocity) = config.velocity_range;
        let velocity = rng.gen_range(min_velocity..=max_velocity);

        notes.push(Note {
            pitch: pitch as u8,
            start: cursor,
            end: cursor + duration,
            velocity,
        });
        cursor += duration;
    }

    notes
}

/// Total length in seconds: the end of the last note.
pub fn total_duration(notes: &[Note]) -> f64 {
    notes.last().map(|n| n.end).unwrap_or(0.0)
}

fn choose_rhythm<R: Rng + ?Sized>(config: &MoodConfig, rng: &mut R) -> &'static [f64] {
    let patterns = config.rhythm_patterns;
    patterns[rng.gen_range(0..patterns.len())]
}
