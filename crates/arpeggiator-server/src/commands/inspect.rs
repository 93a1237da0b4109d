//! Inspect command implementation
//!
//! Decodes a MIDI file and prints its timing summary and notes.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use arpeggiator_engine::midi::{decode, MidiSummary};
use colored::Colorize;

/// Notes listed in human output before truncating.
const MAX_LISTED_NOTES: usize = 32;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Run the inspect command
///
/// # Arguments
/// * `path` - MIDI file to inspect
/// * `json_output` - Whether to print the summary as JSON
///
/// # Returns
/// Exit code: 0 success
pub fn run(path: &Path, json_output: bool) -> Result<ExitCode> {
    let summary = inspect_file(path)?;

    if json_output {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{}", json);
    } else {
        print_human(path, &summary);
    }
    Ok(ExitCode::SUCCESS)
}

/// Reads and decodes a MIDI file.
pub fn inspect_file(path: &Path) -> Result<MidiSummary> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    decode(&bytes).with_context(|| format!("Failed to decode {}", path.display()))
}

/// Scientific pitch name, e.g. 60 -> "C4".
pub fn pitch_name(pitch: u8) -> String {
    let octave = i32::from(pitch / 12) - 1;
    format!("{}{}", NOTE_NAMES[usize::from(pitch % 12)], octave)
}

fn print_human(path: &Path, summary: &MidiSummary) {
    println!("{} {}", "Inspecting:".cyan().bold(), path.display());
    println!(
        "  format {}, {} track(s), {}",
        summary.format,
        summary.track_count,
        match summary.ticks_per_quarter {
            Some(tpq) => format!("{} ticks/quarter", tpq),
            None => "timecode timing".to_string(),
        }
    );
    println!("  tempo {:.2} bpm", summary.estimated_tempo);
    println!(
        "  {} notes, {:.3}s",
        summary.note_count, summary.duration
    );

    for note in summary.notes.iter().take(MAX_LISTED_NOTES) {
        println!(
            "  {:>8.3}s {:>8.3}s  {:<4} vel {:>3}  ch {}",
            note.start,
            note.end,
            pitch_name(note.pitch),
            note.velocity,
            note.channel
        );
    }
    if summary.notes.len() > MAX_LISTED_NOTES {
        println!(
            "  {}",
            format!("... {} more", summary.notes.len() - MAX_LISTED_NOTES).dimmed()
        );
    }
}
