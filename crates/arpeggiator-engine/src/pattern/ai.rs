//! Model-driven interval patterns.
//!
//! A short prompt describing the key and mood is continued by a
//! [`TextModel`]. Scale degrees are read back out of the decoded sequence,
//! prompt followed by continuation: digit runs first, then a character-code
//! scan. When the model fails or the text yields too few values, a fixed
//! per-mood pattern is used instead, so this strategy always produces a
//! usable sequence.

use std::sync::OnceLock;

use regex::Regex;

use super::model::{SamplingParams, TextModel};
use super::style::DEGREES;

/// Runs of ASCII digits.
const DIGIT_RUN_PATTERN: &str = r"[0-9]+";

fn digit_run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DIGIT_RUN_PATTERN).expect("invalid regex pattern"))
}

/// Character phrase used in the prompt for a mood.
pub fn mood_phrase(mood: &str) -> &'static str {
    match mood {
        "happy" => "uplifting, bright, and joyful",
        "calm" => "peaceful, serene, and gentle",
        "energetic" => "dynamic, powerful, and exciting",
        "dark" => "mysterious, somber, and intense",
        "ambient" => "atmospheric, spacious, and ethereal",
        "chaotic" => "unpredictable, wild, and intense",
        "epic" => "grand, heroic, and dramatic",
        "melancholic" => "sad, reflective, and emotional",
        _ => "musical",
    }
}

/// Builds the composition prompt for a key and mood.
///
/// # Examples
/// ```
/// use arpeggiator_engine::pattern::build_prompt;
///
/// assert_eq!(
///     build_prompt("D", "calm"),
///     "Music composition in D with peaceful, serene, and gentle character.\nArpeggio pattern: "
/// );
/// ```
pub fn build_prompt(key: &str, mood: &str) -> String {
    format!(
        "Music composition in {} with {} character.\nArpeggio pattern: ",
        key,
        mood_phrase(mood)
    )
}

/// Unreduced fallback intervals for a mood.
pub fn fallback_base(mood: &str) -> &'static [i8] {
    match mood {
        "happy" => &[0, 2, 4, 7, 4, 2],
        "calm" => &[0, 2, 4, 2, 0],
        "energetic" => &[0, 4, 7, 12, 7, 4, 0, -5],
        "dark" => &[0, 3, 5, 7, 5, 3],
        "ambient" => &[0, 4, 7, 11, 7, 4],
        "chaotic" => &[0, 6, 2, 7, 1, 5, 3, 4],
        "epic" => &[0, 3, 7, 10, 7, 3],
        "melancholic" => &[0, 3, 5, 8, 5, 3],
        _ => &[0, 2, 4, 5, 7],
    }
}

/// The mood's fallback pattern, reduced into [0, 7] and cycled to exactly
/// `num_notes` values.
pub fn fallback_pattern(mood: &str, num_notes: usize) -> Vec<u8> {
    fallback_base(mood)
        .iter()
        .map(|v| v.rem_euclid(DEGREES as i8) as u8)
        .cycle()
        .take(num_notes)
        .collect()
}

/// Reads up to `num_notes` scale degrees out of generated text.
///
/// Digit runs are used when present, each reduced modulo 8 and the list
/// padded cyclically. Otherwise the second half of the text is scanned: a
/// digit contributes its value, a letter its lowercase code point, both
/// modulo 8. May return fewer than `num_notes` values, or none.
pub fn extract_intervals(text: &str, num_notes: usize) -> Vec<u8> {
    let from_digits: Vec<u8> = digit_run_regex()
        .find_iter(text)
        .take(num_notes)
        .map(|m| digit_run_degree(m.as_str()))
        .collect();
    if !from_digits.is_empty() {
        return cycle_to(&from_digits, num_notes);
    }

    let skip = text.chars().count() / 2;
    text.chars()
        .skip(skip)
        .filter_map(char_degree)
        .take(num_notes)
        .collect()
}

/// Degree of a run of ASCII digits. Only the last three digits matter
/// because 1000 is a multiple of 8.
fn digit_run_degree(run: &str) -> u8 {
    let tail = &run[run.len().saturating_sub(3)..];
    tail.bytes()
        .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'))
        .rem_euclid(u16::from(DEGREES)) as u8
}

fn char_degree(c: char) -> Option<u8> {
    if let Some(digit) = c.to_digit(10) {
        return Some((digit % u32::from(DEGREES)) as u8);
    }
    if c.is_alphabetic() {
        let lower = c.to_lowercase().next().unwrap_or(c);
        return Some((u32::from(lower) % u32::from(DEGREES)) as u8);
    }
    None
}

fn cycle_to(values: &[u8], len: usize) -> Vec<u8> {
    values.iter().copied().cycle().take(len).collect()
}

/// Generates interval patterns by sampling a text model.
pub struct AiPatternGenerator<'a> {
    model: &'a dyn TextModel,
}

impl<'a> AiPatternGenerator<'a> {
    pub fn new(model: &'a dyn TextModel) -> Self {
        Self { model }
    }

    /// Produces degrees in [0, 7]. Never fails.
    ///
    /// Digit runs and the fallback give exactly `num_notes` values. A
    /// character scan is kept as read, which may be as few as
    /// `num_notes / 2`; the renderer cycles it. `seed` seeds the model's
    /// sampler.
    pub fn generate(&self, key: &str, mood: &str, num_notes: usize, seed: u32) -> Vec<u8> {
        let prompt = build_prompt(key, mood);
        let params = SamplingParams {
            seed,
            ..SamplingParams::default()
        };

        let continuation = match self.model.generate(&prompt, &params) {
            Ok(text) => text,
            Err(e) => {
                log::error!("Error generating pattern with {}: {}", self.model.name(), e);
                return fallback_pattern(mood, num_notes);
            }
        };
        log::debug!("Model continuation: {:?}", continuation);

        let text = format!("{}{}", prompt, continuation);
        let intervals = extract_intervals(&text, num_notes);
        if intervals.is_empty() || intervals.len() < num_notes / 2 {
            log::warn!(
                "Pattern extraction yielded {} of {} values, using fallback",
                intervals.len(),
                num_notes
            );
            return fallback_pattern(mood, num_notes);
        }
        intervals
    }
}
