//! Generation pipeline: pattern, render, encode, describe.

use std::sync::Arc;

use arpeggiator_spec::{ArpeggioParams, BackendError, GenerationResponse, NoteData, PatternStyle};
use thiserror::Error;

use crate::describe::describe_pattern;
use crate::midi::{MidiContainer, MidiError};
use crate::mood::config_for;
use crate::pattern::{pattern_for_style, AiPatternGenerator, OfflineModel, TextModel};
use crate::render::{render_arpeggio, Note};
use crate::rng::{base_seed, create_rng, derive_component_seed};

/// Number of leading intervals included in generation logs.
const LOGGED_INTERVALS: usize = 16;

/// Error type for arpeggio generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The rendered notes could not be written as MIDI.
    #[error("Error generating arpeggio: {0}")]
    Midi(#[from] MidiError),
}

impl BackendError for GenerateError {
    fn code(&self) -> &'static str {
        match self {
            GenerateError::Midi(_) => "GEN_001",
        }
    }

    fn category(&self) -> &'static str {
        "generation"
    }
}

/// Output of one generation run.
#[derive(Debug, Clone)]
pub struct GeneratedArpeggio {
    pub notes: Vec<Note>,
    pub intervals: Vec<u8>,
    /// Standard MIDI File bytes.
    pub midi: Vec<u8>,
    /// Standard base64 of `midi`.
    pub midi_base64: String,
    pub description: String,
    /// End of the last note, in seconds.
    pub duration: f64,
    /// BLAKE3 hex digest of `midi`.
    pub hash: String,
    /// Base seed actually used, whether requested or drawn.
    pub seed: u64,
}

impl GeneratedArpeggio {
    /// Shapes the result as the JSON body of `POST /api/generate`.
    pub fn to_response(&self, params: &ArpeggioParams) -> GenerationResponse {
        GenerationResponse {
            notes: self
                .notes
                .iter()
                .map(|n| NoteData {
                    pitch: n.pitch,
                    start_time: n.start,
                    end_time: n.end,
                    velocity: n.velocity,
                })
                .collect(),
            midi_base64: self.midi_base64.clone(),
            tempo: params.bpm,
            key: params.key.clone(),
            mood: params.mood.as_str().to_string(),
            duration: self.duration,
            pattern_description: self.description.clone(),
        }
    }
}

/// Runs the full pipeline for validated parameters.
///
/// Holds the text model used by the `ai-generated` style. The generator is
/// shared across request threads.
pub struct ArpeggioGenerator {
    model: Arc<dyn TextModel>,
}

impl ArpeggioGenerator {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    /// A generator without a text model; `ai-generated` always falls back.
    pub fn offline() -> Self {
        Self::new(Arc::new(OfflineModel))
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_loaded()
    }

    /// Generates an arpeggio.
    ///
    /// With a request seed the output is fully reproducible: the pattern,
    /// the rendering draws, and the model's sampler all derive from it.
    pub fn generate(&self, params: &ArpeggioParams) -> Result<GeneratedArpeggio, GenerateError> {
        let seed = base_seed(params.seed);
        let mood = params.mood.as_str();
        let num_bars = usize::from(params.num_bars);
        let total_notes = config_for(params.mood).total_notes(num_bars);

        log::info!(
            "Generating {} arpeggio in {} ({} bars, {} bpm, {}, seed {})",
            mood,
            params.key,
            params.num_bars,
            params.bpm,
            params.pattern_style.as_str(),
            seed
        );

        let mut rng = create_rng(seed);
        let intervals = match params.pattern_style {
            PatternStyle::AiGenerated => AiPatternGenerator::new(self.model.as_ref()).generate(
                &params.key,
                mood,
                total_notes,
                derive_component_seed(seed, "model"),
            ),
            style => pattern_for_style(style, total_notes, &mut rng),
        };
        log::info!(
            "Interval pattern: {:?}",
            &intervals[..intervals.len().min(LOGGED_INTERVALS)]
        );

        let notes = render_arpeggio(
            &params.key,
            mood,
            &intervals,
            num_bars,
            params.bpm,
            &mut rng,
        );

        let container = MidiContainer::encode(&notes, params.bpm)?;
        let midi = container.to_bytes()?;
        let midi_base64 = container.to_base64()?;
        let info = container.describe();
        let description = describe_pattern(mood, &intervals);
        let hash = blake3::hash(&midi).to_hex().to_string();

        log::info!(
            "Generated {} notes, {:.3}s, hash {}",
            info.note_count,
            info.duration,
            hash
        );

        Ok(GeneratedArpeggio {
            notes,
            intervals,
            midi,
            midi_base64,
            description,
            duration: info.duration,
            hash,
            seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arpeggiator_spec::Mood;
    use pretty_assertions::assert_eq;

    fn params(mood: Mood, style: PatternStyle, num_bars: u8) -> ArpeggioParams {
        ArpeggioParams {
            key: "C".to_string(),
            mood,
            bpm: 120,
            num_bars,
            pattern_style: style,
            seed: Some(42),
        }
    }

    #[test]
    fn test_generate_happy_ascending() {
        let result = ArpeggioGenerator::offline()
            .generate(&params(Mood::Happy, PatternStyle::Ascending, 2))
            .unwrap();
        assert_eq!(result.notes.len(), 32);
        assert_eq!(result.intervals, crate::pattern::ascending(32));
        assert_eq!(result.seed, 42);
        assert_eq!(result.hash.len(), 64);
        assert_eq!(result.description, "Happy major arpeggio with ascending movement");
    }

    #[test]
    fn test_offline_ai_style_uses_fallback() {
        let result = ArpeggioGenerator::offline()
            .generate(&params(Mood::Dark, PatternStyle::AiGenerated, 1))
            .unwrap();
        assert_eq!(result.intervals, crate::pattern::fallback_pattern("dark", 8));
    }

    #[test]
    fn test_response_shape() {
        let p = params(Mood::Calm, PatternStyle::Descending, 1);
        let result = ArpeggioGenerator::offline().generate(&p).unwrap();
        let response = result.to_response(&p);
        assert_eq!(response.notes.len(), 4);
        assert_eq!(response.tempo, 120);
        assert_eq!(response.key, "C");
        assert_eq!(response.mood, "calm");
        assert_eq!(response.duration, result.duration);
        assert!(!response.midi_base64.is_empty());
        assert_eq!(response.midi_base64, result.midi_base64);
    }

    #[test]
    fn test_error_code() {
        let err = GenerateError::from(MidiError::Encode("x".to_string()));
        assert_eq!(err.code(), "GEN_001");
    }
}
