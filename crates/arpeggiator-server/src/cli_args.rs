//! CLI argument definitions for the arpeggiator command-line interface.
//!
//! All `#[derive(Parser)]`, `#[derive(Subcommand)]` and `#[derive(Args)]`
//! types are defined here, keeping `main.rs` focused on dispatch logic.

use std::path::PathBuf;

use arpeggiator_llm::ModelConfig;
use arpeggiator_server::config::{DEFAULT_HOST, DEFAULT_PORT};
use arpeggiator_spec::{GenerationRequest, RequestLimits};
use clap::{Args, Parser, Subcommand};

/// AI Arpeggiator - mood-driven arpeggio generation
#[derive(Parser)]
#[command(name = "arpeggiator")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true, env = "ARPEGGIATOR_DEBUG")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the HTTP service
    Serve {
        /// Address to bind
        #[arg(long, env = "ARPEGGIATOR_HOST", default_value = DEFAULT_HOST)]
        host: String,

        /// Port to listen on
        #[arg(long, env = "ARPEGGIATOR_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        #[command(flatten)]
        model: ModelArgs,

        #[command(flatten)]
        limits: LimitArgs,
    },

    /// Generate one arpeggio and write it as a MIDI file
    Generate {
        /// Musical key (A-G with optional # or b)
        #[arg(short, long, default_value = "C")]
        key: String,

        /// Mood preset
        #[arg(short, long, default_value = "happy")]
        mood: String,

        /// Tempo in beats per minute
        #[arg(long, default_value_t = 120, allow_negative_numbers = true)]
        bpm: i64,

        /// Number of bars
        #[arg(long, default_value_t = 2, allow_negative_numbers = true)]
        bars: i64,

        /// Pattern style (ai-generated, ascending, descending, alternating, random)
        #[arg(short, long, default_value = "ai-generated")]
        style: String,

        /// Seed for reproducible output
        #[arg(long, allow_negative_numbers = true)]
        seed: Option<i64>,

        /// Output file (default: arpeggio_{key}_{mood}_{bpm}bpm.mid)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        model: ModelArgs,

        #[command(flatten)]
        limits: LimitArgs,
    },

    /// Decode a MIDI file and print its notes
    Inspect {
        /// MIDI file to inspect
        path: PathBuf,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
pub(crate) struct ModelArgs {
    /// GGUF text model for ai-generated patterns
    #[arg(long, env = "ARPEGGIATOR_MODEL")]
    pub model: Option<PathBuf>,

    /// Label for the model in logs (default: file stem)
    #[arg(long, env = "ARPEGGIATOR_MODEL_NAME")]
    pub model_name: Option<String>,
}

impl ModelArgs {
    pub fn config(&self) -> Option<ModelConfig> {
        let path = self.model.as_ref()?;
        let config = ModelConfig::new(path);
        Some(match &self.model_name {
            Some(name) => config.with_name(name),
            None => config,
        })
    }
}

#[derive(Args)]
pub(crate) struct LimitArgs {
    /// Lowest accepted tempo
    #[arg(long, env = "ARPEGGIATOR_MIN_BPM", default_value_t = 40)]
    pub min_bpm: u16,

    /// Highest accepted tempo
    #[arg(long, env = "ARPEGGIATOR_MAX_BPM", default_value_t = 240)]
    pub max_bpm: u16,

    /// Fewest accepted bars
    #[arg(long, env = "ARPEGGIATOR_MIN_BARS", default_value_t = 1)]
    pub min_bars: u8,

    /// Most accepted bars
    #[arg(long, env = "ARPEGGIATOR_MAX_BARS", default_value_t = 8)]
    pub max_bars: u8,
}

impl LimitArgs {
    pub fn limits(&self) -> RequestLimits {
        RequestLimits {
            min_bpm: self.min_bpm,
            max_bpm: self.max_bpm,
            min_bars: self.min_bars,
            max_bars: self.max_bars,
        }
    }
}

/// Builds a wire request from `generate` arguments.
pub(crate) fn generation_request(
    key: String,
    mood: String,
    bpm: i64,
    bars: i64,
    style: String,
    seed: Option<i64>,
) -> GenerationRequest {
    GenerationRequest {
        key,
        mood,
        bpm,
        num_bars: bars,
        pattern_style: style,
        seed,
    }
}
