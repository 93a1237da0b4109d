//! Text model capability used by the generative pattern strategy.

use arpeggiator_spec::BackendError;
use thiserror::Error;

/// Sampling settings for one text generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    /// Nucleus sampling probability mass.
    pub top_p: f32,
    pub top_k: i32,
    /// Upper bound on generated (not prompt) tokens.
    pub max_new_tokens: usize,
    /// Seed for the sampler's random source.
    pub seed: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            top_p: 0.95,
            top_k: 50,
            max_new_tokens: 150,
            seed: 0,
        }
    }
}

/// Error type for text model operations.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// No backend is available to serve requests.
    #[error("text model unavailable: {0}")]
    Unavailable(String),

    /// The model could not be loaded.
    #[error("failed to load text model: {0}")]
    Load(String),

    /// Tokenization, decoding, or sampling failed.
    #[error("text model inference failed: {0}")]
    Inference(String),
}

impl BackendError for ModelError {
    fn code(&self) -> &'static str {
        match self {
            ModelError::Unavailable(_) => "MODEL_001",
            ModelError::Load(_) => "MODEL_002",
            ModelError::Inference(_) => "MODEL_003",
        }
    }

    fn category(&self) -> &'static str {
        "model"
    }
}

/// A causal text model that continues a prompt.
///
/// Implementations are shared read-only across request threads. Blocking is
/// expected: callers run generation on a blocking pool.
pub trait TextModel: Send + Sync {
    /// Short identifier for logs and health output.
    fn name(&self) -> &str;

    /// Whether real model weights back this instance.
    fn is_loaded(&self) -> bool {
        true
    }

    /// Samples a continuation of `prompt`. Returns only the generated text,
    /// without the prompt.
    fn generate(&self, prompt: &str, params: &SamplingParams) -> Result<String, ModelError>;
}

/// Model used when no backend is configured. Every call fails, so the
/// generative strategy always takes its fallback path.
#[derive(Debug, Clone, Default)]
pub struct OfflineModel;

impl TextModel for OfflineModel {
    fn name(&self) -> &str {
        "offline"
    }

    fn is_loaded(&self) -> bool {
        false
    }

    fn generate(&self, _prompt: &str, _params: &SamplingParams) -> Result<String, ModelError> {
        Err(ModelError::Unavailable(
            "no text model backend configured".to_string(),
        ))
    }
}
