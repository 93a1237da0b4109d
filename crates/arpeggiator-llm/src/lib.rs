//! Text model backends for the arpeggiator.
//!
//! The engine only knows the [`TextModel`] capability. This crate loads a
//! concrete model for it: a local GGUF file run through llama.cpp when built
//! with the `llama` feature (GPU offload via `cuda`, `vulkan` or `metal`).
//! Without the feature, [`load_model`] reports the backend as unavailable and
//! callers keep the offline model.

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use arpeggiator_engine::pattern::{ModelError, SamplingParams, TextModel};

#[cfg(feature = "llama")]
mod llama;

#[cfg(feature = "llama")]
pub use llama::LlamaTextModel;

/// Default context window, in tokens. The prompt is short and generation is
/// capped at a few hundred tokens.
pub const DEFAULT_CONTEXT_SIZE: u32 = 512;

/// Where and how to load a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// Path to a GGUF model file.
    pub path: PathBuf,
    /// Label reported in logs; defaults to the file stem.
    pub name: Option<String>,
    pub context_size: u32,
}

impl ModelConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            name: None,
            context_size: DEFAULT_CONTEXT_SIZE,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Label for the model: the configured name, else the file stem.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "model".to_string())
        })
    }
}

/// Loads the model described by `config`.
///
/// Blocking and slow for real weights; run it off the async runtime.
pub fn load_model(config: &ModelConfig) -> Result<Arc<dyn TextModel>, ModelError> {
    check_model_file(&config.path)?;
    load_backend(config)
}

#[cfg(feature = "llama")]
fn load_backend(config: &ModelConfig) -> Result<Arc<dyn TextModel>, ModelError> {
    let model = LlamaTextModel::load(config)?;
    Ok(Arc::new(model))
}

#[cfg(not(feature = "llama"))]
fn load_backend(config: &ModelConfig) -> Result<Arc<dyn TextModel>, ModelError> {
    Err(ModelError::Unavailable(format!(
        "cannot load {}: built without the `llama` feature",
        config.path.display()
    )))
}

fn check_model_file(path: &Path) -> Result<(), ModelError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ModelError::Load(format!(
            "model file not found: {}",
            path.display()
        )))
    }
}
