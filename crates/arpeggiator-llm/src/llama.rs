//! llama.cpp backend for GGUF models.

use std::fmt::Display;
use std::num::NonZeroU32;
use std::sync::Mutex;

use llama_cpp_2::context::params::LlamaContextParams;
use llama_cpp_2::llama_backend::LlamaBackend;
use llama_cpp_2::llama_batch::LlamaBatch;
use llama_cpp_2::model::params::LlamaModelParams;
use llama_cpp_2::model::{AddBos, LlamaModel, Special};
use llama_cpp_2::sampling::LlamaSampler;

use crate::{ModelConfig, ModelError, SamplingParams, TextModel};

struct Loaded {
    backend: LlamaBackend,
    model: LlamaModel,
}

/// A GGUF model run through llama.cpp.
///
/// Inference is serialized: one generation runs at a time, and each call
/// gets a fresh context so requests never share a KV cache.
pub struct LlamaTextModel {
    name: String,
    context_size: u32,
    inner: Mutex<Loaded>,
}

impl LlamaTextModel {
    /// Initializes the llama.cpp backend and loads weights from disk.
    ///
    /// The backend can be initialized once per process.
    pub fn load(config: &ModelConfig) -> Result<Self, ModelError> {
        let backend = LlamaBackend::init().map_err(load_error)?;
        let model =
            LlamaModel::load_from_file(&backend, &config.path, &LlamaModelParams::default())
                .map_err(load_error)?;

        let name = config.display_name();
        log::info!("Loaded text model {} from {}", name, config.path.display());

        Ok(Self {
            name,
            context_size: config.context_size,
            inner: Mutex::new(Loaded { backend, model }),
        })
    }
}

impl TextModel for LlamaTextModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn generate(&self, prompt: &str, params: &SamplingParams) -> Result<String, ModelError> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| ModelError::Inference("model lock poisoned".to_string()))?;
        let Loaded { backend, model } = &*guard;

        let ctx_params = LlamaContextParams::default().with_n_ctx(NonZeroU32::new(self.context_size));
        let mut ctx = model
            .new_context(backend, ctx_params)
            .map_err(inference_error)?;

        let tokens = model
            .str_to_token(prompt, AddBos::Always)
            .map_err(inference_error)?;
        let window = self.context_size as usize;
        if tokens.is_empty() || tokens.len() + params.max_new_tokens > window {
            return Err(ModelError::Inference(format!(
                "prompt of {} tokens does not fit a {}-token context",
                tokens.len(),
                window
            )));
        }

        let mut batch = LlamaBatch::new(window, 1);
        let last = tokens.len() - 1;
        for (i, token) in tokens.iter().enumerate() {
            batch
                .add(*token, i as i32, &[0], i == last)
                .map_err(inference_error)?;
        }
        ctx.decode(&mut batch).map_err(inference_error)?;

        // temperature before truncation
        let mut sampler = LlamaSampler::chain_simple([
            LlamaSampler::temp(params.temperature),
            LlamaSampler::top_k(params.top_k),
            LlamaSampler::top_p(params.top_p, 1),
            LlamaSampler::dist(params.seed),
        ]);

        let mut position = batch.n_tokens();
        // Byte-fallback tokens can split a UTF-8 character, so pieces are
        // joined as bytes and decoded once at the end.
        let mut bytes = Vec::new();
        for _ in 0..params.max_new_tokens {
            // sample() also accepts the token into the chain
            let token = sampler.sample(&ctx, batch.n_tokens() - 1);
            if model.is_eog_token(token) {
                break;
            }
            let piece = model
                .token_to_bytes(token, Special::Tokenize)
                .map_err(inference_error)?;
            bytes.extend_from_slice(&piece);

            batch.clear();
            batch
                .add(token, position, &[0], true)
                .map_err(inference_error)?;
            position += 1;
            ctx.decode(&mut batch).map_err(inference_error)?;
        }

        log::debug!("{} produced {} bytes", self.name, bytes.len());
        Ok(decode_lossy(&bytes))
    }
}

/// Decodes sampled bytes, replacing invalid sequences with U+FFFD.
fn decode_lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn load_error(e: impl Display) -> ModelError {
    ModelError::Load(e.to_string())
}

fn inference_error(e: impl Display) -> ModelError {
    ModelError::Inference(e.to_string())
}
