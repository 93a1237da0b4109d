//! Shared service state.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use arpeggiator_engine::ArpeggioGenerator;
use arpeggiator_llm::ModelConfig;
use arpeggiator_spec::RequestLimits;

use crate::config::Settings;

/// State shared by every request handler.
///
/// The generator is installed once by the startup loader. Until then the
/// service reports itself as initializing.
pub struct AppState {
    settings: Settings,
    generator: OnceLock<Arc<ArpeggioGenerator>>,
}

impl AppState {
    /// State for a service whose generator is still loading.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            generator: OnceLock::new(),
        }
    }

    /// State with the generator already installed.
    pub fn ready(settings: Settings, generator: ArpeggioGenerator) -> Self {
        let state = Self::new(settings);
        state.install(generator);
        state
    }

    /// Installs the generator. Returns `false` if one was already installed.
    pub fn install(&self, generator: ArpeggioGenerator) -> bool {
        self.generator.set(Arc::new(generator)).is_ok()
    }

    pub fn generator(&self) -> Option<&Arc<ArpeggioGenerator>> {
        self.generator.get()
    }

    pub fn is_ready(&self) -> bool {
        self.generator.get().is_some()
    }

    /// Whether a real text model backs the generator.
    pub fn model_loaded(&self) -> bool {
        self.generator
            .get()
            .map(|g| g.model_loaded())
            .unwrap_or(false)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn limits(&self) -> &RequestLimits {
        &self.settings.limits
    }
}

/// Builds a generator around the configured text model.
///
/// A model that fails to load is logged and replaced by the offline model,
/// so a generator is always produced. Blocking while weights load.
pub fn build_generator(model: Option<&ModelConfig>) -> ArpeggioGenerator {
    let Some(config) = model else {
        log::info!("No text model configured; ai-generated patterns use fallbacks");
        return ArpeggioGenerator::offline();
    };

    log::info!("Loading text model from {}", config.path.display());
    let start = Instant::now();
    match arpeggiator_llm::load_model(config) {
        Ok(model) => {
            log::info!("Text model {} ready in {:.1?}", model.name(), start.elapsed());
            ArpeggioGenerator::new(model)
        }
        Err(e) => {
            log::error!(
                "Failed to load text model: {}; continuing with fallback patterns",
                e
            );
            ArpeggioGenerator::offline()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_once() {
        let state = AppState::new(Settings::default());
        assert!(!state.is_ready());
        assert!(state.install(ArpeggioGenerator::offline()));
        assert!(state.is_ready());
        assert!(!state.install(ArpeggioGenerator::offline()));
        assert!(!state.model_loaded());
    }

    #[test]
    fn test_unloadable_model_falls_back_to_offline() {
        let config = ModelConfig::new("/no/such/model.gguf");
        let generator = build_generator(Some(&config));
        assert!(!generator.model_loaded());
        assert_eq!(generator.model_name(), "offline");
    }
}
