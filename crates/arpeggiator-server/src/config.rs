//! Runtime settings for the service.

use anyhow::{bail, Result};
use arpeggiator_llm::ModelConfig;
use arpeggiator_spec::RequestLimits;

/// Name shown in the banner and startup logs.
pub const APP_NAME: &str = "AI Arpeggiator";

/// Service version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// Path advertised for API documentation.
pub const DOCS_PATH: &str = "/docs";

/// Settings for `arpeggiator serve`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Text model to load at startup; `None` runs offline.
    pub model: Option<ModelConfig>,
    pub limits: RequestLimits,
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model: None,
            limits: RequestLimits::default(),
            debug: false,
        }
    }
}

impl Settings {
    /// `host:port` for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Rejects inverted or degenerate request limits.
    pub fn validate(&self) -> Result<()> {
        let limits = &self.limits;
        if limits.min_bpm == 0 || limits.min_bpm > limits.max_bpm {
            bail!(
                "invalid tempo limits: {}..={}",
                limits.min_bpm,
                limits.max_bpm
            );
        }
        if limits.min_bars == 0 || limits.min_bars > limits.max_bars {
            bail!(
                "invalid bar limits: {}..={}",
                limits.min_bars,
                limits.max_bars
            );
        }
        Ok(())
    }
}
