use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::FitError;
use crate::provider::ProviderKind;

/// Checked before the provider-specific variable.
pub const API_KEY_ENV: &str = "API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderKind,
    /// Defaults to the provider's model when unset.
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub plan_temperature: f32,
    pub translate_temperature: f32,
    pub narration_language: String,
    pub speech_lang: String,
    pub speech_rate: f32,
    /// TTS program; `None` uses `espeak-ng` when it is on PATH.
    pub speech_command: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            model: None,
            api_base: None,
            plan_temperature: 0.7,
            translate_temperature: 0.2,
            narration_language: "Hindi".into(),
            speech_lang: "hi-IN".into(),
            speech_rate: 0.9,
            speech_command: None,
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Reads a TOML file; keys it omits keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FitError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| FitError::Configuration(e.to_string()))?;
        toml::from_str(&raw)
            .map_err(|e| FitError::Configuration(format!("{}: {e}", path.display())))
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or_else(|| self.provider.default_model())
    }

    /// The credential from `API_KEY` or the provider's own variable. Missing
    /// credentials are fatal at startup.
    pub fn api_key(&self) -> Result<String, FitError> {
        self.api_key_from(|name| std::env::var(name).ok())
    }

    pub fn api_key_from(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String, FitError> {
        let provider_env = self.provider.key_env();
        [API_KEY_ENV, provider_env]
            .into_iter()
            .filter_map(|name| lookup(name))
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty())
            .ok_or_else(|| {
                FitError::Configuration(format!(
                    "{API_KEY_ENV} environment variable not set (or {provider_env})"
                ))
            })
    }
}
