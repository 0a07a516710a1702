use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::errors::FitError;
use crate::wire::{GenerateRequest, GenerateResponse};

pub mod gemini;
pub mod openai;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(alias = "google")]
    Gemini,
    #[value(name = "openai", alias = "open-ai")]
    OpenAI,
}

impl ProviderKind {
    /// Provider-specific credential variable, consulted after `API_KEY`.
    pub fn key_env(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::OpenAI => "OPENAI_API_KEY",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Gemini => gemini::DEFAULT_MODEL,
            ProviderKind::OpenAI => openai::DEFAULT_MODEL,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("provider returned HTTP {status}: {}", message.as_deref().unwrap_or("<no message>"))]
    Api { status: u16, message: Option<String> },
    #[error("{0}")]
    Transport(String),
    #[error("could not decode provider envelope: {0}")]
    Decode(String),
    #[error("response was blocked: {0}")]
    Blocked(String),
    #[error("provider returned no content")]
    Empty,
}

impl ProviderError {
    /// The underlying human-readable message, when the failure carries one.
    pub fn message(&self) -> Option<String> {
        match self {
            ProviderError::Api { message, .. } => message.clone(),
            ProviderError::Transport(m) | ProviderError::Blocked(m) => Some(m.clone()),
            ProviderError::Decode(m) => Some(format!("could not decode provider envelope: {m}")),
            ProviderError::Empty => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::Transport(e.to_string())
    }
}

#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, ProviderError>;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

pub fn make_provider(cfg: &Config, api_key: String) -> Result<DynProvider, FitError> {
    let client = http_client(cfg.timeout_secs)?;
    match cfg.provider {
        ProviderKind::Gemini => Ok(Box::new(gemini::GeminiProvider::new(
            client,
            api_key,
            cfg.api_base.clone(),
        ))),
        ProviderKind::OpenAI => Ok(Box::new(openai::OpenAIProvider::new(
            client,
            api_key,
            cfg.api_base.clone(),
        ))),
    }
}

fn http_client(timeout_secs: Option<u64>) -> Result<reqwest::Client, FitError> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(std::time::Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| FitError::Configuration(format!("cannot build HTTP client: {e}")))
}

/// Pulls `error.message` out of a JSON error body; falls back to the raw body.
pub(crate) fn api_error(status: u16, body: &str) -> ProviderError {
    #[derive(Deserialize)]
    struct Envelope {
        error: Inner,
    }
    #[derive(Deserialize)]
    struct Inner {
        message: Option<String>,
    }

    let message = match serde_json::from_str::<Envelope>(body) {
        Ok(env) => env.error.message,
        Err(_) => Some(body.trim().to_string()).filter(|b| !b.is_empty()),
    };
    ProviderError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_prefers_json_message() {
        let err = api_error(429, r#"{"error":{"code":429,"message":"rate limit exceeded"}}"#);
        assert_eq!(err.message().as_deref(), Some("rate limit exceeded"));
    }

    #[test]
    fn api_error_uses_raw_body_or_nothing() {
        assert_eq!(api_error(502, "Bad Gateway\n").message().as_deref(), Some("Bad Gateway"));
        assert_eq!(api_error(500, "  ").message(), None);
    }

    #[test]
    fn provider_names_parse_from_flags() {
        assert_eq!(ProviderKind::from_str("openai", false), Ok(ProviderKind::OpenAI));
        assert_eq!(ProviderKind::from_str("open-ai", false), Ok(ProviderKind::OpenAI));
        assert_eq!(ProviderKind::from_str("google", false), Ok(ProviderKind::Gemini));
        let shown = ProviderKind::OpenAI.to_possible_value().map(|v| v.get_name().to_string());
        assert_eq!(shown.as_deref(), Some("openai"));
    }

    #[test]
    fn config_files_use_lowercase_names() {
        assert_eq!(serde_json::to_value(ProviderKind::OpenAI).unwrap(), "openai");
    }

    #[test]
    fn empty_has_no_message() {
        assert_eq!(ProviderError::Empty.message(), None);
    }
}
