use thiserror::Error;

/// Shown when a plan request fails without an underlying message.
pub const GENERATION_FALLBACK: &str =
    "Failed to generate fitness plan. The AI model may be overloaded or the request was invalid.";

/// Returned by `translate` for every provider-side failure.
pub const TRANSLATION_FAILED: &str = "Failed to translate text. Please try again.";

/// Plan body parsed but lacks `weekly_plan` or `disclaimer`.
pub const INVALID_PLAN_FORMAT: &str = "Invalid response format from API.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FitError {
    #[error("configuration error: {0}")] Configuration(String),
    #[error("{0}")] Generation(String),
    #[error("{0}")] Translation(String),
    #[error("invalid form input: {0}")] Form(String),
    #[error("speech playback failed: {0}")] Speech(String),
}

impl FitError {
    pub fn generation(message: Option<String>) -> Self {
        match message {
            Some(m) if !m.trim().is_empty() => FitError::Generation(m),
            _ => FitError::Generation(GENERATION_FALLBACK.to_string()),
        }
    }

    pub fn translation() -> Self {
        FitError::Translation(TRANSLATION_FAILED.to_string())
    }

    /// User-facing text, without any category prefix.
    pub fn user_message(&self) -> String {
        match self {
            FitError::Generation(m) | FitError::Translation(m) => m.clone(),
            other => other.to_string(),
        }
    }
}
