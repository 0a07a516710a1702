use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, instrument};

use super::{api_error, Provider, ProviderError};
use crate::wire::{GenerateRequest, GenerateResponse};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<PartOut<'a>>,
}

#[derive(Debug, Serialize)]
struct PartOut<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartIn>,
}

#[derive(Debug, Deserialize)]
struct PartIn {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    api_base: String,
}

impl GeminiProvider {
    pub fn new(client: Client, api_key: String, api_base: Option<String>) -> Self {
        Self {
            client,
            api_key,
            api_base: api_base.unwrap_or_else(|| API_BASE_URL.to_string()),
        }
    }

    fn url(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.api_base.trim_end_matches('/'))
    }
}

fn build_body(req: &GenerateRequest) -> GeminiRequest<'_> {
    GeminiRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![PartOut { text: &req.prompt }],
        }],
        generation_config: GenerationConfig {
            temperature: req.temperature,
            response_mime_type: req.wants_json().then_some("application/json"),
            response_schema: req.response_schema.as_ref(),
        },
    }
}

/// Concatenates the text parts of the first candidate.
fn extract_text(resp: GeminiResponse) -> Result<String, ProviderError> {
    if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(ProviderError::Blocked(reason));
    }
    let candidate = resp
        .candidates
        .and_then(|c| c.into_iter().next())
        .ok_or(ProviderError::Empty)?;
    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.is_empty() {
        return match candidate.finish_reason {
            Some(r) if r != "STOP" => Err(ProviderError::Blocked(r)),
            _ => Err(ProviderError::Empty),
        };
    }
    Ok(text)
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip(self, req), fields(id = %req.id, model = %req.model))]
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        let url = self.url(&req.model);
        debug!(json = req.wants_json(), "POST {url}");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&build_body(req))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        debug!(status = %status, bytes = body.len(), "gemini responded");

        if !status.is_success() {
            error!(status = %status, "gemini API error");
            return Err(api_error(status.as_u16(), &body));
        }

        let parsed: GeminiResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;
        Ok(GenerateResponse { text: extract_text(parsed)? })
    }
}
