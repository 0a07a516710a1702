use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, instrument};

use super::{api_error, Provider, ProviderError};
use crate::schema::strict_object_schema;
use crate::wire::{GenerateRequest, GenerateResponse};

pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
const API_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible chat completions. The prompt goes out as a single user
/// message; an attached schema becomes a strict `json_schema` response format.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    api_base: String,
}

impl OpenAIProvider {
    pub fn new(client: Client, api_key: String, api_base: Option<String>) -> Self {
        Self {
            client,
            api_key,
            api_base: api_base.unwrap_or_else(|| API_BASE_URL.to_string()),
        }
    }
}

fn build_body(req: &GenerateRequest) -> Value {
    let mut body = json!({
        "model": req.model,
        "messages": [{ "role": "user", "content": req.prompt }],
        "temperature": req.temperature,
    });
    if let Some(schema) = &req.response_schema {
        body["response_format"] = json!({
            "type": "json_schema",
            "json_schema": {
                "name": "fitness_plan",
                "strict": true,
                "schema": strict_object_schema(schema),
            }
        });
    }
    body
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

fn extract_text(resp: ChatResponse) -> Result<String, ProviderError> {
    let msg = resp.choices.into_iter().next().ok_or(ProviderError::Empty)?.message;
    if let Some(refusal) = msg.refusal {
        return Err(ProviderError::Blocked(refusal));
    }
    msg.content.filter(|c| !c.is_empty()).ok_or(ProviderError::Empty)
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    #[instrument(skip(self, req), fields(id = %req.id, model = %req.model))]
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        debug!(json = req.wants_json(), "POST {url}");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&build_body(req))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        debug!(status = %status, bytes = text.len(), "openai responded");

        if !status.is_success() {
            error!(status = %status, "openai API error");
            return Err(api_error(status.as_u16(), &text));
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::Decode(e.to_string()))?;
        Ok(GenerateResponse { text: extract_text(parsed)? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fitness_plan_schema;

    #[test]
    fn schema_becomes_strict_response_format() {
        let req = GenerateRequest::text("gpt-4.1-mini", "plan", 0.7).with_schema(fitness_plan_schema());
        let body = build_body(&req);
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
        assert_eq!(body["response_format"]["json_schema"]["schema"]["additionalProperties"], false);
        assert_eq!(body["messages"][0]["content"], "plan");
    }

    #[test]
    fn plain_request_has_no_response_format() {
        let body = build_body(&GenerateRequest::text("m", "x", 0.2));
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn refusal_is_blocked() {
        let resp: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": null, "refusal": "no"}}]
        }))
        .unwrap();
        assert_eq!(extract_text(resp), Err(ProviderError::Blocked("no".into())));
    }
}
