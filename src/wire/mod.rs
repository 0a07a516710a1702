use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// ========================================
/// Provider-agnostic "generate content" call
/// ========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Correlates log lines for one call.
    pub id: Uuid,
    pub model: String,
    pub prompt: String,
    /// When present the provider is asked for JSON matching this schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
    pub temperature: f32,
}

impl GenerateRequest {
    pub fn text(model: impl Into<String>, prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            model: model.into(),
            prompt: prompt.into(),
            response_schema: None,
            temperature,
        }
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn wants_json(&self) -> bool {
        self.response_schema.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub text: String,
}
