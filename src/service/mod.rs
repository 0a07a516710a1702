use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::config::Config;
use crate::errors::{FitError, INVALID_PLAN_FORMAT};
use crate::model::{FitnessPlan, UserAttributes};
use crate::prompt::{build_plan_prompt, build_translation_prompt};
use crate::provider::DynProvider;
use crate::schema::fitness_plan_schema;
use crate::wire::GenerateRequest;

/// Issues plan and translation requests against one provider. Each call is a
/// single attempt; failures are returned, never retried.
pub struct PlanService {
    provider: DynProvider,
    model: String,
    plan_temperature: f32,
    translate_temperature: f32,
}

impl PlanService {
    pub fn new(provider: DynProvider, cfg: &Config) -> Self {
        Self {
            provider,
            model: cfg.model().to_string(),
            plan_temperature: cfg.plan_temperature,
            translate_temperature: cfg.translate_temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip_all, fields(provider = self.provider.name(), days = attributes.days_per_week))]
    pub async fn generate_plan(&self, attributes: &UserAttributes) -> Result<FitnessPlan, FitError> {
        let req = GenerateRequest::text(&self.model, build_plan_prompt(attributes), self.plan_temperature)
            .with_schema(fitness_plan_schema());

        let resp = self.provider.generate(&req).await.map_err(|e| {
            error!(id = %req.id, error = %e, "error generating fitness plan");
            FitError::generation(e.message())
        })?;

        let plan = parse_plan(&resp.text).inspect_err(|e| {
            error!(id = %req.id, error = %e, "rejected plan response");
        })?;
        if plan.weekly_plan.len() != usize::from(attributes.days_per_week) {
            warn!(
                requested = attributes.days_per_week,
                returned = plan.weekly_plan.len(),
                "plan day count differs from request"
            );
        }
        info!(id = %req.id, days = plan.weekly_plan.len(), "fitness plan generated");
        Ok(plan)
    }

    #[instrument(skip(self, text), fields(provider = self.provider.name(), chars = text.len()))]
    pub async fn translate(&self, text: &str, target_language: &str) -> Result<String, FitError> {
        let req = GenerateRequest::text(
            &self.model,
            build_translation_prompt(text, target_language),
            self.translate_temperature,
        );
        match self.provider.generate(&req).await {
            Ok(resp) => Ok(resp.text.trim().to_string()),
            Err(e) => {
                error!(id = %req.id, error = %e, "error translating text to {target_language}");
                Err(FitError::translation())
            }
        }
    }
}

/// Parses a schema-constrained body. Top-level presence is checked first so a
/// missing section reports the fixed format message; the typed decode then
/// validates every day and exercise field.
pub fn parse_plan(raw: &str) -> Result<FitnessPlan, FitError> {
    let value: Value =
        serde_json::from_str(raw.trim()).map_err(|e| FitError::Generation(e.to_string()))?;

    let has_days = value.get("weekly_plan").is_some_and(|v| !v.is_null());
    let has_disclaimer = value
        .get("disclaimer")
        .is_some_and(|v| !v.is_null() && v.as_str() != Some(""));
    if !has_days || !has_disclaimer {
        return Err(FitError::Generation(INVALID_PLAN_FORMAT.to_string()));
    }

    serde_json::from_value(value)
        .map_err(|e| FitError::Generation(format!("{INVALID_PLAN_FORMAT} {e}")))
}
