mod common;

use common::{plan_json, rate_limited, scripted_service};
use fitplan_gen::errors::{FitError, GENERATION_FALLBACK, INVALID_PLAN_FORMAT, TRANSLATION_FAILED};
use fitplan_gen::model::UserAttributes;
use fitplan_gen::provider::ProviderError;
use serde_json::json;

#[tokio::test]
async fn valid_body_yields_plan() {
    let (service, script) = scripted_service(vec![Ok(plan_json(4).to_string())]);
    let plan = service.generate_plan(&UserAttributes::default()).await.unwrap();

    assert_eq!(plan.weekly_plan.len(), 4);
    assert_eq!(plan.weekly_plan[0].day, "Monday");
    assert_eq!(plan.weekly_plan[0].exercises[0].sets, "3-4");
    assert!(plan.disclaimer.starts_with("Consult"));
    assert_eq!(script.calls(), 1);
}

#[tokio::test]
async fn plan_request_carries_schema_and_plan_temperature() {
    let (service, script) = scripted_service(vec![Ok(plan_json(4).to_string()), Ok("नमस्ते".into())]);
    service.generate_plan(&UserAttributes::default()).await.unwrap();
    service.translate("Hello", "Hindi").await.unwrap();

    let reqs = script.requests();
    assert!(reqs[0].wants_json());
    assert_eq!(reqs[0].temperature, 0.7);
    assert!(reqs[0].prompt.contains("exactly 4 workout days"));
    assert!(!reqs[1].wants_json());
    assert_eq!(reqs[1].temperature, 0.2);
    assert!(reqs[1].prompt.contains("Hindi"));
}

#[tokio::test]
async fn missing_sections_are_generation_errors() {
    let mut no_disclaimer = plan_json(2);
    no_disclaimer.as_object_mut().unwrap().remove("disclaimer");
    let mut no_days = plan_json(2);
    no_days.as_object_mut().unwrap().remove("weekly_plan");

    for body in [no_disclaimer, no_days, json!({})] {
        let (service, _) = scripted_service(vec![Ok(body.to_string())]);
        let err = service.generate_plan(&UserAttributes::default()).await.unwrap_err();
        assert_eq!(err, FitError::Generation(INVALID_PLAN_FORMAT.into()), "{body}");
    }
}

#[tokio::test]
async fn unparseable_bodies_are_generation_errors() {
    let full = plan_json(1).to_string();
    let truncated = full[..full.len() / 2].to_string();
    let fenced = format!("```json\n{full}\n```");

    for body in [truncated, fenced, "Sure! Here is your plan.".to_string()] {
        let (service, _) = scripted_service(vec![Ok(body.clone())]);
        let err = service.generate_plan(&UserAttributes::default()).await.unwrap_err();
        assert!(matches!(err, FitError::Generation(_)), "{body}: {err:?}");
    }
}

#[tokio::test]
async fn fewer_days_than_requested_is_accepted() {
    let (service, _) = scripted_service(vec![Ok(plan_json(3).to_string())]);
    let attrs = UserAttributes { days_per_week: 5, ..Default::default() };
    let plan = service.generate_plan(&attrs).await.unwrap();
    assert_eq!(plan.weekly_plan.len(), 3);
}

#[tokio::test]
async fn provider_message_is_surfaced_verbatim() {
    let (service, _) = scripted_service(vec![Err(rate_limited())]);
    let err = service.generate_plan(&UserAttributes::default()).await.unwrap_err();
    assert_eq!(err.user_message(), "rate limit exceeded");
}

#[tokio::test]
async fn provider_failure_without_message_uses_fallback() {
    let (service, _) = scripted_service(vec![
        Err(ProviderError::Empty),
        Err(ProviderError::Api { status: 500, message: None }),
    ]);
    for _ in 0..2 {
        let err = service.generate_plan(&UserAttributes::default()).await.unwrap_err();
        assert_eq!(err.user_message(), GENERATION_FALLBACK);
    }
}

#[tokio::test]
async fn translation_is_trimmed_and_unvalidated() {
    let (service, _) = scripted_service(vec![Ok("  \n सोमवार, फोकस: छाती।\n ".into()), Ok("{not json".into())]);
    assert_eq!(service.translate("Monday", "Hindi").await.unwrap(), "सोमवार, फोकस: छाती।");
    assert_eq!(service.translate("Tuesday", "Hindi").await.unwrap(), "{not json");
}

#[tokio::test]
async fn translation_failure_hides_provider_message() {
    let (service, _) = scripted_service(vec![Err(rate_limited())]);
    let err = service.translate("Monday", "Hindi").await.unwrap_err();
    assert_eq!(err, FitError::translation());
    assert_eq!(err.user_message(), TRANSLATION_FAILED);
}

#[tokio::test]
async fn failures_are_not_retried() {
    let (service, script) = scripted_service(vec![Err(rate_limited()), Ok(plan_json(4).to_string())]);
    assert!(service.generate_plan(&UserAttributes::default()).await.is_err());
    assert_eq!(script.calls(), 1);
}
