use fitplan_gen::config::{Config, API_KEY_ENV};
use fitplan_gen::errors::FitError;
use fitplan_gen::provider::ProviderKind;
use serial_test::serial;
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn partial_file_keeps_defaults() {
    let file = write_config(
        r#"
provider = "openai"
narration_language = "Tamil"
speech_lang = "ta-IN"
timeout_secs = 30
"#,
    );
    let cfg = Config::load(file.path()).unwrap();

    assert_eq!(cfg.provider, ProviderKind::OpenAI);
    assert_eq!(cfg.model(), "gpt-4.1-mini");
    assert_eq!(cfg.narration_language, "Tamil");
    assert_eq!(cfg.speech_lang, "ta-IN");
    assert_eq!(cfg.timeout_secs, Some(30));
    assert_eq!(cfg.plan_temperature, 0.7);
    assert_eq!(cfg.speech_rate, 0.9);
}

#[test]
fn explicit_model_wins() {
    let file = write_config("model = \"gemini-2.5-pro\"\n");
    assert_eq!(Config::load(file.path()).unwrap().model(), "gemini-2.5-pro");
}

#[test]
fn malformed_file_is_configuration_error() {
    let file = write_config("provider = [\n");
    let err = Config::load(file.path()).unwrap_err();
    assert!(matches!(err, FitError::Configuration(_)), "{err:?}");
}

#[test]
fn missing_file_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, FitError::Configuration(_)));
}

#[test]
#[serial]
fn api_key_read_from_environment() {
    std::env::set_var(API_KEY_ENV, "test-key");
    let key = Config::default().api_key();
    std::env::remove_var(API_KEY_ENV);
    assert_eq!(key.unwrap(), "test-key");
}

#[test]
#[serial]
fn provider_variable_used_without_generic_one() {
    std::env::remove_var(API_KEY_ENV);
    std::env::set_var("GEMINI_API_KEY", "gemini-key");
    let key = Config::default().api_key();
    std::env::remove_var("GEMINI_API_KEY");
    assert_eq!(key.unwrap(), "gemini-key");
}
