//! Shared fixtures and helper functions for config tests.

use crate::config::AppConfig;
use ortho_config::MergeComposer;
use rstest::fixture;
use std::sync::Arc;

/// Fixture providing an `AppConfig` parsed from a full TOML example.
#[fixture]
pub fn app_config_from_full_toml() -> AppConfig {
    let toml = r#"
        [backend]
        base_url = "http://qa.studyup.example:3000"
        timeout_secs = 5

        [identity]
        host = "https://identity.studyup.example"
        api_key = "test-api-key"
        email = "qa-bot@studyup.example"
        password = "correct-horse-battery"
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Fixture providing an `AppConfig` parsed from a minimal TOML example.
#[fixture]
pub fn app_config_from_partial_toml() -> AppConfig {
    let toml = r#"
        [backend]
        base_url = "http://127.0.0.1:4000"
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Helper: Creates a `MergeComposer` with defaults layer already pushed.
pub fn create_composer_with_defaults() -> Result<MergeComposer, serde_json::Error> {
    let mut composer = MergeComposer::new();
    let defaults = ortho_config::serde_json::to_value(AppConfig::default())?;
    composer.push_defaults(defaults);
    Ok(composer)
}

/// Helper: Merges layers from a composer into `AppConfig`.
pub fn merge_config(composer: MergeComposer) -> Result<AppConfig, Arc<ortho_config::OrthoError>> {
    AppConfig::merge_from_layers(composer.layers())
}

/// Helper: Asserts that a config's identity section has default values.
pub fn assert_identity_defaults(config: &AppConfig) {
    assert_eq!(
        config.identity.host, "https://identitytoolkit.googleapis.com",
        "identity.host should be the default provider host"
    );
    assert!(
        config.identity.api_key.is_none(),
        "identity.api_key should be None"
    );
    assert!(
        config.identity.email.is_none(),
        "identity.email should be None"
    );
    assert!(
        config.identity.password.is_none(),
        "identity.password should be None"
    );
}

/// Helper: Asserts that a config has all default values.
pub fn assert_config_has_defaults(config: &AppConfig) {
    assert_eq!(
        config.backend.base_url, "http://localhost:3000",
        "backend.base_url should be the localhost default"
    );
    assert_eq!(
        config.backend.timeout_secs, 30,
        "backend.timeout_secs should be 30"
    );
    assert_identity_defaults(config);
}

/// Helper: Creates a `MergeComposer` with defaults, file, and env layers for testing layer precedence.
///
/// This builder pattern reduces duplication in tests that verify environment and CLI layer
/// precedence by providing pre-configured file and environment layers.
pub fn create_composer_with_file_and_env() -> Result<MergeComposer, serde_json::Error> {
    use ortho_config::serde_json::json;

    let mut composer = create_composer_with_defaults()?;

    // Standard file layer for precedence tests
    composer.push_file(
        json!({
            "backend": { "base_url": "http://from-file:3000" },
            "identity": { "email": "file@studyup.example" }
        }),
        None,
    );

    // Standard environment layer for precedence tests
    composer.push_environment(json!({
        "backend": { "base_url": "http://from-env:3000" }
    }));

    Ok(composer)
}
