//! Configuration data types for studyup-qa.

use std::fmt;

use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// Backend connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize, SmartDefault)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend under test.
    #[default = "http://localhost:3000"]
    pub base_url: String,

    /// Per-request timeout in seconds, applied to provider and backend calls alike.
    #[default = 30]
    pub timeout_secs: u64,
}

/// Identity provider configuration.
///
/// The provider issues the bearer token the backend checks expect. The three
/// credential fields have no sensible defaults and must come from the
/// configuration file, environment variables, or CLI.
#[derive(Debug, Clone, Deserialize, Serialize, SmartDefault)]
#[serde(default)]
pub struct IdentityConfig {
    /// Host of the identity provider issuing sign-in tokens.
    #[default = "https://identitytoolkit.googleapis.com"]
    pub host: String,

    /// Web API key passed as the `key` query parameter on sign-in.
    pub api_key: Option<String>,

    /// Email of the QA test account.
    pub email: Option<String>,

    /// Password of the QA test account.
    pub password: Option<String>,
}

/// Validated identity credentials, ready for the sign-in call.
///
/// A value of this type is only obtainable through [`IdentityConfig::validate`],
/// so holding one means every credential field was present and non-blank.
#[derive(Clone)]
pub struct IdentitySettings {
    /// Host of the identity provider.
    pub host: String,
    /// Web API key.
    pub api_key: String,
    /// Email of the QA test account.
    pub email: String,
    /// Password of the QA test account.
    pub password: String,
}

impl fmt::Debug for IdentitySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentitySettings")
            .field("host", &self.host)
            .field("api_key", &"<redacted>")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Clone a credential field, recording its name when absent or blank.
fn require_field(
    value: &Option<String>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text.clone(),
        _ => {
            missing.push(name);
            String::new()
        }
    }
}

impl IdentityConfig {
    /// Validates that all required credential fields are present and non-blank.
    ///
    /// Blank strings count as missing: an empty `STUDYUP_QA_IDENTITY_API_KEY`
    /// in the environment must not slip through as a usable credential. Call
    /// this before constructing the provider client.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` if any credential field is absent
    /// or blank, with the field names listed in the error message.
    pub fn validate(&self) -> crate::error::Result<IdentitySettings> {
        let mut missing = Vec::new();
        let api_key = require_field(&self.api_key, "identity.api_key", &mut missing);
        let email = require_field(&self.email, "identity.email", &mut missing);
        let password = require_field(&self.password, "identity.password", &mut missing);
        if !missing.is_empty() {
            return Err(crate::error::ConfigError::MissingRequired {
                field: missing.join(", "),
            }
            .into());
        }
        Ok(IdentitySettings {
            host: self.host.clone(),
            api_key,
            email,
            password,
        })
    }
}

/// Root application configuration.
///
/// This structure is loaded from configuration files, environment variables,
/// and command-line arguments with layered precedence. The precedence order
/// (lowest to highest) is: defaults, configuration file, environment variables,
/// command-line arguments.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `STUDYUP_QA_CONFIG_PATH` environment variable
/// 2. `.studyup-qa.toml` in the current working directory
/// 3. `.studyup-qa.toml` in the home directory
/// 4. `~/.config/studyup-qa/config.toml` (XDG default)
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "STUDYUP_QA",
    post_merge_hook,
    discovery(
        app_name = "studyup-qa",
        env_var = "STUDYUP_QA_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".studyup-qa.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// Backend connection configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub backend: BackendConfig,

    /// Identity provider configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub identity: IdentityConfig,
}

impl PostMergeHook for AppConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        // Placeholder for future normalisation logic.
        // Identity validation is intentionally NOT performed here because
        // `IdentityConfig::validate` names the exact missing fields, which a
        // merge-time OrthoError would not.
        Ok(())
    }
}
