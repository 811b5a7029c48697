//! Backend API client.
//!
//! This module covers the three backend routes the harness exercises: token
//! verification, class listing, and AI reply generation. The listing and AI
//! routes authenticate with a bearer token; verification carries the token in
//! its request body instead.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::BackendError;
use crate::provider::{BoxFuture, IdentityToken};

/// Path of the token verification endpoint.
const LOGIN_PATH: &str = "/api/auth/login";
/// Path of the class listing endpoint.
const CLASSES_PATH: &str = "/api/classes";
/// Path of the AI generation endpoint.
const AI_PATH: &str = "/api/ia/gerar";

/// Request body for the token verification endpoint.
#[derive(Debug, Serialize)]
struct LoginVerifyRequest {
    /// The provider token the backend should verify.
    token: String,
}

/// Response body of a successful token verification.
#[derive(Debug, Deserialize)]
pub struct LoginConfirmation {
    /// Human-readable confirmation from the backend.
    #[serde(default)]
    pub message: String,
}

/// One class record from the listing endpoint.
///
/// The harness only counts records, so the shape is deliberately loose: any
/// JSON object deserialises, and only the name is retained for diagnostics.
#[derive(Debug, Deserialize)]
pub struct ClassRecord {
    /// Display name of the class, when present.
    #[serde(default)]
    pub name: String,
}

/// Request body for the AI generation endpoint.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    /// The prompt forwarded to the model.
    prompt: &'a str,
}

/// Response body of the AI generation endpoint.
#[derive(Debug, Deserialize)]
pub struct AiReply {
    /// The generated reply. The field name follows the backend's wire contract.
    #[serde(default)]
    pub resposta: String,
}

/// Trait for backend API operations.
///
/// This trait abstracts the HTTP client to enable testing without network
/// calls. Production code uses [`RestBackendClient`], while tests inject mock
/// implementations via `mockall`.
#[cfg_attr(test, mockall::automock)]
pub trait BackendApi: Send + Sync {
    /// Verify a provider token against the backend session endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Rejected`] when the backend refuses the token
    /// and [`BackendError::Connection`] when it cannot be reached.
    fn verify_login(
        &self,
        token: IdentityToken,
    ) -> BoxFuture<'_, Result<LoginConfirmation, BackendError>>;

    /// List the classes visible to the authenticated QA account.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Rejected`] when the backend refuses the token
    /// and [`BackendError::Connection`] when it cannot be reached.
    fn list_classes(
        &self,
        token: IdentityToken,
    ) -> BoxFuture<'_, Result<Vec<ClassRecord>, BackendError>>;

    /// Ask the backend AI endpoint to generate a reply for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Rejected`] when the backend refuses the request
    /// and [`BackendError::Connection`] when it cannot be reached.
    fn generate_reply(
        &self,
        token: IdentityToken,
        prompt: String,
    ) -> BoxFuture<'_, Result<AiReply, BackendError>>;
}

/// Production implementation of [`BackendApi`] backed by `reqwest`.
pub struct RestBackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl RestBackendClient {
    /// Creates a backend client for `base_url`.
    ///
    /// A trailing slash on `base_url` is tolerated; endpoint paths are
    /// appended either way. The timeout applies per request.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::ClientBuild`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| BackendError::ClientBuild {
                message: error.to_string(),
            })?;
        let raw_base = base_url.into();
        Ok(Self {
            client,
            base_url: raw_base.trim_end_matches('/').to_owned(),
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }
}

/// Map a transport-level error onto the endpoint that was being called.
fn connection_error(endpoint: &'static str, error: &reqwest::Error) -> BackendError {
    BackendError::Connection {
        endpoint,
        message: error.to_string(),
    }
}

/// Check the response status, converting non-success answers into
/// [`BackendError::Rejected`] with the body preserved for diagnostics.
async fn ensure_success(
    endpoint: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("unknown error"));
    warn!(
        endpoint,
        status = status.as_u16(),
        "backend rejected the request"
    );
    Err(BackendError::Rejected {
        endpoint,
        status: status.as_u16(),
        body,
    })
}

/// Decode a JSON body, mapping failures to [`BackendError::MalformedResponse`].
async fn parse_json<T: DeserializeOwned>(
    endpoint: &'static str,
    response: reqwest::Response,
) -> Result<T, BackendError> {
    response
        .json()
        .await
        .map_err(|error| BackendError::MalformedResponse {
            endpoint,
            message: error.to_string(),
        })
}

impl BackendApi for RestBackendClient {
    fn verify_login(
        &self,
        token: IdentityToken,
    ) -> BoxFuture<'_, Result<LoginConfirmation, BackendError>> {
        Box::pin(async move {
            debug!(endpoint = LOGIN_PATH, "verifying the provider token");
            let request = LoginVerifyRequest {
                token: token.into_inner(),
            };
            let raw = self
                .client
                .post(self.endpoint_url(LOGIN_PATH))
                .json(&request)
                .send()
                .await
                .map_err(|error| connection_error(LOGIN_PATH, &error))?;
            let response = ensure_success(LOGIN_PATH, raw).await?;
            parse_json(LOGIN_PATH, response).await
        })
    }

    fn list_classes(
        &self,
        token: IdentityToken,
    ) -> BoxFuture<'_, Result<Vec<ClassRecord>, BackendError>> {
        Box::pin(async move {
            debug!(endpoint = CLASSES_PATH, "listing classes");
            let raw = self
                .client
                .get(self.endpoint_url(CLASSES_PATH))
                .header("Authorization", format!("Bearer {}", token.as_str()))
                .send()
                .await
                .map_err(|error| connection_error(CLASSES_PATH, &error))?;
            let response = ensure_success(CLASSES_PATH, raw).await?;
            parse_json(CLASSES_PATH, response).await
        })
    }

    fn generate_reply(
        &self,
        token: IdentityToken,
        prompt: String,
    ) -> BoxFuture<'_, Result<AiReply, BackendError>> {
        Box::pin(async move {
            debug!(endpoint = AI_PATH, "requesting an AI reply");
            let request = GenerateRequest { prompt: &prompt };
            let raw = self
                .client
                .post(self.endpoint_url(AI_PATH))
                .header("Authorization", format!("Bearer {}", token.as_str()))
                .json(&request)
                .send()
                .await
                .map_err(|error| connection_error(AI_PATH, &error))?;
            let response = ensure_success(AI_PATH, raw).await?;
            parse_json(AI_PATH, response).await
        })
    }
}
