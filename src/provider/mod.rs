//! Identity provider sign-in.
//!
//! This module handles the first leg of every check: exchanging the QA
//! account's email and password for a bearer token at the provider's
//! `signInWithPassword` endpoint. The token is wrapped in [`IdentityToken`],
//! which guarantees non-emptiness and redacts itself in debug output.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ProviderError;

/// A boxed future for async trait methods.
///
/// This type alias enables `mockall::automock` compatibility and trait object
/// usage for async methods in [`IdentityProvider`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Path of the password sign-in endpoint, relative to the provider host.
const SIGN_IN_PATH: &str = "/v1/accounts:signInWithPassword";

/// A bearer token issued by the identity provider.
///
/// The wrapper guarantees the token is non-empty and keeps it out of debug
/// output: check details end up in CI logs and bug reports, and a leaked
/// token authenticates against the real backend.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityToken(String);

impl IdentityToken {
    /// Wrap a raw token string, rejecting blank values.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::EmptyToken`] if the token is empty or
    /// whitespace-only.
    pub fn new(raw: impl Into<String>) -> Result<Self, ProviderError> {
        let value = raw.into();
        if value.trim().is_empty() {
            return Err(ProviderError::EmptyToken);
        }
        Ok(Self(value))
    }

    /// The raw token, for `Authorization` headers and request bodies.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume the wrapper and return the raw token.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdentityToken(<redacted>)")
    }
}

/// The email/password pair for the QA test account.
#[derive(Clone)]
pub struct AccountCredentials {
    /// Email of the QA test account.
    pub email: String,
    /// Password of the QA test account.
    pub password: String,
}

impl fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Request body for the password sign-in endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    /// Email of the account signing in.
    email: &'a str,
    /// Password of the account signing in.
    password: &'a str,
    /// Always true: the harness needs the ID token in the response.
    return_secure_token: bool,
}

/// The subset of the sign-in response the harness consumes.
///
/// The provider returns more fields (refresh token, expiry, local id); only
/// the ID token matters here, so everything else is ignored. A missing
/// `idToken` deserialises to an empty string and is rejected by
/// [`IdentityToken::new`].
#[derive(Debug, Deserialize)]
struct SignInResponse {
    /// The bearer token used on every backend call.
    #[serde(rename = "idToken", default)]
    id_token: String,
}

/// Trait for identity provider sign-in operations.
///
/// This trait abstracts the HTTP client to enable testing without network
/// calls. Production code uses [`RestIdentityProvider`], while tests inject
/// mock implementations via `mockall`.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityProvider: Send + Sync {
    /// Exchange account credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Rejected`] when the provider refuses the
    /// credentials, [`ProviderError::Connection`] when it cannot be reached,
    /// and [`ProviderError::EmptyToken`] when a success response carries no
    /// usable token.
    fn sign_in(
        &self,
        credentials: AccountCredentials,
    ) -> BoxFuture<'_, Result<IdentityToken, ProviderError>>;
}

/// Production implementation of [`IdentityProvider`] backed by `reqwest`.
pub struct RestIdentityProvider {
    client: reqwest::Client,
    host: String,
    api_key: String,
}

impl RestIdentityProvider {
    /// Creates a provider client for `host`, authenticating with `api_key`.
    ///
    /// A trailing slash on `host` is tolerated; the sign-in path is appended
    /// either way. The timeout applies per request.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::ClientBuild`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(
        host: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| ProviderError::ClientBuild {
                message: error.to_string(),
            })?;
        let raw_host = host.into();
        Ok(Self {
            client,
            host: raw_host.trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
        })
    }
}

impl IdentityProvider for RestIdentityProvider {
    fn sign_in(
        &self,
        credentials: AccountCredentials,
    ) -> BoxFuture<'_, Result<IdentityToken, ProviderError>> {
        Box::pin(async move {
            // The API key travels as a query parameter, not a header.
            let url = format!("{}{SIGN_IN_PATH}?key={}", self.host, self.api_key);
            debug!(email = %credentials.email, "signing in against the identity provider");

            let request = SignInRequest {
                email: &credentials.email,
                password: &credentials.password,
                return_secure_token: true,
            };
            let response = self
                .client
                .post(&url)
                .json(&request)
                .send()
                .await
                .map_err(|error| ProviderError::Connection {
                    message: error.to_string(),
                })?;

            let status = response.status();
            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("unknown error"));
                warn!(
                    status = status.as_u16(),
                    "identity provider rejected the sign-in"
                );
                return Err(ProviderError::Rejected {
                    status: status.as_u16(),
                    body,
                });
            }

            let payload: SignInResponse =
                response
                    .json()
                    .await
                    .map_err(|error| ProviderError::MalformedResponse {
                        message: error.to_string(),
                    })?;

            IdentityToken::new(payload.id_token)
        })
    }
}
