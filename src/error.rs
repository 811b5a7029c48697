//! Semantic error types for the studyup-qa harness.
//!
//! This module defines the error hierarchy for studyup-qa, following the principle
//! of using semantic error enums (via `thiserror`) for conditions the caller might
//! inspect, gate a downstream check on, or fold into a check status, while
//! reserving opaque errors (`eyre::Report`) for the application boundary.

use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A required configuration value is missing.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The name of the missing field.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error during configuration loading.
    ///
    /// This wraps errors from the layered configuration system, including:
    /// - Configuration file parsing errors
    /// - Environment variable parsing errors
    /// - CLI argument parsing errors
    /// - Missing required fields after layer merging
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors that can occur while signing in against the identity provider.
///
/// Rejections and connection failures are deliberately distinct variants: a
/// rejection means the provider answered and refused the credentials, while a
/// connection failure means no HTTP exchange happened at all. The check suite
/// reports the two differently.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The identity provider answered with a non-success status.
    #[error("identity provider rejected the sign-in (status {status}): {body}")]
    Rejected {
        /// The HTTP status code returned by the provider.
        status: u16,
        /// The response body, kept for diagnostics.
        body: String,
    },

    /// The identity provider could not be reached at all.
    #[error("identity provider unreachable: {message}")]
    Connection {
        /// A description of the connection failure.
        message: String,
    },

    /// The provider answered 200 but the body does not match the sign-in contract.
    #[error("identity provider returned a malformed response: {message}")]
    MalformedResponse {
        /// A description of the decoding failure.
        message: String,
    },

    /// The provider accepted the credentials but the token field was empty.
    #[error("identity provider returned an empty token")]
    EmptyToken,

    /// The HTTP client could not be constructed.
    #[error("failed to build the identity provider client: {message}")]
    ClientBuild {
        /// A description of the build failure.
        message: String,
    },
}

/// Errors that can occur while exercising the backend API.
///
/// Every variant carries the endpoint path so a failed check names the exact
/// route that misbehaved.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend answered with a non-success status.
    #[error("backend rejected the request to {endpoint} (status {status}): {body}")]
    Rejected {
        /// The endpoint path that was called.
        endpoint: &'static str,
        /// The HTTP status code returned by the backend.
        status: u16,
        /// The response body, kept for diagnostics.
        body: String,
    },

    /// The backend could not be reached at all.
    #[error("backend unreachable at {endpoint}: {message}")]
    Connection {
        /// The endpoint path that was called.
        endpoint: &'static str,
        /// A description of the connection failure.
        message: String,
    },

    /// The backend answered 200 but the body does not match the endpoint contract.
    #[error("backend returned a malformed response from {endpoint}: {message}")]
    MalformedResponse {
        /// The endpoint path that was called.
        endpoint: &'static str,
        /// A description of the decoding failure.
        message: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build the backend client: {message}")]
    ClientBuild {
        /// A description of the build failure.
        message: String,
    },
}

/// Top-level error type for the studyup-qa harness.
///
/// This enum aggregates all domain-specific errors into a single type that can
/// be used throughout the application. At the application boundary (main.rs),
/// these errors are typically converted to `eyre::Report` for human-readable
/// error reporting.
#[derive(Debug, Error)]
pub enum QaError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred while signing in against the identity provider.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// An error occurred while exercising the backend API.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// A specialised `Result` type for studyup-qa operations.
pub type Result<T> = std::result::Result<T, QaError>;
