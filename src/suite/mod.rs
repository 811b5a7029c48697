//! Smoke-test checks and suite orchestration.
//!
//! Each check exercises one backend capability end to end and produces a
//! [`CheckRecord`]. The full suite runs the login check first and gates the
//! remaining checks on its token: when login fails, the class listing and AI
//! checks are recorded as skipped instead of piling on cascade failures.

use crate::backend::BackendApi;
use crate::error::{BackendError, ProviderError};
use crate::provider::{AccountCredentials, IdentityProvider, IdentityToken};
use crate::report::{CheckName, CheckRecord, RunReport};

/// The prompt sent by the AI check when the user does not supply one.
pub const DEFAULT_PROMPT: &str =
    "Explique brevemente o que é um laço For em programação para um aluno iniciante.";

/// Replies at or below this length are graded as warnings.
const MIN_REPLY_CHARS: usize = 10;
/// How much of a passing reply is quoted in the report.
const PREVIEW_CHARS: usize = 100;

/// The result of the login check: its record plus the token for later checks.
#[derive(Debug)]
pub struct LoginOutcome {
    /// The record describing how the login check went.
    pub record: CheckRecord,
    /// The verified token, present only when both sign-in and backend
    /// verification succeeded.
    pub token: Option<IdentityToken>,
}

/// Run the login check: provider sign-in followed by backend verification.
///
/// The returned token is `Some` only when both steps succeed, so downstream
/// checks can gate on it directly.
pub async fn login_check(
    provider: &dyn IdentityProvider,
    backend: &dyn BackendApi,
    credentials: AccountCredentials,
) -> LoginOutcome {
    let token = match provider.sign_in(credentials).await {
        Ok(token) => token,
        Err(error) => {
            return LoginOutcome {
                record: provider_failure_record(&error),
                token: None,
            };
        }
    };
    match backend.verify_login(token.clone()).await {
        Ok(confirmation) => {
            let detail = if confirmation.message.is_empty() {
                String::from("backend accepted the token")
            } else {
                format!("backend accepted the token: {}", confirmation.message)
            };
            LoginOutcome {
                record: CheckRecord::passed(CheckName::Login, detail),
                token: Some(token),
            }
        }
        Err(error) => LoginOutcome {
            record: backend_failure_record(CheckName::Login, &error),
            token: None,
        },
    }
}

/// Run the class listing check, or skip it when no token is available.
///
/// An empty listing passes: a fresh environment with zero classes is a valid
/// deployment, and the record carries the count either way.
pub async fn classes_check(
    backend: &dyn BackendApi,
    token: Option<&IdentityToken>,
) -> CheckRecord {
    let Some(bearer) = token else {
        return CheckRecord::skipped(
            CheckName::Classes,
            String::from("no token from the login check"),
        );
    };
    match backend.list_classes(bearer.clone()).await {
        Ok(classes) => CheckRecord::passed(
            CheckName::Classes,
            format!("listing returned {} classes", classes.len()),
        ),
        Err(error) => backend_failure_record(CheckName::Classes, &error),
    }
}

/// Run the AI generation check, or skip it when no token is available.
///
/// A 200 response only passes when the reply is long enough to be a real
/// answer; shorter replies are recorded as warnings rather than failures.
pub async fn ai_check(
    backend: &dyn BackendApi,
    token: Option<&IdentityToken>,
    prompt: &str,
) -> CheckRecord {
    let Some(bearer) = token else {
        return CheckRecord::skipped(
            CheckName::Ai,
            String::from("no token from the login check"),
        );
    };
    match backend
        .generate_reply(bearer.clone(), prompt.to_owned())
        .await
    {
        Ok(reply) => grade_reply(&reply.resposta),
        Err(error) => backend_failure_record(CheckName::Ai, &error),
    }
}

/// Run the full suite: login first, then the checks that need its token.
///
/// A failed login does not abort the run; the remaining checks are recorded
/// as skipped, so a suite report always lists all three checks.
pub async fn run_suite(
    provider: &dyn IdentityProvider,
    backend: &dyn BackendApi,
    credentials: AccountCredentials,
    prompt: &str,
) -> RunReport {
    let mut report = RunReport::default();
    let outcome = login_check(provider, backend, credentials).await;
    report.push(outcome.record);
    report.push(classes_check(backend, outcome.token.as_ref()).await);
    report.push(ai_check(backend, outcome.token.as_ref(), prompt).await);
    report
}

/// Run only the login check.
pub async fn run_login(
    provider: &dyn IdentityProvider,
    backend: &dyn BackendApi,
    credentials: AccountCredentials,
) -> RunReport {
    let mut report = RunReport::default();
    let outcome = login_check(provider, backend, credentials).await;
    report.push(outcome.record);
    report
}

/// Sign in and run only the class listing check.
///
/// When sign-in fails, the report carries the sign-in failure and a skipped
/// listing record instead of a spurious listing failure.
pub async fn run_classes(
    provider: &dyn IdentityProvider,
    backend: &dyn BackendApi,
    credentials: AccountCredentials,
) -> RunReport {
    let mut report = RunReport::default();
    match provider.sign_in(credentials).await {
        Ok(token) => report.push(classes_check(backend, Some(&token)).await),
        Err(error) => {
            report.push(provider_failure_record(&error));
            report.push(classes_check(backend, None).await);
        }
    }
    report
}

/// Sign in and run only the AI generation check.
pub async fn run_ai(
    provider: &dyn IdentityProvider,
    backend: &dyn BackendApi,
    credentials: AccountCredentials,
    prompt: &str,
) -> RunReport {
    let mut report = RunReport::default();
    match provider.sign_in(credentials).await {
        Ok(token) => report.push(ai_check(backend, Some(&token), prompt).await),
        Err(error) => {
            report.push(provider_failure_record(&error));
            report.push(ai_check(backend, None, prompt).await);
        }
    }
    report
}

/// Grade a 200 response from the AI endpoint.
///
/// The backend answers 200 even when the model produced nothing usable, so
/// length is the contract: anything at or below [`MIN_REPLY_CHARS`] characters
/// is suspect. Lengths count characters, not bytes, because replies are
/// Portuguese text full of multi-byte accents.
fn grade_reply(reply: &str) -> CheckRecord {
    let chars = reply.chars().count();
    if chars > MIN_REPLY_CHARS {
        let preview: String = reply.chars().take(PREVIEW_CHARS).collect();
        CheckRecord::passed(
            CheckName::Ai,
            format!("reply received ({chars} chars): {preview}"),
        )
    } else {
        CheckRecord::warning(
            CheckName::Ai,
            format!("status 200 but the reply has only {chars} chars"),
        )
    }
}

/// Map a provider error onto a login record, keeping rejections distinct from
/// outages.
fn provider_failure_record(error: &ProviderError) -> CheckRecord {
    match error {
        ProviderError::Connection { .. } => {
            CheckRecord::unreachable(CheckName::Login, error.to_string())
        }
        _ => CheckRecord::failed(CheckName::Login, error.to_string()),
    }
}

/// Map a backend error onto a record for `check`, keeping rejections distinct
/// from outages.
fn backend_failure_record(check: CheckName, error: &BackendError) -> CheckRecord {
    match error {
        BackendError::Connection { .. } => CheckRecord::unreachable(check, error.to_string()),
        _ => CheckRecord::failed(check, error.to_string()),
    }
}
