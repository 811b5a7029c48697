//! Given and When step definitions for QA suite BDD tests.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use rstest_bdd_macros::{given, when};
use serde_json::json;
use studyup_qa::backend::RestBackendClient;
use studyup_qa::provider::{AccountCredentials, RestIdentityProvider};
use studyup_qa::suite::{DEFAULT_PROMPT, run_suite};
use tokio::runtime::Runtime;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::state::{QaSuiteState, StepResult, TEST_API_KEY, TEST_TOKEN};

/// Get or create the runtime shared by every step in a scenario.
///
/// Mock servers spawn background tasks onto the runtime that started them,
/// so every step must block on the same runtime.
fn ensure_runtime(qa_suite_state: &QaSuiteState) -> StepResult<Arc<Runtime>> {
    if let Some(runtime) = qa_suite_state.runtime.get() {
        return Ok(runtime);
    }
    let created = Runtime::new()
        .map_err(|error| format!("failed to create tokio runtime for scenario: {error}"))?;
    let shared = Arc::new(created);
    qa_suite_state.runtime.set(Arc::clone(&shared));
    Ok(shared)
}

/// Get or create the mock identity provider server.
fn ensure_provider(qa_suite_state: &QaSuiteState) -> StepResult<Arc<MockServer>> {
    if let Some(server) = qa_suite_state.provider.get() {
        return Ok(server);
    }
    let runtime = ensure_runtime(qa_suite_state)?;
    let server = Arc::new(runtime.block_on(MockServer::start()));
    qa_suite_state.provider.set(Arc::clone(&server));
    Ok(server)
}

/// Get or create the mock backend server.
fn ensure_backend(qa_suite_state: &QaSuiteState) -> StepResult<Arc<MockServer>> {
    if let Some(server) = qa_suite_state.backend.get() {
        return Ok(server);
    }
    let runtime = ensure_runtime(qa_suite_state)?;
    let server = Arc::new(runtime.block_on(MockServer::start()));
    qa_suite_state.backend.set(Arc::clone(&server));
    Ok(server)
}

/// Mount an AI generation stub returning `reply` on the backend mock.
fn mount_ai_reply(qa_suite_state: &QaSuiteState, reply: String) -> StepResult<()> {
    let runtime = ensure_runtime(qa_suite_state)?;
    let server = ensure_backend(qa_suite_state)?;
    runtime.block_on(
        Mock::given(method("POST"))
            .and(path("/api/ia/gerar"))
            .and(header("Authorization", format!("Bearer {TEST_TOKEN}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"resposta": reply})))
            .mount(&server),
    );
    Ok(())
}

#[given("the identity provider issues a token for the QA account")]
fn provider_issues_token(qa_suite_state: &QaSuiteState) -> StepResult<()> {
    let runtime = ensure_runtime(qa_suite_state)?;
    let server = ensure_provider(qa_suite_state)?;
    runtime.block_on(
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithPassword"))
            .and(query_param("key", TEST_API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "idToken": TEST_TOKEN,
                "email": "qa-bot@studyup.example",
                "refreshToken": "refresh-xyz",
                "expiresIn": "3600",
                "localId": "qa-bot-uid"
            })))
            .mount(&server),
    );
    Ok(())
}

#[given("the identity provider rejects the QA credentials")]
fn provider_rejects_credentials(qa_suite_state: &QaSuiteState) -> StepResult<()> {
    let runtime = ensure_runtime(qa_suite_state)?;
    let server = ensure_provider(qa_suite_state)?;
    runtime.block_on(
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithPassword"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": 400, "message": "INVALID_PASSWORD"}
            })))
            .mount(&server),
    );
    Ok(())
}

#[given("the backend accepts the verified token")]
fn backend_accepts_token(qa_suite_state: &QaSuiteState) -> StepResult<()> {
    let runtime = ensure_runtime(qa_suite_state)?;
    let server = ensure_backend(qa_suite_state)?;
    runtime.block_on(
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({"token": TEST_TOKEN})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Login verificado com sucesso",
                "user": {"uid": "qa-bot-uid", "email": "qa-bot@studyup.example"}
            })))
            .mount(&server),
    );
    Ok(())
}

#[given("the backend rejects the token as expired")]
fn backend_rejects_token(qa_suite_state: &QaSuiteState) -> StepResult<()> {
    let runtime = ensure_runtime(qa_suite_state)?;
    let server = ensure_backend(qa_suite_state)?;
    runtime.block_on(
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"message": "Token inválido ou expirado"})),
            )
            .mount(&server),
    );
    Ok(())
}

#[given("the backend lists {count} classes")]
fn backend_lists_classes(qa_suite_state: &QaSuiteState, count: usize) -> StepResult<()> {
    let runtime = ensure_runtime(qa_suite_state)?;
    let server = ensure_backend(qa_suite_state)?;
    let records: Vec<serde_json::Value> = (0..count)
        .map(|index| json!({"id": format!("class-{index}"), "name": format!("Turma {index}")}))
        .collect();
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/api/classes"))
            .and(header("Authorization", format!("Bearer {TEST_TOKEN}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(records)))
            .mount(&server),
    );
    Ok(())
}

#[given("the backend replies to prompts with {reply}")]
fn backend_replies_with(qa_suite_state: &QaSuiteState, reply: String) -> StepResult<()> {
    mount_ai_reply(qa_suite_state, reply)
}

#[given("the backend reply is blank")]
fn backend_reply_is_blank(qa_suite_state: &QaSuiteState) -> StepResult<()> {
    mount_ai_reply(qa_suite_state, String::new())
}

#[given("the backend is offline")]
fn backend_is_offline(qa_suite_state: &QaSuiteState) -> StepResult<()> {
    // Bind and immediately release a port so connections to it are refused.
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|error| format!("failed to bind probe listener: {error}"))?;
    let port = listener
        .local_addr()
        .map_err(|error| format!("listener should report its address: {error}"))?
        .port();
    drop(listener);
    qa_suite_state
        .backend_url
        .set(format!("http://127.0.0.1:{port}"));
    Ok(())
}

/// Resolve the backend URL for the run: an explicit offline URL wins,
/// otherwise the mock backend is used (created on demand when no given step
/// stubbed any route).
fn resolve_backend_url(qa_suite_state: &QaSuiteState) -> StepResult<String> {
    if let Some(url) = qa_suite_state.backend_url.get() {
        return Ok(url);
    }
    let server = ensure_backend(qa_suite_state)?;
    Ok(server.uri())
}

#[when("the full check suite runs")]
fn run_full_suite(qa_suite_state: &QaSuiteState) -> StepResult<()> {
    let runtime = ensure_runtime(qa_suite_state)?;
    let provider_server = qa_suite_state
        .provider
        .get()
        .ok_or_else(|| String::from("the identity provider should be configured"))?;
    let backend_url = resolve_backend_url(qa_suite_state)?;

    let provider = RestIdentityProvider::new(
        provider_server.uri(),
        TEST_API_KEY,
        Duration::from_secs(5),
    )
    .map_err(|error| format!("provider construction failed: {error}"))?;
    let backend = RestBackendClient::new(backend_url, Duration::from_secs(5))
        .map_err(|error| format!("backend construction failed: {error}"))?;
    let credentials = AccountCredentials {
        email: String::from("qa-bot@studyup.example"),
        password: String::from("correct-horse-battery"),
    };

    let report = runtime.block_on(run_suite(&provider, &backend, credentials, DEFAULT_PROMPT));
    qa_suite_state.report.set(report);
    Ok(())
}
