//! Scenario state for QA suite BDD tests.

use std::sync::Arc;

use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use studyup_qa::report::RunReport;
use tokio::runtime::Runtime;
use wiremock::MockServer;

/// Convenience alias for step outcomes.
pub type StepResult<T> = Result<T, String>;

/// The API key the mock provider expects as a query parameter.
pub(crate) const TEST_API_KEY: &str = "test-api-key";
/// The token the mock provider issues and the mock backend accepts.
pub(crate) const TEST_TOKEN: &str = "token-abc123";

/// State shared across QA suite scenarios.
#[derive(Default, ScenarioState)]
pub struct QaSuiteState {
    /// Runtime shared by every step, so mock servers stay alive between steps.
    pub(crate) runtime: Slot<Arc<Runtime>>,
    /// Mock identity provider.
    pub(crate) provider: Slot<Arc<MockServer>>,
    /// Mock backend.
    pub(crate) backend: Slot<Arc<MockServer>>,
    /// Backend URL override for scenarios without a live mock backend.
    pub(crate) backend_url: Slot<String>,
    /// The report produced by the run under test.
    pub(crate) report: Slot<RunReport>,
}

/// Fixture providing fresh state for each scenario.
#[rstest::fixture]
pub fn qa_suite_state() -> QaSuiteState {
    QaSuiteState::default()
}
