//! `studyup-qa` application entry point.
//!
//! This binary drives smoke-test checks against a StudyUp deployment. It uses
//! `eyre` for opaque error handling at the application boundary, converting
//! domain-specific errors into human-readable reports.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/studyup-qa/config.toml` or path from `STUDYUP_QA_CONFIG_PATH`)
//! 3. Environment variables (`STUDYUP_QA_*`)
//! 4. Command-line arguments

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use eyre::{Report, Result as EyreResult};
use studyup_qa::backend::RestBackendClient;
use studyup_qa::config::{AppConfig, Cli, Commands, load_config};
use studyup_qa::error::Result as QaResult;
use studyup_qa::provider::{AccountCredentials, RestIdentityProvider};
use studyup_qa::report::{OutputWriter, RunReport};
use studyup_qa::suite;
use tokio::runtime::Runtime;

/// Application entry point.
///
/// Loads configuration with layered precedence via `OrthoConfig`, runs the
/// selected checks on a fresh Tokio runtime, and renders the report. Any
/// failed or unreachable check makes the process exit non-zero, so CI can
/// gate on the harness directly.
fn main() -> EyreResult<ExitCode> {
    // Parse CLI first (for subcommand dispatch and global options).
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the rendered report.
    tracing_subscriber::fmt()
        .with_env_filter(&cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration with layered precedence: defaults < file < env < CLI.
    // The CLI is passed to extract --config and --base-url.
    let config = load_config(&cli).map_err(Report::from)?;

    let runtime = Runtime::new()?;
    let report = runtime
        .block_on(run(&cli, &config))
        .map_err(Report::from)?;

    OutputWriter::new(cli.format).render(&report)?;
    Ok(if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Execute the selected checks, returning domain-specific errors.
///
/// Keeps semantic errors inside the run loop so the CLI boundary owns
/// conversion to `eyre::Report`.
async fn run(cli: &Cli, config: &AppConfig) -> QaResult<RunReport> {
    let identity = config.identity.validate()?;
    let timeout = Duration::from_secs(config.backend.timeout_secs);

    let provider = RestIdentityProvider::new(identity.host, identity.api_key, timeout)?;
    let credentials = AccountCredentials {
        email: identity.email,
        password: identity.password,
    };
    let backend = RestBackendClient::new(config.backend.base_url.clone(), timeout)?;

    let report = match &cli.command {
        Commands::Run => {
            suite::run_suite(&provider, &backend, credentials, suite::DEFAULT_PROMPT).await
        }
        Commands::Login => suite::run_login(&provider, &backend, credentials).await,
        Commands::Classes => suite::run_classes(&provider, &backend, credentials).await,
        Commands::Ai(args) => {
            let prompt = args.prompt.as_deref().unwrap_or(suite::DEFAULT_PROMPT);
            suite::run_ai(&provider, &backend, credentials, prompt).await
        }
    };
    Ok(report)
}
