//! Command-line argument definitions for studyup-qa.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

use crate::report::OutputFormat;

/// Command-line interface for studyup-qa.
#[derive(Debug, Parser)]
#[command(name = "studyup-qa")]
#[command(
    author,
    version,
    about = "Smoke-test harness for the StudyUp backend API"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Base URL of the backend under test.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format for the check report.
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log filter directive for diagnostics on stderr (e.g. `info`, `studyup_qa=debug`).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full check suite: login, classes listing, AI generation.
    Run,

    /// Run only the login check.
    Login,

    /// Run only the classes listing check (signs in first).
    Classes,

    /// Run only the AI generation check (signs in first).
    Ai(AiArgs),
}

/// Arguments for the `ai` subcommand.
#[derive(Debug, Parser)]
pub struct AiArgs {
    /// Prompt to send instead of the built-in default.
    #[arg(long)]
    pub prompt: Option<String>,
}
