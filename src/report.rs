//! Check reporting and output formatting.
//!
//! Every command collects its results into a [`RunReport`] and renders it
//! through [`OutputWriter`], which switches between the human-readable text
//! form and pretty-printed JSON. Keeping the format switch here keeps it out
//! of the command handlers entirely.

use std::fmt;
use std::io::Write;

use serde::Serialize;

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per check plus a summary line.
    #[default]
    Text,
    /// Pretty-printed JSON, suitable for CI consumption.
    Json,
}

/// The checks the harness knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckName {
    /// Sign-in against the identity provider plus backend token verification.
    Login,
    /// Listing classes from the backend.
    Classes,
    /// Generating a reply from the backend AI endpoint.
    Ai,
}

impl CheckName {
    /// The lowercase name used in both text and JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Classes => "classes",
            Self::Ai => "ai",
        }
    }
}

impl fmt::Display for CheckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of a single check.
///
/// `Failed` and `Unreachable` are kept distinct: a failed check means the
/// service answered and the answer was wrong, while an unreachable check means
/// no HTTP exchange happened at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// The check ran and the response met the contract.
    Passed,
    /// The check ran but the response looks suspect.
    Warning,
    /// The service answered with a rejection or a malformed body.
    Failed,
    /// The service could not be reached at all.
    Unreachable,
    /// The check did not run because a prerequisite check failed.
    Skipped,
}

impl CheckStatus {
    /// The marker shown in front of each text report line.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Passed => "✅",
            Self::Warning => "⚠️",
            Self::Failed => "❌",
            Self::Unreachable => "⛔",
            Self::Skipped => "⏭️",
        }
    }

    /// Whether this status should fail the overall run.
    ///
    /// Warnings and skips keep the exit code at zero; rejections and
    /// connection failures do not.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Unreachable)
    }
}

/// The recorded outcome of one check, with a human-readable detail line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRecord {
    /// Which check produced this record.
    pub check: CheckName,
    /// How the check turned out.
    pub status: CheckStatus,
    /// One line of detail: what passed, what was rejected, or why it was skipped.
    pub detail: String,
}

impl CheckRecord {
    /// Record a passing check.
    #[must_use]
    pub const fn passed(check: CheckName, detail: String) -> Self {
        Self {
            check,
            status: CheckStatus::Passed,
            detail,
        }
    }

    /// Record a check that ran but produced a suspect response.
    #[must_use]
    pub const fn warning(check: CheckName, detail: String) -> Self {
        Self {
            check,
            status: CheckStatus::Warning,
            detail,
        }
    }

    /// Record a check the service rejected.
    #[must_use]
    pub const fn failed(check: CheckName, detail: String) -> Self {
        Self {
            check,
            status: CheckStatus::Failed,
            detail,
        }
    }

    /// Record a check whose service never answered.
    #[must_use]
    pub const fn unreachable(check: CheckName, detail: String) -> Self {
        Self {
            check,
            status: CheckStatus::Unreachable,
            detail,
        }
    }

    /// Record a check that was skipped because a prerequisite failed.
    #[must_use]
    pub const fn skipped(check: CheckName, detail: String) -> Self {
        Self {
            check,
            status: CheckStatus::Skipped,
            detail,
        }
    }
}

/// The collected outcome of a harness run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    checks: Vec<CheckRecord>,
}

/// Per-status totals used by the text summary line.
#[derive(Default)]
struct Totals {
    passed: usize,
    warnings: usize,
    failed: usize,
    unreachable: usize,
    skipped: usize,
}

impl RunReport {
    /// Append a check record to the report.
    pub fn push(&mut self, record: CheckRecord) {
        self.checks.push(record);
    }

    /// The recorded checks, in the order they ran.
    #[must_use]
    pub fn checks(&self) -> &[CheckRecord] {
        &self.checks
    }

    /// Whether any recorded check should fail the overall run.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(|record| record.status.is_failure())
    }

    fn totals(&self) -> Totals {
        let mut totals = Totals::default();
        for record in &self.checks {
            match record.status {
                CheckStatus::Passed => totals.passed += 1,
                CheckStatus::Warning => totals.warnings += 1,
                CheckStatus::Failed => totals.failed += 1,
                CheckStatus::Unreachable => totals.unreachable += 1,
                CheckStatus::Skipped => totals.skipped += 1,
            }
        }
        totals
    }
}

/// Trait for human-readable text rendering.
///
/// Implemented by every CLI output payload alongside `serde::Serialize`.
pub trait Render {
    /// Write the text form of this payload to `w`.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised by the underlying writer.
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}

impl Render for RunReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        for record in &self.checks {
            writeln!(
                w,
                "{} {}: {}",
                record.status.marker(),
                record.check,
                record.detail
            )?;
        }
        let totals = self.totals();
        writeln!(
            w,
            "{} passed, {} warnings, {} failed, {} unreachable, {} skipped",
            totals.passed, totals.warnings, totals.failed, totals.unreachable, totals.skipped
        )?;
        Ok(())
    }
}

/// Abstraction for writing CLI output in different formats.
///
/// Command handlers call `writer.render(&payload)` where `payload` implements
/// both `Serialize` (for JSON) and `Render` (for text).
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    /// Create a new output writer with the specified format.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render a payload to stdout.
    ///
    /// For `Text` format, delegates to `Render::render_text()`.
    /// For `Json` format, serialises via `serde_json`.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while writing to stdout.
    pub fn render<T: Render + Serialize>(&self, payload: &T) -> std::io::Result<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        match self.format {
            OutputFormat::Text => {
                payload.render_text(&mut handle)?;
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut handle, payload)?;
                writeln!(handle)?;
            }
        }
        Ok(())
    }
}
