//! Smoke-test harness for the StudyUp backend API.
//!
//! `studyup-qa` signs in against the hosted identity provider, then drives the
//! StudyUp backend the way the mobile client does: verify the token, list the
//! QA account's classes, and request an AI-generated reply. Each step becomes
//! a check record, and the collected report decides the process exit code.
//!
//! # Architecture
//!
//! The suite is deliberately sequential: the login check produces the bearer
//! token every other check needs, so a failed login marks the remaining checks
//! as skipped instead of reporting one genuine failure and two cascades.
//! Connection-level failures are kept distinct from rejections throughout,
//! because "the service is down" and "the service said no" call for different
//! responses from whoever reads the report.
//!
//! # Modules
//!
//! - [`backend`]: REST client for the StudyUp backend endpoints
//! - [`config`]: Configuration system with layered precedence (CLI > env > file > defaults)
//! - [`error`]: Semantic error types for the harness
//! - [`provider`]: Identity provider sign-in client
//! - [`report`]: Check records, run reports, and output formatting
//! - [`suite`]: Check orchestration and grading

pub mod backend;
pub mod config;
pub mod error;
pub mod provider;
pub mod report;
pub mod suite;
