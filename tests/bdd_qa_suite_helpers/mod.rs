//! Behavioural step helpers for QA suite scenarios.

mod state;
mod steps;

pub use state::{QaSuiteState, qa_suite_state};
