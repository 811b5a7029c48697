//! Configuration system for studyup-qa.
//!
//! This module provides the configuration structures and CLI definitions for the
//! studyup-qa harness. Configuration loading and precedence merging is handled by
//! the `ortho_config` crate. Intended precedence: CLI flags override environment
//! variables, which override configuration files, which override defaults.
//!
//! The configuration file is expected at `~/.config/studyup-qa/config.toml` by
//! default.
//!
//! # Example Configuration
//!
//! ```toml
//! [backend]
//! base_url = "http://localhost:3000"
//! timeout_secs = 30
//!
//! [identity]
//! host = "https://identitytoolkit.googleapis.com"
//! api_key = "AIzaSy-example-key"
//! email = "qa-bot@studyup.example"
//! password = "hunter2-but-longer"
//! ```

mod cli;
mod loader;
mod types;


pub use cli::{AiArgs, Cli, Commands};
pub use loader::{env_var_names, load_config};
pub use types::{AppConfig, BackendConfig, IdentityConfig, IdentitySettings};
