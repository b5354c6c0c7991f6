//! Domain layer — pure types, classification, rendering, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod deploy_log;
pub mod error;
pub mod health;
pub mod poll;
pub mod probe;
pub mod remote;
pub mod templates;
pub mod upload;
pub mod verify;

pub use config::{SiteConfig, validate_config};
pub use error::{ConfigError, RemoteError, TemplateError};
pub use health::{CheckResult, DiagnosisReport, collect_issues};
pub use probe::{ProbeResult, SiteCondition};
pub use remote::RemoteOutcome;
