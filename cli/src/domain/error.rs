//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors raised while resolving or validating the site configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No configuration found. Run 'site-doctor config init' to create one.")]
    NotFound,

    #[error("Configuration already exists at {0}. Remove it first or edit it in place.")]
    AlreadyExists(String),

    #[error("Invalid site URL '{0}': must start with http:// or https://")]
    InvalidUrl(String),

    #[error("Invalid remote port: 0")]
    InvalidPort,

    #[error("Invalid project root '{0}': must be an absolute path")]
    RelativeProjectRoot(String),

    #[error("Missing value for {0}")]
    MissingValue(&'static str),
}

// ── Template errors ───────────────────────────────────────────────────────────

/// Errors raised while rendering remote file templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Remote path must not be empty")]
    EmptyPath,

    #[error("Remote path contains a NUL byte: {0:?}")]
    NulInPath(String),

    #[error("Could not pick a heredoc delimiter that does not occur in the body")]
    DelimiterCollision,
}

// ── Remote errors ─────────────────────────────────────────────────────────────

/// Errors raised before a remote command can be issued.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("No remote host configured. Set remote.host in the configuration file.")]
    NotConfigured,
}
