//! Application services — use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports` — never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod artifacts;
pub mod config_service;
pub mod remote_exec;
pub mod site_diagnose;
pub mod site_repair;
pub mod site_status;
pub mod status_poller;
pub mod upload;
pub mod verification;
