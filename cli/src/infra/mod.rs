//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, the
//! `ssh` transport, HTTP, DNS, archive packing, and filesystem access.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod archive;
pub mod command_runner;
pub mod config;
pub mod fs;
pub mod http;
pub mod network;
pub mod secrets;
pub mod ssh;
pub mod state;
