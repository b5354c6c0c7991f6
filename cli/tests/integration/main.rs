//! Integration tests for site-doctor CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! Nothing here needs network access: remote and HTTP targets are either
//! absent or point at closed local ports.

mod config_command;
mod report_command;
mod upload_command;
