//! Command implementations

pub mod config;
pub mod diagnose;
pub mod env;
pub mod exec;
pub mod guide;
pub mod links;
pub mod monitor;
pub mod repair;
pub mod report;
pub mod status;
pub mod upload;
pub mod verify;
pub mod version;
