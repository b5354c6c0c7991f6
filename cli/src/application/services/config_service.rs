//! Application service — configuration use-cases.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::{SiteConfig, validate_config};

/// Load configuration without validating it.
///
/// # Errors
///
/// Returns an error if no configuration is found or it cannot be parsed.
pub fn load_config(store: &impl ConfigStore) -> Result<SiteConfig> {
    store.load()
}

/// Load configuration and validate the values site commands depend on.
///
/// # Errors
///
/// Returns an error if loading fails or validation rejects the values.
pub fn load_validated(store: &impl ConfigStore) -> Result<SiteConfig> {
    let config = store.load()?;
    validate_config(&config)?;
    Ok(config)
}

/// Scaffold a starter configuration.
///
/// # Errors
///
/// Returns an error if a configuration already exists or cannot be written.
pub fn init_config(store: &impl ConfigStore) -> Result<PathBuf> {
    store.write_template()
}
