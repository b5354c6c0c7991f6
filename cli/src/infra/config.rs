//! Infrastructure implementation of the `ConfigStore` port.
//!
//! Resolution order: the explicit path (`--config` or `SITE_DOCTOR_CONFIG`),
//! then `./site-doctor.yaml`, then `~/.site-doctor/config.yaml`.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::{CONFIG_TEMPLATE, SiteConfig};
use crate::domain::error::ConfigError;
use crate::infra::fs::write_atomic;

/// Project-local configuration file name.
pub const LOCAL_CONFIG_FILE: &str = "site-doctor.yaml";

/// Production implementation of `ConfigStore` backed by a YAML file.
pub struct YamlConfigStore {
    explicit: Option<PathBuf>,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<SiteConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.explicit {
            return Ok(path.clone());
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Ok(local);
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(home.join(".site-doctor").join("config.yaml"))
    }

    fn write_template(&self) -> Result<PathBuf> {
        let path = self.path()?;
        if path.exists() {
            return Err(ConfigError::AlreadyExists(path.display().to_string()).into());
        }
        write_atomic(&path, CONFIG_TEMPLATE.as_bytes(), Some(0o600), false)?;
        Ok(path)
    }
}
