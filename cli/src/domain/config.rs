//! Domain types and validators for the site configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.
//! Secrets are never part of this schema; only paths to files holding them.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::poll::PollPolicy;
use crate::domain::upload::UploadConfig;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration, stored as YAML.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// The deployed site.
    pub site: SiteSection,
    /// SSH access to the hosting account.
    pub remote: RemoteConfig,
    /// Database settings rendered into `.env`.
    pub database: DatabaseConfig,
    /// Status poller limits.
    pub poll: PollConfig,
    /// What `upload` packs from the local project.
    pub upload: UploadConfig,
    /// Directory for generated artifacts and the deploy log.
    pub output_dir: PathBuf,
}

/// Site URLs and paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Application name rendered into `.env`.
    pub name: String,
    /// Public site URL.
    pub url: String,
    /// Absolute project root on the remote host.
    pub project_root: String,
    /// Path of the database setup script, relative to the site URL.
    pub db_setup_path: String,
    /// Path of the admin panel, relative to the site URL.
    pub admin_path: String,
    /// Path of the health endpoint, relative to the site URL.
    pub health_path: String,
    /// Hosting control panel URL, shown by `links` and the guide.
    pub panel_url: Option<String>,
    /// Mail host rendered into `.env`.
    pub mail_host: String,
    /// Substrings expected in the live page body.
    pub markers: Vec<String>,
    /// Local files that must exist before a deployment.
    pub required_files: Vec<String>,
    /// Local log files listed by `status`.
    pub log_files: Vec<String>,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            name: "Laravel".to_string(),
            url: String::new(),
            project_root: String::new(),
            db_setup_path: "database_setup.php".to_string(),
            admin_path: "admin".to_string(),
            health_path: "api/health".to_string(),
            panel_url: None,
            mail_host: "localhost".to_string(),
            markers: Vec::new(),
            required_files: Vec::new(),
            log_files: vec![DEPLOY_LOG_FILE.to_string()],
        }
    }
}

/// SSH connection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    /// Private key passed to `ssh -i`.
    pub identity_file: Option<PathBuf>,
    /// File holding the SSH password, passed to `sshpass -f`.
    pub password_file: Option<PathBuf>,
    pub connect_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 22,
            user: String::new(),
            identity_file: None,
            password_file: None,
            connect_timeout_secs: 30,
        }
    }
}

impl RemoteConfig {
    /// `user@host:port`, for display.
    #[must_use]
    pub fn display_target(&self) -> String {
        format!("{}@{}:{}", self.user, self.host, self.port)
    }
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    pub name: String,
    pub user: String,
    /// File holding the database password.
    pub password_file: Option<PathBuf>,
}

/// Poller limits, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_secs: u64,
    pub max_attempts: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub request_timeout_secs: u64,
    pub summary_every: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        let policy = PollPolicy::default();
        Self {
            interval_secs: policy.interval.as_secs(),
            max_attempts: policy.max_attempts,
            timeout_secs: policy.deadline.map(|d| d.as_secs()),
            request_timeout_secs: policy.request_timeout.as_secs(),
            summary_every: policy.summary_every,
        }
    }
}

impl PollConfig {
    /// Convert to a [`PollPolicy`]. A limit of `0` means unbounded.
    #[must_use]
    pub fn policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_secs(self.interval_secs),
            max_attempts: self.max_attempts.filter(|&n| n > 0),
            deadline: self
                .timeout_secs
                .filter(|&secs| secs > 0)
                .map(Duration::from_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            summary_every: self.summary_every,
        }
    }
}

// ── Constants ────────────────────────────────────────────────────────────────

/// File name of the JSON deploy log inside `output_dir`.
pub const DEPLOY_LOG_FILE: &str = "deployment_log.json";

/// Environment variable consulted for the database password.
pub const DB_PASSWORD_ENV: &str = "SITE_DOCTOR_DB_PASSWORD";

// ── URL helpers ──────────────────────────────────────────────────────────────

impl SiteConfig {
    /// Join a relative path onto the site URL.
    #[must_use]
    pub fn site_url(&self, path: &str) -> String {
        let base = self.site.url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            format!("{base}/")
        } else {
            format!("{base}/{path}")
        }
    }

    /// Host part of the site URL, without scheme, port or path.
    #[must_use]
    pub fn site_host(&self) -> Option<&str> {
        let rest = self
            .site
            .url
            .strip_prefix("https://")
            .or_else(|| self.site.url.strip_prefix("http://"))?;
        let host = rest.split(['/', ':', '?', '#']).next()?;
        (!host.is_empty()).then_some(host)
    }

    /// Named URLs shown by `links`: site, database setup, admin, hosting panel.
    #[must_use]
    pub fn links(&self) -> Vec<(&'static str, String)> {
        let mut links = vec![
            ("Website", self.site_url("")),
            ("Database setup", self.site_url(&self.site.db_setup_path)),
            ("Admin panel", self.site_url(&self.site.admin_path)),
        ];
        if let Some(panel) = &self.site.panel_url {
            links.push(("Hosting panel", panel.clone()));
        }
        links
    }

    /// `true` when enough is configured to open a remote session.
    #[must_use]
    pub fn has_remote(&self) -> bool {
        !self.remote.host.is_empty() && !self.remote.user.is_empty()
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validate the configuration for commands that talk to the site.
///
/// # Errors
///
/// Returns an error if the URL, port or project root are invalid.
pub fn validate_config(config: &SiteConfig) -> Result<()> {
    validate_site_url(&config.site.url)?;
    if config.remote.port == 0 {
        return Err(ConfigError::InvalidPort.into());
    }
    if !config.site.project_root.is_empty() && !config.site.project_root.starts_with('/') {
        return Err(ConfigError::RelativeProjectRoot(config.site.project_root.clone()).into());
    }
    Ok(())
}

/// Validate a site URL.
///
/// # Errors
///
/// Returns an error if the URL is empty or not `http(s)://`.
pub fn validate_site_url(url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(ConfigError::MissingValue("site.url").into());
    }
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
        _ => Err(ConfigError::InvalidUrl(url.to_string()).into()),
    }
}

/// Template written by `config init`.
pub const CONFIG_TEMPLATE: &str = r#"# site-doctor configuration
#
# Secrets never go in this file: point password_file entries at files
# readable only by you (chmod 600).

site:
  name: Laravel
  url: https://example.com
  project_root: /home/user/domains/example.com/public_html
  db_setup_path: database_setup.php
  admin_path: admin
  health_path: api/health
  # panel_url: https://hpanel.example.net/
  mail_host: smtp.example.com
  markers: ["<title>"]
  required_files: []
  log_files: [deployment_log.json]

remote:
  host: 203.0.113.10
  port: 22
  user: deploy
  # identity_file: ~/.ssh/id_ed25519
  # password_file: ~/.config/site-doctor/ssh-password
  connect_timeout_secs: 30

database:
  name: app
  user: app
  # password_file: ~/.config/site-doctor/db-password

poll:
  interval_secs: 20
  max_attempts: 90
  timeout_secs: 1800
  request_timeout_secs: 10
  summary_every: 15

upload:
  include_dirs: [app, bootstrap, config, database, public, resources, routes,
                 storage/app, storage/framework, storage/logs]
  include_files: [artisan, .env.example, composer.json, composer.lock,
                  package.json, vite.config.js]
  exclude: [node_modules, vendor, .git, .idea, tests, "*.md", "*.log", "*.txt",
            .phpunit.result.cache]

output_dir: .
"#;
