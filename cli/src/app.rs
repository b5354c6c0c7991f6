//! Application context — unified state passed to every command handler.
//!
//! Commands receive `&AppContext` and build the adapters they need from it,
//! so adding a cross-cutting flag changes this file and no command signature.

use std::io::IsTerminal as _;
use std::path::PathBuf;

use anyhow::Result;

use crate::application::services::config_service;
use crate::domain::config::{DB_PASSWORD_ENV, SiteConfig};
use crate::domain::error::RemoteError;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::fs::{LocalFs, expand_home};
use crate::infra::secrets::{read_secret_file, secret_from_env};
use crate::infra::ssh::SshShell;
use crate::infra::state::JsonDeployLogStore;
use crate::output::{
    HumanRenderer, JsonRenderer, OutputContext, Renderer, Reporter, SilentReporter,
    TerminalReporter,
};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by the `CI` env var).
    pub yes: bool,
    /// Explicit configuration path (`--config` / `SITE_DOCTOR_CONFIG`).
    pub config: Option<PathBuf>,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Configuration file resolution and loading.
    pub config_store: YamlConfigStore,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when `CI` is present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: AppFlags) -> Self {
        let non_interactive = flags.behaviour.yes || std::env::var_os("CI").is_some();

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            config_store: YamlConfigStore::new(flags.behaviour.config),
            non_interactive,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Progress reporter for services; silent under `--json`.
    #[must_use]
    pub fn reporter(&self) -> Reporter<'_> {
        match self.mode {
            OutputMode::Human => Reporter::Terminal(TerminalReporter::new(&self.output)),
            OutputMode::Json => Reporter::Silent(SilentReporter),
        }
    }

    /// Whether spinners may be drawn.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        !self.is_json() && self.output.show_progress()
    }

    /// Load and validate the site configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no configuration is found or it is invalid.
    pub fn load_config(&self) -> Result<SiteConfig> {
        config_service::load_validated(&self.config_store)
    }

    /// SSH shell for the configured remote.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NotConfigured`] when host or user is missing.
    pub fn remote_shell(&self, config: &SiteConfig) -> Result<SshShell<TokioCommandRunner>> {
        if !config.has_remote() {
            return Err(RemoteError::NotConfigured.into());
        }
        Ok(SshShell::new(TokioCommandRunner::default(), &config.remote))
    }

    /// Local filesystem rooted at the configured output directory.
    #[must_use]
    pub fn local_fs(config: &SiteConfig) -> LocalFs {
        LocalFs::new(&config.output_dir)
    }

    /// Deploy log in the configured output directory.
    #[must_use]
    pub fn deploy_log(config: &SiteConfig) -> JsonDeployLogStore {
        JsonDeployLogStore::in_dir(Self::local_fs(config).output_dir())
    }

    /// Resolve the database password.
    ///
    /// Order: `database.password_file`, then `SITE_DOCTOR_DB_PASSWORD`, then a
    /// hidden prompt (skipped when non-interactive, under `--json`, or when
    /// stdin is not a terminal).
    /// `None` means the placeholder will be rendered.
    ///
    /// # Errors
    ///
    /// Returns an error if the password file cannot be read or the prompt fails.
    pub fn db_password(&self, config: &SiteConfig) -> Result<Option<String>> {
        if let Some(path) = &config.database.password_file {
            return read_secret_file(&expand_home(path)).map(Some);
        }
        if let Some(value) = secret_from_env(DB_PASSWORD_ENV) {
            return Ok(Some(value));
        }
        if self.non_interactive || self.is_json() || !std::io::stdin().is_terminal() {
            return Ok(None);
        }
        let password = dialoguer::Password::new()
            .with_prompt("Database password (empty to skip)")
            .allow_empty_password(true)
            .interact()?;
        Ok((!password.is_empty()).then_some(password))
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI or `--yes` flag), returns
    /// `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
