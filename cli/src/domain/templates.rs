//! Text templates for remote configuration files and local reports.
//!
//! Pure string rendering. Values that reach a shell are quoted here so
//! callers never interpolate raw strings into commands.

use std::fmt::Write as _;

use chrono::{DateTime, Local};

use crate::domain::config::SiteConfig;
use crate::domain::error::TemplateError;
use crate::domain::remote::shell_quote;

/// Rendered in place of a database password nobody supplied.
pub const PASSWORD_PLACEHOLDER: &str = "PLEASE_UPDATE_THIS_PASSWORD";

// ── .env ──────────────────────────────────────────────────────────────────────

/// Values interpolated into the production `.env`.
#[derive(Debug, Clone)]
pub struct EnvTemplate<'a> {
    pub app_name: &'a str,
    pub app_url: &'a str,
    pub db_name: &'a str,
    pub db_user: &'a str,
    /// `None` renders [`PASSWORD_PLACEHOLDER`].
    pub db_password: Option<&'a str>,
    pub mail_host: &'a str,
}

impl<'a> EnvTemplate<'a> {
    /// Build from configuration plus an optionally resolved password.
    #[must_use]
    pub fn from_config(config: &'a SiteConfig, db_password: Option<&'a str>) -> Self {
        Self {
            app_name: &config.site.name,
            app_url: &config.site.url,
            db_name: &config.database.name,
            db_user: &config.database.user,
            db_password,
            mail_host: &config.site.mail_host,
        }
    }
}

/// Quote a `.env` value when dotenv parsing would otherwise mangle it.
#[must_use]
pub fn env_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\'' | '$' | '\\' | '='));
    if !needs_quotes {
        return value.to_string();
    }
    if value.is_empty() {
        return String::new();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '"' | '\\' | '$' => {
                quoted.push('\\');
                quoted.push(ch);
            }
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

/// Render a Laravel production `.env`.
#[must_use]
pub fn render_env(t: &EnvTemplate<'_>) -> String {
    let password = t.db_password.unwrap_or(PASSWORD_PLACEHOLDER);
    let sections: [&[(&str, &str)]; 5] = [
        &[
            ("APP_NAME", t.app_name),
            ("APP_ENV", "production"),
            ("APP_KEY", ""),
            ("APP_DEBUG", "false"),
            ("APP_URL", t.app_url),
        ],
        &[
            ("LOG_CHANNEL", "stack"),
            ("LOG_DEPRECATIONS_CHANNEL", "null"),
            ("LOG_LEVEL", "error"),
        ],
        &[
            ("DB_CONNECTION", "mysql"),
            ("DB_HOST", "localhost"),
            ("DB_PORT", "3306"),
            ("DB_DATABASE", t.db_name),
            ("DB_USERNAME", t.db_user),
            ("DB_PASSWORD", password),
        ],
        &[
            ("BROADCAST_DRIVER", "log"),
            ("CACHE_DRIVER", "file"),
            ("FILESYSTEM_DISK", "local"),
            ("QUEUE_CONNECTION", "sync"),
            ("SESSION_DRIVER", "file"),
            ("SESSION_LIFETIME", "120"),
        ],
        &[
            ("MAIL_MAILER", "smtp"),
            ("MAIL_HOST", t.mail_host),
            ("MAIL_PORT", "587"),
            ("MAIL_USERNAME", "null"),
            ("MAIL_PASSWORD", "null"),
            ("MAIL_ENCRYPTION", "tls"),
            ("MAIL_FROM_NAME", t.app_name),
        ],
    ];

    let mut env = String::new();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            env.push('\n');
        }
        for (key, value) in *section {
            let _ = writeln!(env, "{key}={}", env_value(value));
        }
    }
    env
}

// ── .htaccess ─────────────────────────────────────────────────────────────────

/// Root `.htaccess`: route everything into `public/`.
#[must_use]
pub fn root_htaccess() -> &'static str {
    r"<IfModule mod_rewrite.c>
    <IfModule mod_negotiation.c>
        Options -MultiViews -Indexes
    </IfModule>

    RewriteEngine On

    # Handle Authorization Header
    RewriteCond %{HTTP:Authorization} .
    RewriteRule .* - [E=HTTP_AUTHORIZATION:%{HTTP:Authorization}]

    # Redirect to public folder
    RewriteCond %{REQUEST_URI} !^/public/
    RewriteRule ^(.*)$ public/$1 [L]

    # Remove public from URL
    RewriteCond %{REQUEST_FILENAME} !-f
    RewriteCond %{REQUEST_FILENAME} !-d
    RewriteRule ^public/(.*)$ public/index.php/$1 [L]
</IfModule>
"
}

/// `public/.htaccess`: send requests to the front controller.
#[must_use]
pub fn public_htaccess() -> &'static str {
    r"<IfModule mod_rewrite.c>
    <IfModule mod_negotiation.c>
        Options -MultiViews -Indexes
    </IfModule>

    RewriteEngine On

    # Handle Authorization Header
    RewriteCond %{HTTP:Authorization} .
    RewriteRule .* - [E=HTTP_AUTHORIZATION:%{HTTP:Authorization}]

    # Redirect Trailing Slashes If Not A Folder...
    RewriteCond %{REQUEST_FILENAME} !-d
    RewriteCond %{REQUEST_URI} (.+)/$
    RewriteRule ^ %1 [L,R=301]

    # Send Requests To Front Controller...
    RewriteCond %{REQUEST_FILENAME} !-d
    RewriteCond %{REQUEST_FILENAME} !-f
    RewriteRule ^ index.php [L]
</IfModule>
"
}

/// Minimal PHP file that proves PHP executes behind the web server.
#[must_use]
pub fn php_probe(marker: &str) -> String {
    let escaped = marker.replace('\\', "\\\\").replace('\'', "\\'");
    format!("<?php\necho '{escaped} ' . date('Y-m-d H:i:s');\n")
}

// ── Heredoc ───────────────────────────────────────────────────────────────────

const DELIMITER_BASE: &str = "SITE_DOCTOR_EOF";

/// Build a command that writes `body` to `path` through a quoted here-document.
///
/// The delimiter is quoted, so the remote shell expands nothing in the body,
/// and it is chosen so that no line of the body equals it.
///
/// # Errors
///
/// Returns an error if the path is empty or contains NUL, or no free
/// delimiter can be found.
pub fn heredoc_command(path: &str, body: &str) -> Result<String, TemplateError> {
    validate_remote_path(path)?;
    let delimiter = pick_delimiter(body)?;
    let mut cmd = format!("cat > {} << '{delimiter}'\n{body}", shell_quote(path));
    if !body.ends_with('\n') {
        cmd.push('\n');
    }
    cmd.push_str(&delimiter);
    cmd.push('\n');
    Ok(cmd)
}

/// Build the command used to stream stdin into `path`.
///
/// # Errors
///
/// Returns an error if the path is empty or contains NUL.
pub fn stdin_write_command(path: &str, mode: Option<&str>) -> Result<String, TemplateError> {
    validate_remote_path(path)?;
    let quoted = shell_quote(path);
    Ok(match mode {
        Some(mode) => format!("umask 077 && cat > {quoted} && chmod {mode} {quoted}"),
        None => format!("cat > {quoted}"),
    })
}

/// Build the command that unpacks a gzip tarball from stdin into `root`.
///
/// # Errors
///
/// Returns an error if the path is empty or contains NUL.
pub fn tar_extract_command(root: &str) -> Result<String, TemplateError> {
    validate_remote_path(root)?;
    let quoted = shell_quote(root);
    Ok(format!("mkdir -p {quoted} && tar -xzf - -C {quoted}"))
}

fn validate_remote_path(path: &str) -> Result<(), TemplateError> {
    if path.is_empty() {
        return Err(TemplateError::EmptyPath);
    }
    if path.contains('\0') {
        return Err(TemplateError::NulInPath(path.to_string()));
    }
    Ok(())
}

fn pick_delimiter(body: &str) -> Result<String, TemplateError> {
    let collides = |candidate: &str| body.lines().any(|l| l.trim_end_matches('\r') == candidate);
    if !collides(DELIMITER_BASE) {
        return Ok(DELIMITER_BASE.to_string());
    }
    (1..=64)
        .map(|n| format!("{DELIMITER_BASE}_{n}"))
        .find(|c| !collides(c))
        .ok_or(TemplateError::DelimiterCollision)
}

/// Hex SHA-256 of `contents`, recorded in the deploy log in place of secrets.
#[must_use]
pub fn fingerprint(contents: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    Sha256::digest(contents)
        .iter()
        .fold(String::with_capacity(64), |mut hex, byte| {
            let _ = write!(hex, "{byte:02x}");
            hex
        })
}

// ── Local reports ─────────────────────────────────────────────────────────────

/// Markdown quick deployment guide. Never contains credentials.
#[must_use]
pub fn quick_guide(config: &SiteConfig) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "# {} Quick Deployment Guide", config.site.name);
    let _ = writeln!(md);
    let _ = writeln!(md, "## Links");
    let _ = writeln!(md);
    if let Some(panel) = &config.site.panel_url {
        let _ = writeln!(md, "- Hosting panel: {panel}");
    }
    let _ = writeln!(md, "- Website: {}", config.site_url(""));
    let _ = writeln!(
        md,
        "- Database setup: {}",
        config.site_url(&config.site.db_setup_path)
    );
    let _ = writeln!(md, "- Admin panel: {}", config.site_url(&config.site.admin_path));
    let _ = writeln!(md);
    let _ = writeln!(md, "## Steps");
    let _ = writeln!(md);
    let _ = writeln!(md, "1. Log in to the hosting panel and open the file manager.");
    let _ = writeln!(
        md,
        "2. Upload the application into `{}`.",
        if config.site.project_root.is_empty() {
            "public_html"
        } else {
            &config.site.project_root
        }
    );
    if !config.site.required_files.is_empty() {
        let _ = writeln!(md, "3. Make sure these files are uploaded:");
        for file in &config.site.required_files {
            let _ = writeln!(md, "   - `{file}`");
        }
    } else {
        let _ = writeln!(md, "3. Upload the `.env` file and the `.htaccess` rules.");
    }
    let _ = writeln!(
        md,
        "4. Open the database setup URL once to create the schema."
    );
    let _ = writeln!(md, "5. Run `site-doctor monitor` until the site reports live.");
    let _ = writeln!(md, "6. Run `site-doctor verify` for the final check.");
    let _ = writeln!(md);
    let _ = writeln!(md, "## Troubleshooting");
    let _ = writeln!(md);
    let _ = writeln!(md, "- 403 Forbidden: files not uploaded, run `site-doctor repair routing`.");
    let _ = writeln!(md, "- 404 Not Found: DNS or domain mapping not configured yet.");
    let _ = writeln!(md, "- 500 Server Error: run `site-doctor repair app`.");
    md
}

/// Plain-text success certificate.
#[must_use]
pub fn success_certificate(config: &SiteConfig, passed: usize, total: usize, at: DateTime<Local>) -> String {
    let mut cert = String::new();
    let rule = "=".repeat(62);
    let _ = writeln!(cert, "{rule}");
    let _ = writeln!(cert, "  DEPLOYMENT SUCCESS CERTIFICATE");
    let _ = writeln!(cert, "{rule}");
    let _ = writeln!(cert, "  Project:  {}", config.site.name);
    let _ = writeln!(cert, "  Website:  {}", config.site_url(""));
    let _ = writeln!(cert, "  Status:   FULLY OPERATIONAL");
    let _ = writeln!(cert, "  Checks:   {passed}/{total} endpoints passed");
    let _ = writeln!(cert, "  Date:     {}", at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(cert, "{rule}");
    cert
}
