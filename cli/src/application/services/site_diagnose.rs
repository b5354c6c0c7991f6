//! Application service — site diagnosis use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use crate::application::ports::{HttpProbe, NetworkProbe, ProgressReporter, RemoteShell};
use crate::application::services::remote_exec::execute;
use crate::application::services::site_status::probe_endpoint;
use crate::domain::config::SiteConfig;
use crate::domain::health::{
    CHECK_ARTISAN, CHECK_ENV_FILE, CHECK_LOCAL_HTTP, CHECK_PHP_VERSION, CHECK_PROJECT_ROOT,
    CHECK_PUBLIC_DIR, CHECK_PUBLIC_INDEX, CHECK_REMOTE_SESSION, CHECK_ROOT_HTACCESS,
    CHECK_STORAGE, CHECK_USER_INI, CheckResult, DiagnosisReport, HttpChecks, error_lines,
    parse_http_code, parse_php_version, php_version_ok,
};
use crate::domain::remote::{in_dir, join_remote, shell_quote};

/// How many recent log errors to keep.
const RECENT_ERROR_LIMIT: usize = 10;

/// Command that reports the local HTTP status from the server itself.
pub const LOCAL_CURL: &str = "curl -s -o /dev/null -w '%{http_code}' http://localhost";

/// Run the remote and HTTP diagnostics.
///
/// Accepts port trait bounds so the caller can inject real or mock
/// implementations. Rendering is the caller's responsibility. Unreachable
/// hosts become failed checks, never errors.
pub async fn run_diagnosis(
    shell: &impl RemoteShell,
    probe: &impl HttpProbe,
    network: &impl NetworkProbe,
    reporter: &impl ProgressReporter,
    config: &SiteConfig,
) -> DiagnosisReport {
    reporter.step("checking site over HTTP...");
    let http = probe_http(probe, network, config).await;

    reporter.step(&format!("checking {} ...", shell.target()));
    let (remote, recent_errors) = probe_remote(shell, &config.site.project_root).await;

    reporter.success("diagnostics complete");
    DiagnosisReport {
        http,
        remote,
        recent_errors,
    }
}

async fn probe_http(
    probe: &impl HttpProbe,
    network: &impl NetworkProbe,
    config: &SiteConfig,
) -> HttpChecks {
    let url = config.site_url("");
    let timeout = config.poll.policy().request_timeout;
    let dns = async {
        match config.site_host() {
            Some(host) => network.check_dns_resolution(host).await.unwrap_or(false),
            None => false,
        }
    };
    let (dns, endpoint) = tokio::join!(dns, probe_endpoint(probe, &url, timeout));
    HttpChecks {
        dns,
        status_code: endpoint.status_code,
        condition: endpoint.condition,
    }
}

async fn probe_remote(shell: &impl RemoteShell, root: &str) -> (Vec<CheckResult>, Vec<String>) {
    let mut checks = Vec::new();

    let root_check = execute(shell, &format!("test -d {}", shell_quote(root)), None).await;
    if root_check.is_transport_failure() {
        checks.push(CheckResult::fail(
            CHECK_REMOTE_SESSION,
            root_check.failure_summary(),
        ));
        return (checks, Vec::new());
    }
    if !root_check.success() {
        checks.push(CheckResult::fail(CHECK_PROJECT_ROOT, format!("{root} not found")));
        return (checks, Vec::new());
    }
    checks.push(CheckResult::pass(CHECK_PROJECT_ROOT, root));

    checks.push(path_check(shell, CHECK_PUBLIC_DIR, "-d", &join_remote(root, "public")).await);
    checks.push(public_index_check(shell, root).await);
    checks.push(path_check(shell, CHECK_ROOT_HTACCESS, "-f", &join_remote(root, ".htaccess")).await);
    checks.push(path_check(shell, CHECK_ENV_FILE, "-f", &join_remote(root, ".env")).await);
    checks.push(php_check(shell).await);
    checks.push(artisan_check(shell, root).await);
    checks.push(path_check(shell, CHECK_STORAGE, "-w", &join_remote(root, "storage")).await);
    checks.push(local_http_check(shell).await);
    checks.push(user_ini_check(shell, root).await);

    let log = join_remote(root, "storage/logs/laravel.log");
    let tail = execute(
        shell,
        &format!("tail -n 200 {} 2>/dev/null", shell_quote(&log)),
        None,
    )
    .await;
    let recent_errors = error_lines(&tail.stdout, RECENT_ERROR_LIMIT);

    (checks, recent_errors)
}

async fn path_check(shell: &impl RemoteShell, name: &str, test_flag: &str, path: &str) -> CheckResult {
    let outcome = execute(shell, &format!("test {test_flag} {}", shell_quote(path)), None).await;
    if outcome.success() {
        return CheckResult::pass(name, "present");
    }
    let detail = match test_flag {
        "-w" => format!("{path} is not writable"),
        _ => format!("{path} not found"),
    };
    CheckResult::fail(name, detail)
}

async fn public_index_check(shell: &impl RemoteShell, root: &str) -> CheckResult {
    let index = shell_quote(&join_remote(root, "public/index.php"));
    let command = format!(
        "if [ ! -f {index} ]; then echo missing; \
         elif grep -q autoload {index}; then echo ok; else echo no-autoload; fi"
    );
    let outcome = execute(shell, &command, None).await;
    match outcome.stdout_trimmed() {
        "ok" => CheckResult::pass(CHECK_PUBLIC_INDEX, "bootstraps the autoloader"),
        "no-autoload" => CheckResult::fail(
            CHECK_PUBLIC_INDEX,
            "present but does not load vendor/autoload.php",
        ),
        "missing" => CheckResult::fail(CHECK_PUBLIC_INDEX, "missing"),
        _ => CheckResult::fail(CHECK_PUBLIC_INDEX, outcome.failure_summary()),
    }
}

async fn php_check(shell: &impl RemoteShell) -> CheckResult {
    let outcome = execute(shell, "php -v", None).await;
    match parse_php_version(&outcome.stdout) {
        Some(v) if php_version_ok(&v) => CheckResult::pass(CHECK_PHP_VERSION, v.to_string()),
        Some(v) => CheckResult::fail(CHECK_PHP_VERSION, format!("{v} is older than 8.1")),
        None => CheckResult::fail(CHECK_PHP_VERSION, outcome.failure_summary()),
    }
}

async fn artisan_check(shell: &impl RemoteShell, root: &str) -> CheckResult {
    let outcome = execute(shell, &in_dir(root, "php artisan --version"), None).await;
    if outcome.success() {
        CheckResult::pass(CHECK_ARTISAN, outcome.stdout_trimmed())
    } else {
        CheckResult::fail(CHECK_ARTISAN, outcome.failure_summary())
    }
}

async fn local_http_check(shell: &impl RemoteShell) -> CheckResult {
    let outcome = execute(shell, LOCAL_CURL, None).await;
    match parse_http_code(&outcome.stdout) {
        Some(code) if code < 400 => CheckResult::pass(CHECK_LOCAL_HTTP, format!("HTTP {code}")),
        Some(code) => CheckResult::fail(CHECK_LOCAL_HTTP, format!("HTTP {code}")),
        None => CheckResult::fail(CHECK_LOCAL_HTTP, "no response from http://localhost"),
    }
}

/// Informational: `.user.ini` overrides never fail the diagnosis.
async fn user_ini_check(shell: &impl RemoteShell, root: &str) -> CheckResult {
    let root_ini = shell_quote(&join_remote(root, ".user.ini"));
    let public_ini = shell_quote(&join_remote(root, "public/.user.ini"));
    let outcome = execute(
        shell,
        &format!("ls {root_ini} {public_ini} 2>/dev/null"),
        None,
    )
    .await;
    let found: Vec<&str> = outcome.stdout.lines().filter(|l| !l.is_empty()).collect();
    if found.is_empty() {
        CheckResult::pass(CHECK_USER_INI, "no overrides")
    } else {
        CheckResult::pass(CHECK_USER_INI, format!("overrides in {}", found.join(", ")))
    }
}
