//! Application service — final deployment verification.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;

use crate::application::ports::{ArtifactWriter, DeployLogStore, HttpProbe, ProgressReporter};
use crate::domain::config::SiteConfig;
use crate::domain::deploy_log::{DeployLogEntry, EntryStatus};
use crate::domain::templates::success_certificate;
use crate::domain::verify::{VerificationReport, VerifyResult, VerifyTarget, default_targets};

/// File name of the certificate written when verification passes.
pub const CERTIFICATE_FILE: &str = "DEPLOYMENT_SUCCESS_CERTIFICATE.txt";

/// Verification verdict plus the certificate path when one was written.
#[derive(Debug, serde::Serialize)]
pub struct VerifyOutcome {
    #[serde(flatten)]
    pub report: VerificationReport,
    pub certificate: Option<PathBuf>,
}

/// GET each target once, in order.
pub async fn check_targets(
    probe: &impl HttpProbe,
    targets: &[VerifyTarget],
    timeout: Duration,
) -> VerificationReport {
    let mut results = Vec::with_capacity(targets.len());
    for target in targets {
        let (status_code, error) = match probe.get(&target.url, timeout).await {
            Ok(r) => (Some(r.status_code), None),
            Err(e) => (None, Some(format!("{e:#}"))),
        };
        results.push(VerifyResult {
            name: target.name.clone(),
            url: target.url.clone(),
            status_code,
            error,
        });
    }
    VerificationReport::from_results(results)
}

/// Verify the configured endpoints; on success write the certificate.
///
/// # Errors
///
/// Returns an error if the certificate or the deploy log cannot be written.
pub async fn run_verification(
    probe: &impl HttpProbe,
    writer: &impl ArtifactWriter,
    log: &impl DeployLogStore,
    reporter: &impl ProgressReporter,
    config: &SiteConfig,
) -> Result<VerifyOutcome> {
    let targets = default_targets(config);
    reporter.step(&format!("checking {} endpoints...", targets.len()));
    let report = check_targets(probe, &targets, config.poll.policy().request_timeout).await;

    let summary = format!(
        "{}/{} endpoints passed ({:.1}%)",
        report.passed, report.total, report.success_rate
    );

    let certificate = if report.verified {
        let cert = success_certificate(config, report.passed, report.total, Local::now());
        let path = writer.write(CERTIFICATE_FILE, &cert)?;
        reporter.success(&format!("deployment verified: {summary}"));
        log.append(DeployLogEntry::now("verify", EntryStatus::Success, &summary))
            .await?;
        Some(path)
    } else {
        reporter.warn(&format!("verification failed: {summary}"));
        log.append(DeployLogEntry::now("verify", EntryStatus::Error, &summary))
            .await?;
        None
    };

    Ok(VerifyOutcome {
        report,
        certificate,
    })
}
