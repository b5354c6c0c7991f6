//! Application service — push the local project to the host as one tarball.

use std::path::Path;

use anyhow::Result;

use crate::application::ports::{DeployLogStore, ProgressReporter, ProjectArchiver, RemoteShell};
use crate::application::services::remote_exec::{
    DEFAULT_REMOTE_TIMEOUT, LONG_REMOTE_TIMEOUT, execute, push_archive,
};
use crate::application::services::site_repair::{Procedure, RepairReport};
use crate::domain::config::SiteConfig;
use crate::domain::deploy_log::EntryStatus;
use crate::domain::remote::shell_quote;
use crate::domain::templates::fingerprint;
use crate::domain::upload::{backup_command, format_size};

/// Options for one upload run.
#[derive(Debug, Clone, Copy)]
pub struct UploadRequest<'a> {
    /// Local project directory.
    pub source: &'a Path,
    /// Snapshot the remote project root before unpacking.
    pub backup: bool,
    /// Pack and report only; nothing is sent.
    pub dry_run: bool,
    /// Timestamp used in the backup file name.
    pub stamp: &'a str,
}

/// Pack the selected project files, stream them into the project root, and
/// fix permissions on what arrived.
///
/// Stops after the first remote step that fails.
///
/// # Errors
///
/// Returns an error if the project cannot be packed or the deploy log cannot be written.
pub async fn upload_project(
    shell: &impl RemoteShell,
    archiver: &impl ProjectArchiver,
    log: &impl DeployLogStore,
    reporter: &impl ProgressReporter,
    config: &SiteConfig,
    request: UploadRequest<'_>,
) -> Result<RepairReport> {
    let root = config.site.project_root.as_str();
    let mut run = Procedure::new(shell, log, reporter, root, "upload");

    reporter.step(&format!("packing {}...", request.source.display()));
    let archive = archiver.pack(request.source, &config.upload)?;
    let manifest = &archive.manifest;
    if !manifest.missing.is_empty() {
        run.record(
            "selection",
            EntryStatus::Warning,
            format!("not found locally: {}", manifest.missing.join(", ")),
        )
        .await?;
    }
    if manifest.files.is_empty() {
        run.record("archive", EntryStatus::Error, "nothing to upload")
            .await?;
        return Ok(run.finish(None));
    }
    run.record(
        "archive",
        EntryStatus::Success,
        format!(
            "{} files, {} ({} excluded), sha256 {}",
            manifest.files.len(),
            format_size(manifest.total_bytes()),
            manifest.excluded,
            fingerprint(&archive.bytes)
        ),
    )
    .await?;

    if request.dry_run {
        run.record(
            "dry run",
            EntryStatus::Info,
            format!("nothing sent to {}", shell.target()),
        )
        .await?;
        return Ok(run.finish(None));
    }

    if request.backup {
        reporter.step("backing up the project root...");
        let outcome = execute(
            shell,
            &backup_command(root, request.stamp),
            Some(LONG_REMOTE_TIMEOUT),
        )
        .await;
        run.record_outcome("backup", &outcome).await?;
        if !outcome.success() {
            return Ok(run.finish(None));
        }
    }

    reporter.step(&format!(
        "uploading {} to {}...",
        format_size(archive.bytes.len() as u64),
        shell.target()
    ));
    let outcome = push_archive(shell, root, &archive.bytes).await?;
    if outcome.success() {
        run.record(
            "extract",
            EntryStatus::Success,
            format!("{} files into {root}", manifest.files.len()),
        )
        .await?;
    } else {
        run.record("extract", EntryStatus::Error, outcome.failure_summary())
            .await?;
        return Ok(run.finish(None));
    }

    if let Some(command) = manifest.permission_command() {
        run.command("permissions", &command, DEFAULT_REMOTE_TIMEOUT)
            .await?;
    }

    let listing = execute(shell, &format!("ls -1A {}", shell_quote(root)), None).await;
    if listing.success() {
        let absent = manifest.missing_from_listing(&listing.stdout);
        if absent.is_empty() {
            run.record(
                "verify",
                EntryStatus::Success,
                format!("{} top-level entries present", manifest.top_level().len()),
            )
            .await?;
        } else {
            run.record(
                "verify",
                EntryStatus::Error,
                format!("missing after upload: {}", absent.join(", ")),
            )
            .await?;
        }
    } else {
        run.record_outcome("verify", &listing).await?;
    }

    Ok(run.finish(None))
}
