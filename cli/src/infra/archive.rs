//! Gzip tarball packing for `upload`, backed by `tar` and `flate2`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;

use crate::application::ports::ProjectArchiver;
use crate::domain::upload::{PackedArchive, PackedFile, UploadConfig, UploadManifest};

/// Packs local project files into an in-memory `.tar.gz`.
///
/// Symlinks are skipped; entries are added in sorted order so the same tree
/// always yields the same file list.
pub struct TarGzArchiver;

impl ProjectArchiver for TarGzArchiver {
    fn pack(&self, source: &Path, selection: &UploadConfig) -> Result<PackedArchive> {
        anyhow::ensure!(
            source.is_dir(),
            "upload source {} is not a directory",
            source.display()
        );
        let (selected, manifest) = select(source, selection)?;

        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        builder.follow_symlinks(false);
        for (full, relative) in &selected {
            builder
                .append_path_with_name(full, relative)
                .with_context(|| format!("adding {}", full.display()))?;
        }
        let bytes = builder
            .into_inner()
            .context("finishing tar stream")?
            .finish()
            .context("finishing gzip stream")?;
        tracing::debug!(files = manifest.files.len(), bytes = bytes.len(), "packed upload");
        Ok(PackedArchive { bytes, manifest })
    }
}

/// Resolve the configured selection to `(full path, archive name)` pairs.
fn select(source: &Path, selection: &UploadConfig) -> Result<(Vec<(PathBuf, String)>, UploadManifest)> {
    let mut selected = Vec::new();
    let mut manifest = UploadManifest::default();

    for dir in &selection.include_dirs {
        let full = source.join(dir);
        if !full.is_dir() {
            manifest.missing.push(format!("{dir}/"));
            continue;
        }
        walk(&full, dir.trim_end_matches('/'), selection, &mut selected, &mut manifest)?;
    }
    for file in &selection.include_files {
        let full = source.join(file);
        if !full.is_file() {
            manifest.missing.push(file.clone());
            continue;
        }
        if selection.is_excluded(file) {
            manifest.excluded += 1;
            continue;
        }
        add(full, file.clone(), &mut selected, &mut manifest)?;
    }
    Ok((selected, manifest))
}

fn walk(
    dir: &Path,
    relative: &str,
    selection: &UploadConfig,
    selected: &mut Vec<(PathBuf, String)>,
    manifest: &mut UploadManifest,
) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("reading {}", dir.display()))?;
    entries.sort_by_key(fs::DirEntry::file_name);

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        let child = format!("{relative}/{name}");
        if selection.is_excluded(&child) {
            manifest.excluded += 1;
            continue;
        }
        let file_type = entry
            .file_type()
            .with_context(|| format!("reading {}", entry.path().display()))?;
        if file_type.is_dir() {
            walk(&entry.path(), &child, selection, selected, manifest)?;
        } else if file_type.is_file() {
            add(entry.path(), child, selected, manifest)?;
        }
    }
    Ok(())
}

fn add(
    full: PathBuf,
    relative: String,
    selected: &mut Vec<(PathBuf, String)>,
    manifest: &mut UploadManifest,
) -> Result<()> {
    let size = fs::metadata(&full)
        .with_context(|| format!("reading {}", full.display()))?
        .len();
    manifest.files.push(PackedFile {
        path: relative.clone(),
        size,
    });
    selected.push((full, relative));
    Ok(())
}
