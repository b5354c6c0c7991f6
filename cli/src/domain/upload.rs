//! Project upload selection and the manifest of a packed archive.
//!
//! Paths are relative to the local project directory and always use `/`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::remote::shell_quote;

/// Directories uploaded by default.
pub const DEFAULT_INCLUDE_DIRS: [&str; 10] = [
    "app",
    "bootstrap",
    "config",
    "database",
    "public",
    "resources",
    "routes",
    "storage/app",
    "storage/framework",
    "storage/logs",
];

/// Top-level files uploaded by default.
pub const DEFAULT_INCLUDE_FILES: [&str; 6] = [
    "artisan",
    ".env.example",
    "composer.json",
    "composer.lock",
    "package.json",
    "vite.config.js",
];

/// Names never uploaded. `*.ext` matches a file suffix, anything else a
/// whole path component.
pub const DEFAULT_EXCLUDES: [&str; 9] = [
    "node_modules",
    "vendor",
    ".git",
    ".idea",
    "tests",
    "*.md",
    "*.log",
    "*.txt",
    ".phpunit.result.cache",
];

/// `upload` section of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub include_dirs: Vec<String>,
    pub include_files: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        let owned = |items: &[&str]| -> Vec<String> { items.iter().map(ToString::to_string).collect() };
        Self {
            include_dirs: owned(&DEFAULT_INCLUDE_DIRS),
            include_files: owned(&DEFAULT_INCLUDE_FILES),
            exclude: owned(&DEFAULT_EXCLUDES),
        }
    }
}

impl UploadConfig {
    /// `true` when `relative` or any of its parents matches an exclude pattern.
    #[must_use]
    pub fn is_excluded(&self, relative: &str) -> bool {
        relative
            .split('/')
            .filter(|c| !c.is_empty())
            .any(|component| self.exclude.iter().any(|p| pattern_matches(p, component)))
    }
}

fn pattern_matches(pattern: &str, component: &str) -> bool {
    let component = component.to_ascii_lowercase();
    match pattern.strip_prefix('*') {
        Some(suffix) => component.ends_with(&suffix.to_ascii_lowercase()),
        None => component == pattern.to_ascii_lowercase(),
    }
}

/// One file in a packed archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackedFile {
    pub path: String,
    pub size: u64,
}

/// What went into an archive and which configured entries were absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadManifest {
    pub files: Vec<PackedFile>,
    pub missing: Vec<String>,
    pub excluded: usize,
}

impl UploadManifest {
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// First path components of every packed file.
    #[must_use]
    pub fn top_level(&self) -> BTreeSet<&str> {
        self.files
            .iter()
            .filter_map(|f| f.path.split('/').next())
            .collect()
    }

    /// Top-level entries that are absent from a remote `ls -1A` listing.
    #[must_use]
    pub fn missing_from_listing(&self, listing: &str) -> Vec<String> {
        let present: BTreeSet<&str> = listing.lines().map(str::trim).collect();
        self.top_level()
            .into_iter()
            .filter(|name| !present.contains(name))
            .map(ToString::to_string)
            .collect()
    }

    fn contains_under(&self, dir: &str) -> bool {
        self.files
            .iter()
            .any(|f| f.path.strip_prefix(dir).is_some_and(|rest| rest.starts_with('/')))
    }

    /// Permission fixes for what was uploaded, run inside the project root.
    #[must_use]
    pub fn permission_command(&self) -> Option<String> {
        let writable: Vec<&str> = ["storage", "bootstrap/cache"]
            .into_iter()
            .filter(|dir| self.contains_under(dir))
            .collect();
        let mut parts = Vec::new();
        if !writable.is_empty() {
            parts.push(format!("chmod -R 775 {}", writable.join(" ")));
        }
        if self.files.iter().any(|f| f.path == "artisan") {
            parts.push("chmod +x artisan".to_string());
        }
        (!parts.is_empty()).then(|| parts.join(" && "))
    }
}

/// A gzip tarball ready to stream to the host.
#[derive(Debug, Clone)]
pub struct PackedArchive {
    pub bytes: Vec<u8>,
    pub manifest: UploadManifest,
}

/// Command that snapshots `root` into `~/backup_<stamp>.tar.gz`.
#[must_use]
pub fn backup_command(root: &str, stamp: &str) -> String {
    format!(
        "tar -czf ~/backup_{stamp}.tar.gz -C {} .",
        shell_quote(root)
    )
}

/// Human-readable byte count.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let kib = bytes as f64 / 1024.0;
    if kib < 1024.0 {
        format!("{kib:.1} KiB")
    } else {
        format!("{:.1} MiB", kib / 1024.0)
    }
}
