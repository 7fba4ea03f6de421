//! Candidate file discovery
//!
//! Walks the target tree and yields every file with the configured extension.
//! Test files, anything under `vendor/` or `.git/`, and symlinked files are
//! yielded with a skip reason rather than dropped, so they still count as
//! scanned.

use anyhow::{Result, bail};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// `*_test.<ext>` file
    TestFile,
    /// Under a `vendor` directory
    Vendored,
    /// Under a `.git` directory
    VcsMetadata,
    /// A symlink to a file; links are never followed or written through
    Symlink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub skip: Option<SkipReason>,
}

/// Fail unless `root` exists and is a directory
pub fn validate_root(root: &Path) -> Result<()> {
    if !root.exists() {
        bail!("Directory {} does not exist", root.display());
    }
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }
    Ok(())
}

/// Lazily walk `root` for files ending in `.<extension>`
pub fn walk<'a>(root: &'a Path, extension: &'a str) -> impl Iterator<Item = Candidate> + 'a {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| {
            entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
        })
        .filter(move |entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext == extension)
        })
        .map(move |entry| {
            let is_link = entry.path_is_symlink();
            let path = entry.into_path();
            let skip = skip_reason(root, &path, extension)
                .or_else(|| is_link.then_some(SkipReason::Symlink));
            Candidate { path, skip }
        })
}

/// Classify a path against the exclusion policy.
///
/// Only components below `root` are inspected, so pointing the tool straight
/// at a vendored tree still processes it.
pub fn skip_reason(root: &Path, path: &Path, extension: &str) -> Option<SkipReason> {
    let relative = path.strip_prefix(root).unwrap_or(path);

    let test_suffix = format!("_test.{}", extension);
    if relative
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(&test_suffix))
    {
        return Some(SkipReason::TestFile);
    }

    relative
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .find_map(|component| match component.as_os_str().to_str() {
            Some("vendor") => Some(SkipReason::Vendored),
            Some(".git") => Some(SkipReason::VcsMetadata),
            _ => None,
        })
}
