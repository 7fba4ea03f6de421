//! Per-file rewrite
//!
//! Reads one candidate, runs the rule engine over the full text and, unless
//! this is a dry run, writes `<file><suffix>` with the original bytes before
//! overwriting the file.

use crate::error_helpers::file_error;
use crate::flagger::needs_logger_param;
use crate::rules::{RuleCount, RuleEngine};
use crate::walker::{Candidate, SkipReason};
use anyhow::{Result, anyhow};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Compute everything but never touch the filesystem
    pub dry_run: bool,
    /// Appended to the file name to form the backup path, e.g. `.bak`
    pub backup_suffix: String,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            backup_suffix: ".bak".to_string(),
        }
    }
}

/// A file whose text was changed by the rule engine
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    pub original: String,
    pub rewritten: String,
    pub counts: Vec<RuleCount>,
    pub needs_logger_param: bool,
    /// Set only when a backup was actually written (never in dry-run)
    pub backup_path: Option<PathBuf>,
}

impl FileRecord {
    pub fn replacements(&self) -> usize {
        self.counts.iter().map(|c| c.count).sum()
    }
}

#[derive(Debug, Clone)]
pub enum FileOutcome {
    /// Excluded by the walker policy; never read
    Skipped(SkipReason),
    /// Read, but nothing to rewrite
    Untouched,
    Rewritten(FileRecord),
}

pub struct FileProcessor {
    engine: RuleEngine,
    options: ProcessOptions,
}

impl FileProcessor {
    pub fn new(engine: RuleEngine, options: ProcessOptions) -> Self {
        Self { engine, options }
    }

    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    pub fn process(&self, candidate: &Candidate) -> Result<FileOutcome> {
        if let Some(reason) = candidate.skip {
            tracing::debug!(path = %candidate.path.display(), ?reason, "skipped");
            return Ok(FileOutcome::Skipped(reason));
        }

        self.process_file(&candidate.path)
    }

    /// Rewrite one file, writing the backup and new content unless dry-run
    pub fn process_file(&self, path: &Path) -> Result<FileOutcome> {
        let original = fs::read_to_string(path)
            .map_err(|e| anyhow!(file_error(path, "reading", &e)))?;

        let rewrite = self.engine.rewrite(&original);
        if rewrite.text == original {
            tracing::debug!(path = %path.display(), "nothing to rewrite");
            return Ok(FileOutcome::Untouched);
        }

        let needs_logger_param = needs_logger_param(&rewrite.text, path);

        let backup_path = if self.options.dry_run {
            None
        } else {
            Some(self.write_changes(path, &original, &rewrite.text)?)
        };

        tracing::info!(
            path = %path.display(),
            replacements = rewrite.total(),
            dry_run = self.options.dry_run,
            "rewrote file"
        );

        Ok(FileOutcome::Rewritten(FileRecord {
            path: path.to_path_buf(),
            original,
            rewritten: rewrite.text,
            counts: rewrite.counts,
            needs_logger_param,
            backup_path,
        }))
    }

    /// Save the original next to the file, then overwrite it.
    ///
    /// The two writes are not atomic as a pair: if the backup write fails the
    /// live file is left alone, but an interruption between them leaves only
    /// the backup holding the pre-run content.
    fn write_changes(&self, path: &Path, original: &str, rewritten: &str) -> Result<PathBuf> {
        let backup = backup_path_for(path, &self.options.backup_suffix);

        fs::write(&backup, original)
            .map_err(|e| anyhow!(file_error(&backup, "writing backup", &e)))?;
        tracing::debug!(backup = %backup.display(), "backup written");

        fs::write(path, rewritten).map_err(|e| anyhow!(file_error(path, "writing", &e)))?;

        Ok(backup)
    }
}

/// `main.go` + `.bak` → `main.go.bak`
pub fn backup_path_for(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
