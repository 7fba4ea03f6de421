//! The whole migration pass: walk, rewrite, back up, report.

use crate::config;
use crate::file_processor::{FileOutcome, FileProcessor, ProcessOptions};
use crate::reporter::{Reporter, RunSummary};
use crate::rules::RuleEngine;
use crate::walker;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Root of the tree to rewrite
    pub target: PathBuf,
    /// Source file extension, without the dot
    pub extension: String,
    pub dry_run: bool,
    pub backup_suffix: String,
    /// Print a line diff for each rewritten file
    pub show_diff: bool,
    /// Print the summary as JSON instead of the text report
    pub json: bool,
    pub color: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            target: PathBuf::from("backend"),
            extension: "go".to_string(),
            dry_run: false,
            backup_suffix: ".bak".to_string(),
            show_diff: false,
            json: false,
            color: false,
        }
    }
}

/// Run one pass over `options.target`.
///
/// Fails only if the target is not a directory (before anything is touched)
/// or if `out` cannot be written. Per-file failures are reported to `err`
/// and recorded in the summary.
pub fn run<W: Write, E: Write>(options: &RunOptions, out: &mut W, err: &mut E) -> Result<RunSummary> {
    walker::validate_root(&options.target)?;
    config::check_backup_suffix(&options.backup_suffix, &options.extension)?;

    let reporter = Reporter::new(options.color);
    let processor = FileProcessor::new(
        RuleEngine::new()?,
        ProcessOptions {
            dry_run: options.dry_run,
            backup_suffix: options.backup_suffix.clone(),
        },
    );
    let mut summary = RunSummary::new(options.dry_run);

    tracing::info!(
        target_dir = %options.target.display(),
        dry_run = options.dry_run,
        "starting run"
    );

    if !options.json {
        write!(out, "{}", reporter.format_run_header(&options.target, options.dry_run))?;
    }

    for candidate in walker::walk(&options.target, &options.extension) {
        match processor.process(&candidate) {
            Ok(outcome) => {
                if let FileOutcome::Rewritten(record) = &outcome {
                    if !options.json {
                        write!(out, "{}", reporter.format_file(record))?;
                        if options.show_diff {
                            write!(out, "{}", reporter.format_diff(record))?;
                        }
                        writeln!(out)?;
                    }
                }
                summary.record(&outcome);
            }
            Err(e) => {
                tracing::warn!(path = %candidate.path.display(), error = %format!("{:#}", e), "failed to process file");
                writeln!(err, "{}", reporter.format_failure(&candidate.path, &e))?;
                summary.record_failure(&candidate.path, &e);
            }
        }
    }

    if options.json {
        serde_json::to_writer_pretty(&mut *out, &summary).context("Failed to serialize summary")?;
        writeln!(out)?;
    } else {
        write!(
            out,
            "{}",
            reporter.format_summary(&summary, &options.target, &options.backup_suffix)
        )?;
    }

    tracing::info!(
        scanned = summary.files_scanned,
        modified = summary.files_modified,
        replacements = summary.total_replacements,
        failed = summary.failed.len(),
        "run complete"
    );

    Ok(summary)
}
