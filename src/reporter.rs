//! Run summary and console output
//!
//! `RunSummary` accumulates per-file outcomes; `Reporter` turns files,
//! diffs and the summary into strings for the runner to print.

use crate::file_processor::{FileOutcome, FileRecord};
use colored::*;
use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

const RULE_WIDTH: usize = 50;

/// A file that could not be read or written
#[derive(Debug, Clone, Serialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub message: String,
}

/// Aggregates for a whole run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub dry_run: bool,
    /// Every candidate file, skipped ones included
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub files_modified: usize,
    pub total_replacements: usize,
    /// Replacements per source call form
    pub replacements_by_rule: BTreeMap<String, usize>,
    pub needs_logger_param: Vec<PathBuf>,
    pub failed: Vec<FailedFile>,
}

impl RunSummary {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: &FileOutcome) {
        self.files_scanned += 1;

        match outcome {
            FileOutcome::Skipped(_) => self.files_skipped += 1,
            FileOutcome::Untouched => {}
            FileOutcome::Rewritten(record) => {
                self.files_modified += 1;
                self.total_replacements += record.replacements();
                for count in record.counts.iter().filter(|c| c.count > 0) {
                    *self
                        .replacements_by_rule
                        .entry(count.rule.to_string())
                        .or_insert(0) += count.count;
                }
                if record.needs_logger_param {
                    self.needs_logger_param.push(record.path.clone());
                }
            }
        }
    }

    pub fn record_failure(&mut self, path: &Path, err: &anyhow::Error) {
        self.files_scanned += 1;
        self.failed.push(FailedFile {
            path: path.to_path_buf(),
            message: format!("{:#}", err),
        });
    }
}

/// Colour only when stdout is a terminal and NO_COLOR is unset
pub fn should_use_color() -> bool {
    // https://no-color.org/
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    std::io::stdout().is_terminal()
}

pub struct Reporter {
    use_color: bool,
}

impl Reporter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    pub fn plain() -> Self {
        Self { use_color: false }
    }

    fn paint(&self, text: &str, style: fn(ColoredString) -> ColoredString) -> String {
        if self.use_color {
            style(text.normal()).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn format_run_header(&self, target: &Path, dry_run: bool) -> String {
        let mut output = format!("Starting log replacement in {}...\n", target.display());
        if dry_run {
            output.push_str(&self.paint("DRY RUN MODE - No files will be modified", |s| {
                s.yellow().bold()
            }));
            output.push('\n');
        }
        output.push_str("This will replace log.Printf/Print/Println with logger.Debug\n\n");
        output
    }

    /// Progress block for one rewritten file
    pub fn format_file(&self, record: &FileRecord) -> String {
        let mut output = format!(
            "Processing: {}\n",
            self.paint(&record.path.display().to_string(), |s| s.bold().cyan())
        );

        for count in record.counts.iter().filter(|c| c.count > 0) {
            output.push_str(&format!("  - Replaced {} {} calls\n", count.count, count.rule));
        }

        output.push_str(&format!(
            "  {} Total replacements in file: {}\n",
            self.paint("✓", |s| s.green().bold()),
            record.replacements()
        ));

        if record.needs_logger_param {
            output.push_str(&format!(
                "    {}\n",
                self.paint(
                    "Warning: This file may need logger parameter added to functions",
                    |s| s.yellow()
                )
            ));
        }

        output
    }

    /// Line diff between the original and rewritten text
    pub fn format_diff(&self, record: &FileRecord) -> String {
        let diff = TextDiff::from_lines(&record.original, &record.rewritten);
        let mut output = String::new();

        for change in diff.iter_all_changes() {
            let line = change.to_string_lossy();
            let line = line.trim_end_matches('\n');
            match change.tag() {
                ChangeTag::Equal => {}
                ChangeTag::Delete => {
                    let old = change.old_index().map(|i| i + 1).unwrap_or(0);
                    let text = format!("L{}: - {}", old, line);
                    output.push_str(&self.paint(&text, |s| s.red()));
                    output.push('\n');
                }
                ChangeTag::Insert => {
                    let new = change.new_index().map(|i| i + 1).unwrap_or(0);
                    let text = format!("L{}: + {}", new, line);
                    output.push_str(&self.paint(&text, |s| s.green()));
                    output.push('\n');
                }
            }
        }

        output
    }

    pub fn format_failure(&self, path: &Path, err: &anyhow::Error) -> String {
        format!("Error processing {}: {:#}", path.display(), err)
    }

    /// Final summary, flagged files and guidance
    pub fn format_summary(&self, summary: &RunSummary, target: &Path, backup_suffix: &str) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let target = target.display();
        let mut output = String::new();

        output.push_str(&format!("{}\n", rule));
        output.push_str(&format!("{}\n", self.paint("Replacement Summary:", |s| s.bold())));
        output.push_str(&format!("{}\n", rule));
        output.push_str(&format!("Total files scanned: {}\n", summary.files_scanned));
        output.push_str(&format!("Files skipped: {}\n", summary.files_skipped));
        output.push_str(&format!("Files modified: {}\n", summary.files_modified));
        output.push_str(&format!("Total replacements: {}\n", summary.total_replacements));
        if !summary.failed.is_empty() {
            output.push_str(&format!(
                "{}\n",
                self.paint(&format!("Files with errors: {}", summary.failed.len()), |s| s.red())
            ));
        }

        if !summary.needs_logger_param.is_empty() {
            output.push_str(&format!(
                "\n  {}\n",
                self.paint(
                    &format!(
                        "Files that may need logger parameter ({}):",
                        summary.needs_logger_param.len()
                    ),
                    |s| s.yellow().bold()
                )
            ));
            for path in &summary.needs_logger_param {
                output.push_str(&format!("  - {}\n", path.display()));
            }
        }

        if !summary.dry_run && summary.files_modified > 0 {
            output.push_str(&format!(
                "\nBackup files created with {} extension\n",
                backup_suffix
            ));
        }

        output.push_str(&format!("\n  {}\n", self.paint("IMPORTANT NOTES:", |s| s.bold())));
        output.push_str("1. Review the changes carefully before committing\n");
        output.push_str("2. Some files may need logger parameter added to functions\n");
        output.push_str("3. Test the application thoroughly after changes\n");

        if summary.dry_run {
            output.push_str("\nRun without --dry-run to apply changes\n");
        } else {
            output.push_str(&format!(
                "4. You can restore backups with: find {} -name '*{}' -exec sh -c 'mv \"$1\" \"${{1%{}}}\"' _ {{}} \\;\n",
                target, backup_suffix, backup_suffix
            ));
            output.push_str("\nTo remove backup files after verification:\n");
            output.push_str(&format!("  find {} -name '*{}' -delete\n", target, backup_suffix));
        }

        output
    }
}
