//! End-to-end runs over a temporary Go tree

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use logswap::{RunOptions, RunSummary, run};

const HANDLER: &str = r#"package controllers

import "log"

func Handle(id int, name string) {
	log.Printf("handling %d (%s)", id, name)
	log.Print("start")
	log.Println(name)
}
"#;

const HANDLER_REWRITTEN: &str = r#"package controllers

import "log"

func Handle(id int, name string) {
	logger.Debug("handling %d (%s)", id, name)
	logger.Debug("start")
	logger.Debug("%v", name)
}
"#;

const SERVICE: &str = r#"package services

func (s *Service) Run() {
	log.Print(s.name)
}
"#;

const THREADED: &str = r#"package internal

func Apply(logger *TerraformLogger, plan string) {
	log.Println("applying")
}
"#;

const PLAIN: &str = "package internal\n\nfunc Noop() {}\n";

struct Tree {
    _temp: TempDir,
    root: PathBuf,
}

impl Tree {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("backend");
        let tree = Self { _temp: temp, root };

        tree.write("controllers/handler.go", HANDLER);
        tree.write("services/service.go", SERVICE);
        tree.write("internal/apply.go", THREADED);
        tree.write("internal/noop.go", PLAIN);
        tree.write("controllers/handler_test.go", HANDLER);
        tree.write("vendor/lib/lib.go", HANDLER);
        tree.write("README.md", "log.Print(x)\n");
        tree
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).unwrap()
    }

    fn options(&self) -> RunOptions {
        RunOptions {
            target: self.root.clone(),
            ..RunOptions::default()
        }
    }

    /// Every file under the root with its content
    fn snapshot(&self) -> Vec<(PathBuf, Vec<u8>)> {
        let mut files = Vec::new();
        collect(&self.root, &mut files);
        files.sort();
        files
    }
}

fn collect(dir: &Path, files: &mut Vec<(PathBuf, Vec<u8>)>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(&path, files);
        } else {
            let content = fs::read(&path).unwrap();
            files.push((path, content));
        }
    }
}

fn run_captured(options: &RunOptions) -> (RunSummary, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let summary = run(options, &mut out, &mut err).unwrap();
    (
        summary,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
fn test_run_rewrites_and_backs_up() {
    let tree = Tree::new();
    let (summary, stdout, stderr) = run_captured(&tree.options());

    assert_eq!(summary.files_scanned, 6);
    assert_eq!(summary.files_skipped, 2);
    assert_eq!(summary.files_modified, 3);
    assert_eq!(summary.total_replacements, 5);
    assert!(summary.failed.is_empty());
    assert!(stderr.is_empty());

    assert_eq!(tree.read("controllers/handler.go"), HANDLER_REWRITTEN);
    assert_eq!(tree.read("controllers/handler.go.bak"), HANDLER);
    assert_eq!(tree.read("services/service.go.bak"), SERVICE);
    assert_eq!(tree.read("internal/apply.go.bak"), THREADED);

    // Untouched and skipped files get no backup
    assert!(!tree.path("internal/noop.go.bak").exists());
    assert_eq!(tree.read("controllers/handler_test.go"), HANDLER);
    assert_eq!(tree.read("vendor/lib/lib.go"), HANDLER);
    assert!(!tree.path("vendor/lib/lib.go.bak").exists());
    assert_eq!(tree.read("README.md"), "log.Print(x)\n");

    assert!(stdout.contains("  - Replaced 1 log.Printf calls\n"));
    assert!(stdout.contains("Total files scanned: 6\n"));
    assert!(stdout.contains("Backup files created with .bak extension"));
    assert!(stdout.contains(&format!("find {} -name '*.bak' -delete", tree.root.display())));
}

#[test]
fn test_only_unthreaded_file_outside_services_is_flagged() {
    let tree = Tree::new();
    let (summary, stdout, _) = run_captured(&tree.options());

    assert_eq!(summary.needs_logger_param, vec![tree.path("controllers/handler.go")]);
    assert!(stdout.contains("Files that may need logger parameter (1):"));
}

#[test]
fn test_service_file_flagged_when_moved_out_of_services() {
    let tree = Tree::new();
    tree.write("workers/service.go", SERVICE);

    let (summary, _, _) = run_captured(&tree.options());

    assert!(summary.needs_logger_param.contains(&tree.path("workers/service.go")));
    assert!(!summary.needs_logger_param.contains(&tree.path("services/service.go")));
}

#[test]
fn test_dry_run_leaves_tree_identical() {
    let tree = Tree::new();
    let before = tree.snapshot();

    let (dry, stdout, _) = run_captured(&RunOptions {
        dry_run: true,
        ..tree.options()
    });

    assert_eq!(tree.snapshot(), before);
    assert!(stdout.contains("DRY RUN MODE - No files will be modified"));
    assert!(stdout.contains("Run without --dry-run to apply changes"));
    assert!(!stdout.contains("Backup files created"));

    let (real, _, _) = run_captured(&tree.options());
    assert_eq!(dry.files_scanned, real.files_scanned);
    assert_eq!(dry.files_modified, real.files_modified);
    assert_eq!(dry.total_replacements, real.total_replacements);
    assert_eq!(dry.replacements_by_rule, real.replacements_by_rule);
}

#[test]
fn test_second_run_changes_nothing() {
    let tree = Tree::new();
    run_captured(&tree.options());
    let after_first = tree.read("controllers/handler.go");

    let (summary, _, _) = run_captured(&tree.options());

    assert_eq!(summary.files_modified, 0);
    assert_eq!(summary.total_replacements, 0);
    assert_eq!(tree.read("controllers/handler.go"), after_first);
    // The first run's backup is not overwritten with rewritten text
    assert_eq!(tree.read("controllers/handler.go.bak"), HANDLER);
}

#[test]
fn test_custom_backup_suffix() {
    let tree = Tree::new();
    let (_, stdout, _) = run_captured(&RunOptions {
        backup_suffix: ".orig".to_string(),
        ..tree.options()
    });

    assert_eq!(tree.read("controllers/handler.go.orig"), HANDLER);
    assert!(!tree.path("controllers/handler.go.bak").exists());
    assert!(stdout.contains("-name '*.orig' -delete"));
}

#[test]
fn test_unreadable_file_does_not_abort_run() {
    let tree = Tree::new();
    fs::write(tree.path("internal/binary.go"), [0xff, 0xfe, 0x00, b'l']).unwrap();

    let (summary, _, stderr) = run_captured(&tree.options());

    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].path, tree.path("internal/binary.go"));
    assert_eq!(summary.files_modified, 3);
    assert_eq!(summary.files_scanned, 7);
    assert!(stderr.contains("Error processing"));
    assert!(stderr.contains("binary.go"));
}

#[test]
fn test_missing_target_fails_before_touching_anything() {
    let temp = TempDir::new().unwrap();
    let options = RunOptions {
        target: temp.path().join("nope"),
        ..RunOptions::default()
    };

    let mut out = Vec::new();
    let err = run(&options, &mut out, &mut io::sink()).unwrap_err();

    assert!(err.to_string().contains("does not exist"));
    assert!(out.is_empty());
}

#[test]
fn test_json_summary() {
    let tree = Tree::new();
    let (_, stdout, _) = run_captured(&RunOptions {
        json: true,
        dry_run: true,
        ..tree.options()
    });

    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["files_modified"], 3);
    assert_eq!(value["total_replacements"], 5);
    assert_eq!(value["replacements_by_rule"]["log.Println"], 2);
    assert_eq!(value["dry_run"], true);
}

#[test]
fn test_diff_output() {
    let tree = Tree::new();
    let (_, stdout, _) = run_captured(&RunOptions {
        show_diff: true,
        dry_run: true,
        ..tree.options()
    });

    assert!(stdout.contains("L7: - \tlog.Print(\"start\")\n"));
    assert!(stdout.contains("L7: + \tlogger.Debug(\"start\")\n"));
}

#[test]
fn test_failed_backup_write_leaves_live_file_alone() {
    let tree = Tree::new();
    fs::create_dir(tree.path("controllers/handler.go.bak")).unwrap();

    let (summary, _, stderr) = run_captured(&tree.options());

    assert_eq!(tree.read("controllers/handler.go"), HANDLER);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].path, tree.path("controllers/handler.go"));
    assert!(stderr.contains("handler.go.bak"));
    // The other two files are still rewritten
    assert_eq!(summary.files_modified, 2);
}

#[test]
fn test_backup_failure_in_single_file_tree_modifies_nothing() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("backend");
    fs::create_dir_all(root.join("a.go.bak")).unwrap();
    fs::write(root.join("a.go"), "log.Print(x)\n").unwrap();

    let options = RunOptions {
        target: root.clone(),
        ..RunOptions::default()
    };
    let summary = run(&options, &mut io::sink(), &mut io::sink()).unwrap();

    assert_eq!(summary.files_modified, 0);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(fs::read_to_string(root.join("a.go")).unwrap(), "log.Print(x)\n");
}

#[test]
fn test_backup_suffix_matching_extension_is_rejected() {
    let tree = Tree::new();
    let before = tree.snapshot();

    let mut out = Vec::new();
    let err = run(
        &RunOptions {
            backup_suffix: ".orig.go".to_string(),
            ..tree.options()
        },
        &mut out,
        &mut io::sink(),
    )
    .unwrap_err();

    assert!(err.to_string().contains("scanned extension"));
    assert!(out.is_empty());
    assert_eq!(tree.snapshot(), before);
}

#[cfg(unix)]
#[test]
fn test_symlinked_file_counts_as_skipped() {
    let tree = Tree::new();
    std::os::unix::fs::symlink(tree.path("internal/apply.go"), tree.path("internal/link.go"))
        .unwrap();

    let (summary, _, _) = run_captured(&tree.options());

    assert_eq!(summary.files_scanned, 7);
    assert_eq!(summary.files_skipped, 3);
    assert_eq!(summary.files_modified, 3);
}
