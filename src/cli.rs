use crate::config::{self, Config};
use crate::reporter;
use crate::runner::RunOptions;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "logswap")]
#[command(about = "Rewrite Go log.Printf/Print/Println calls to logger.Debug")]
#[command(long_about = "logswap walks a Go source tree and rewrites standard library log calls
to the structured logger:

  log.Printf(\"id=%d\", id)   ->  logger.Debug(\"id=%d\", id)
  log.Print(\"message\")      ->  logger.Debug(\"message\")
  log.Print(value)          ->  logger.Debug(\"%v\", value)
  log.Println(...)          ->  same as log.Print

Every changed file is first copied to <file>.bak. Test files (*_test.go) and
anything under vendor/ or .git/ are left alone.

The rewrite is textual, not a parse: multi-argument log.Print calls, calls
spanning lines and calls inside comments or strings need a manual review.
Files that now use logger.Debug without a logger parameter in sight are
listed at the end.

EXAMPLES:
  logswap                        Rewrite ./backend
  logswap services --dry-run     Preview counts without writing
  logswap . --dry-run --diff     Show the exact line changes
  logswap backend --json         Machine-readable summary")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Directory to scan (default: scan.default_dir from the config, or "backend")
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Dry run mode (report changes without writing files or backups)
    #[arg(short = 'd', long = "dry-run")]
    pub dry_run: bool,

    /// Show a line diff for each rewritten file
    #[arg(long)]
    pub diff: bool,

    /// Print the summary as JSON instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Read configuration from this file instead of ~/.logswap/config.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write debug logs to ~/.logswap/logswap.log
    #[arg(long)]
    pub debug: bool,

    /// Print the effective configuration and exit
    #[arg(long = "show-config")]
    pub show_config: bool,
}

#[derive(Debug)]
pub enum Args {
    Run { options: RunOptions, debug: bool },
    ShowConfig { config: Config },
}

pub fn parse_args() -> Result<Args> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config()?,
    };

    Ok(resolve(cli, config))
}

/// Merge command-line flags over the loaded configuration
pub fn resolve(cli: Cli, config: Config) -> Args {
    if cli.show_config {
        return Args::ShowConfig { config };
    }

    let target = cli
        .dir
        .unwrap_or_else(|| PathBuf::from(&config.scan.default_dir));

    Args::Run {
        options: RunOptions {
            target,
            extension: config.scan.extension,
            dry_run: cli.dry_run,
            backup_suffix: config.backup.suffix,
            show_diff: cli.diff,
            json: cli.json,
            color: !cli.json && reporter::should_use_color(),
        },
        debug: cli.debug || config.logging.debug,
    }
}
