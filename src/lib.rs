//! logswap: migrate Go `log.Printf`/`Print`/`Println` calls to `logger.Debug`
//!
//! The library holds the walker, rule engine, follow-up heuristic and
//! reporter so they can be tested directly. The binary is at src/main.rs.

pub mod cli;
pub mod config;
pub mod error_helpers;
pub mod file_processor;
pub mod flagger;
pub mod logger;
pub mod reporter;
pub mod rules;
pub mod runner;
pub mod walker;

// Re-export commonly used types for convenience
pub use file_processor::{FileOutcome, FileProcessor, FileRecord, ProcessOptions};
pub use flagger::needs_logger_param;
pub use reporter::{Reporter, RunSummary};
pub use rules::{Rewrite, RuleCount, RuleEngine};
pub use runner::{RunOptions, run};
pub use walker::{Candidate, SkipReason};
