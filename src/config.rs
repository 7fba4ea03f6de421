//! Configuration management for logswap
//!
//! logswap reads optional configuration from ~/.logswap/config.toml.
//! Command-line flags override anything set here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// logswap configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub backup: BackupConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Directory scanned when none is given on the command line
    #[serde(default = "default_dir")]
    pub default_dir: String,

    /// Source file extension, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            default_dir: default_dir(),
            extension: default_extension(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Suffix appended to the original file name
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub debug: bool,
}

// Default functions for serde
fn default_dir() -> String { "backend".to_string() }
fn default_extension() -> String { "go".to_string() }
fn default_suffix() -> String { ".bak".to_string() }

/// Directory holding the config file and debug log
pub fn config_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home_dir.join(".logswap"))
}

/// Get the configuration file path
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load configuration from the default location.
///
/// A missing file (or an undeterminable home directory) means defaults.
pub fn load_config() -> Result<Config> {
    match config_file_path() {
        Ok(path) if path.exists() => load_config_from(&path),
        _ => Ok(Config::default()),
    }
}

/// Load and validate configuration from an explicit file
pub fn load_config_from(path: &Path) -> Result<Config> {
    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&config_str)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    validate_config(&config)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;

    Ok(config)
}

/// Validate configuration values
pub fn validate_config(config: &Config) -> Result<()> {
    let extension = &config.scan.extension;
    if extension.is_empty() {
        anyhow::bail!("Invalid extension: must not be empty");
    }
    if extension.contains('.') || extension.contains('/') {
        anyhow::bail!("Invalid extension: {} (give it without a dot, e.g. \"go\")", extension);
    }

    let suffix = &config.backup.suffix;
    if !suffix.starts_with('.') || suffix.len() < 2 {
        anyhow::bail!("Invalid backup suffix: {:?} (must start with '.', e.g. \".bak\")", suffix);
    }
    if suffix.contains('/') {
        anyhow::bail!("Invalid backup suffix: {:?} (must not contain '/')", suffix);
    }

    check_backup_suffix(suffix, extension)
}

/// Backups must not look like source files, or the next run rewrites them
pub fn check_backup_suffix(suffix: &str, extension: &str) -> Result<()> {
    if suffix.ends_with(&format!(".{}", extension)) {
        anyhow::bail!(
            "Invalid backup suffix: {:?} (backups would match the scanned extension .{})",
            suffix,
            extension
        );
    }
    Ok(())
}
