//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::paths::config_path;
use super::{Error, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Run defaults (output location, cleanup command)
    #[serde(default)]
    pub run: RunConfig,

    /// Build-cache wrapper and test-runner selection
    #[serde(default)]
    pub toolchain: ToolchainConfig,
}

/// Run defaults
#[derive(Debug, Deserialize)]
pub struct RunConfig {
    /// Prefix of the results and log file names
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,

    /// Directory the results and log files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Cleanup command, run from the scenario directory
    #[serde(default = "default_clean_command")]
    pub clean_command: String,

    /// Run the cleanup once at the start of every toolchain cycle
    #[serde(default)]
    pub clean_each_cycle: bool,

    /// Shell used to interpret command strings
    #[serde(default = "default_shell")]
    pub shell: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_prefix: default_output_prefix(),
            output_dir: default_output_dir(),
            clean_command: default_clean_command(),
            clean_each_cycle: false,
            shell: default_shell(),
        }
    }
}

fn default_output_prefix() -> String {
    "output".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_clean_command() -> String {
    "./clean.sh".to_string()
}
fn default_shell() -> String {
    "sh".to_string()
}

/// Toolchain selection
#[derive(Debug, Deserialize)]
pub struct ToolchainConfig {
    /// Comma-separated list of `none`, `sccache`
    #[serde(default = "default_rustc_wrapper")]
    pub rustc_wrapper: String,

    /// Comma-separated list of `test`, `nextest`
    #[serde(default = "default_test_runner")]
    pub test_runner: String,

    /// Explicit sccache location; looked up on PATH when unset
    #[serde(default)]
    pub sccache_path: Option<PathBuf>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            rustc_wrapper: default_rustc_wrapper(),
            test_runner: default_test_runner(),
            sccache_path: None,
        }
    }
}

fn default_rustc_wrapper() -> String {
    "none".to_string()
}
fn default_test_runner() -> String {
    "test".to_string()
}

impl Config {
    /// Load configuration from an explicit file, or the default config file
    ///
    /// Returns default configuration if no file is given and the default
    /// file doesn't exist. An explicit file must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }
}
