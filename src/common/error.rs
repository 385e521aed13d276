//! Error types for the benchmark harness
//!
//! Every error is fatal: the harness stops on the first one and reports it
//! without flushing partial results.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the benchmark harness
#[derive(Error, Debug)]
pub enum Error {
    // === Scenario Errors ===
    #[error("Failed to read scenario '{path}': {error}")]
    ScenarioRead { path: String, error: String },

    #[error("Malformed section at line {line}: {reason}\n  partial section: {partial}")]
    MalformedSection {
        line: usize,
        reason: String,
        partial: String,
    },

    #[error("Section opened at line {line} is never closed with '# end'\n  partial section: {partial}")]
    UnterminatedSection { line: usize, partial: String },

    // === Toolchain Errors ===
    #[error("Unsupported {kind} '{value}'")]
    UnsupportedOption { kind: String, value: String },

    #[error("Rustc wrapper '{0}' not found. Install it or set toolchain.sccache_path in the config file")]
    WrapperNotFound(String),

    // === Execution Errors ===
    #[error("Command '{command}' failed with exit code {code:?}")]
    CommandFailed { command: String, code: Option<i32> },

    #[error("Failed to start command '{command}': {error}")]
    CommandSpawn { command: String, error: String },

    // === Configuration Errors ===
    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    #[error("Failed to write file '{path}': {error}")]
    FileWrite { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a malformed section error
    pub fn malformed(line: usize, reason: impl Into<String>, partial: impl Into<String>) -> Self {
        Self::MalformedSection {
            line,
            reason: reason.into(),
            partial: partial.into(),
        }
    }

    /// Create an unsupported option error
    pub fn unsupported(kind: &str, value: &str) -> Self {
        Self::UnsupportedOption {
            kind: kind.to_string(),
            value: value.to_string(),
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: &str, code: Option<i32>) -> Self {
        Self::CommandFailed {
            command: command.to_string(),
            code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message_carries_partial_state() {
        let err = Error::malformed(4, "1 step name(s) for 2 command(s)", "steps=[build]");
        let msg = err.to_string();
        assert!(msg.contains("line 4"));
        assert!(msg.contains("steps=[build]"));
    }

    #[test]
    fn test_command_failed_message() {
        let err = Error::command_failed("cargo test", Some(101));
        assert_eq!(
            err.to_string(),
            "Command 'cargo test' failed with exit code Some(101)"
        );
    }
}
