//! Type definitions for setup MCP

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Configuration Types
// ============================================================================

/// Server configuration, loaded once at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub commands: CommandConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub instructions: InstructionsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Shell that interprets the command string via `-c`
    #[serde(default = "default_shell")]
    pub shell: String,
}

fn default_shell() -> String {
    "/bin/sh".to_string()
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            shell: default_shell(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Applied when the caller does not pass a timeout
    #[serde(default = "default_timeout")]
    pub default_secs: u64,
    /// Upper bound of the accepted timeout range (lower bound is 1)
    #[serde(default = "default_max_timeout")]
    pub max_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

fn default_max_timeout() -> u64 {
    300
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            default_secs: default_timeout(),
            max_secs: default_max_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstructionsConfig {
    /// Location of SETUP.md; defaults to the directory of the running executable
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Outcome of a `terminal_tool` call
///
/// `exit_code` 124 means the command timed out, 1 is also used for
/// validation and spawn failures; anything else is the process's own status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Exit code reported when the timeout expires
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// Exit code reported for validation and execution failures
pub const FAILURE_EXIT_CODE: i32 = 1;

// ============================================================================
// Error Types
// ============================================================================

/// Failures of a single command execution
///
/// Display strings are user-facing: they become `stderr` of the result.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("No command provided.")]
    EmptyCommand,

    #[error("Command blocked for security reasons.")]
    CommandDenied { pattern: String },

    #[error("Timeout must be between 1 and {max} seconds.")]
    InvalidTimeout { value: i64, max: u64 },

    #[error("Command timed out after {0} seconds.")]
    Timeout(u64),

    #[error("Error executing command: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl ExecError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecError::Timeout(_) => TIMEOUT_EXIT_CODE,
            ExecError::EmptyCommand
            | ExecError::CommandDenied { .. }
            | ExecError::InvalidTimeout { .. }
            | ExecError::Io(_)
            | ExecError::ConfigError(_) => FAILURE_EXIT_CODE,
        }
    }
}

impl From<ExecError> for CommandResult {
    fn from(err: ExecError) -> Self {
        CommandResult {
            stdout: String::new(),
            stderr: err.to_string(),
            exit_code: err.exit_code(),
        }
    }
}

/// Failures reading the instructions document
#[derive(Error, Debug)]
pub enum InstructionsError {
    #[error("SETUP.md file not found.")]
    NotFound,

    #[error("SETUP.md file is empty.")]
    Empty,

    #[error("Error decoding SETUP.md: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("Permission denied reading SETUP.md: {0}")]
    PermissionDenied(std::io::Error),

    #[error("Error reading SETUP.md: {0}")]
    Io(std::io::Error),
}

impl From<std::io::Error> for InstructionsError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => InstructionsError::NotFound,
            std::io::ErrorKind::PermissionDenied => InstructionsError::PermissionDenied(err),
            _ => InstructionsError::Io(err),
        }
    }
}
