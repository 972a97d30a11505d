//! Instructions provider - serves the SETUP.md document
//!
//! The file is re-read on every request and never written.

use std::path::{Path, PathBuf};

use crate::types::{Config, InstructionsError};

/// File name of the instructions document
pub const SETUP_FILE_NAME: &str = "SETUP.md";

/// Reads the setup instructions document from a fixed location
#[derive(Debug, Clone)]
pub struct InstructionsProvider {
    path: PathBuf,
}

impl InstructionsProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use the configured path, or SETUP.md next to the running executable
    pub fn from_config(config: &Config) -> Self {
        match &config.instructions.path {
            Some(path) => Self::new(path),
            None => Self::new(default_path()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document, classifying every failure
    pub fn read(&self) -> Result<String, InstructionsError> {
        if !self.path.exists() {
            return Err(InstructionsError::NotFound);
        }

        let bytes = std::fs::read(&self.path)?;
        let text = String::from_utf8(bytes)?;

        if text.trim().is_empty() {
            return Err(InstructionsError::Empty);
        }

        Ok(text)
    }

    /// Document text, or a descriptive message when it cannot be served
    pub fn get_instructions(&self) -> String {
        match self.read() {
            Ok(text) => text,
            Err(err) => {
                let path = self.path.display();
                match &err {
                    InstructionsError::NotFound => {
                        tracing::warn!("Instructions not found at {}", path)
                    }
                    InstructionsError::Empty => tracing::warn!("Instructions at {} are empty", path),
                    InstructionsError::Decode(e) => {
                        tracing::warn!("Instructions at {} are not UTF-8: {}", path, e)
                    }
                    InstructionsError::PermissionDenied(e) => {
                        tracing::warn!("No permission to read {}: {}", path, e)
                    }
                    InstructionsError::Io(e) => tracing::warn!("Failed to read {}: {}", path, e),
                }
                err.to_string()
            }
        }
    }
}

fn default_path() -> PathBuf {
    match std::env::current_exe() {
        Ok(exe) => exe
            .parent()
            .map(|dir| dir.join(SETUP_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(SETUP_FILE_NAME)),
        Err(e) => {
            tracing::warn!("Cannot locate executable ({}), using ./{}", e, SETUP_FILE_NAME);
            PathBuf::from(SETUP_FILE_NAME)
        }
    }
}
