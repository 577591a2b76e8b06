//! Error types for depkeep operations.
//!
//! This module defines [`DepkeepError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Only a missing or invalid requirements file (and an unwritable
//!   ledger) is fatal to a run
//! - Backend query and install failures are logged and degrade to
//!   "unknown" or "skip"
//! - Use `anyhow::Error` (via `DepkeepError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for depkeep operations.
#[derive(Debug, Error)]
pub enum DepkeepError {
    /// Requirements file not found at the configured location.
    #[error("Requirements file not found: {path}")]
    RequirementsNotFound { path: PathBuf },

    /// Requirements file exists but could not be parsed or is invalid.
    #[error("Invalid requirements at {path}: {message}")]
    RequirementsParseError { path: PathBuf, message: String },

    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A subprocess could not be run or exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// A subprocess exceeded its timeout and was killed.
    #[error("Command timed out after {seconds}s: {command}")]
    CommandTimedOut { command: String, seconds: u64 },

    /// The package manager binary for a backend is not present.
    #[error("Backend '{backend}' is not available on this system")]
    BackendUnavailable { backend: String },

    /// An install, upgrade or downgrade did not succeed.
    #[error("Failed to install '{package}': {message}")]
    InstallFailed { package: String, message: String },

    /// The ledger could not be written.
    #[error("Failed to write ledger at {path}: {message}")]
    LedgerWriteError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for depkeep operations.
pub type Result<T> = std::result::Result<T, DepkeepError>;
