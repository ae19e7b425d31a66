//! Error types for Stackup
//!
//! Uses `thiserror` for library errors; the binary layer wraps these in
//! `anyhow` at the command boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Stackup operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Main error type for Stackup operations
///
/// Every variant is terminal for the current run: there is no retry or
/// rollback policy anywhere in the sequencer.
#[derive(Error, Debug)]
pub enum DeployError {
    /// Orchestration backend CLI is not installed or not on PATH
    #[error("'{tool}' not found - install it before deploying")]
    ToolMissing { tool: String },

    /// Descriptor rewrite could not be applied
    #[error("cannot rewrite {file}: {reason}")]
    ConfigRewriteFailed { file: PathBuf, reason: String },

    /// Backend build step failed
    #[error("build failed: {0}")]
    BuildFailed(String),

    /// Backend start step failed
    #[error("start failed: {0}")]
    StartFailed(String),

    /// Stack never reported a running service within the polling window
    #[error("stack not ready after {waited_secs}s - check the service logs")]
    NotReady { waited_secs: u64 },

    /// Secrets template is missing, so the secrets file cannot be created
    #[error("secrets template not found: {path}")]
    TemplateMissing { path: PathBuf },

    /// Operator declined the secrets confirmation pause
    #[error("deployment aborted by user")]
    Aborted,

    /// Invalid project configuration file
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error (descriptor)
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}
