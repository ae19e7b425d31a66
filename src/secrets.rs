//! Secrets file materialization
//!
//! The secrets file is operator-owned: the sequencer creates it exactly
//! once by copying the template, and never touches it again on later
//! runs.

use std::fs;
use std::path::Path;

use crate::error::{DeployError, DeployResult};

/// What happened to the secrets file during materialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretsOutcome {
    /// File already existed; left untouched
    AlreadyPresent,
    /// File was created from the template this run
    Created,
}

/// Ensure the secrets file exists, copying the template if absent.
pub fn materialize(secrets: &Path, template: &Path) -> DeployResult<SecretsOutcome> {
    if secrets.exists() {
        return Ok(SecretsOutcome::AlreadyPresent);
    }

    if !template.exists() {
        return Err(DeployError::TemplateMissing {
            path: template.to_path_buf(),
        });
    }

    fs::copy(template, secrets)?;
    Ok(SecretsOutcome::Created)
}
