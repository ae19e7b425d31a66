//! Orchestration descriptor rewrite
//!
//! The compose descriptor ships with a default host-port mapping. Bringing
//! the stack up on another port means rewriting that mapping, which is done
//! as a structured read-modify-write of the parsed YAML rather than a
//! textual substitution. The original file is kept next to the descriptor
//! as a `.bak` backup.
//!
//! Idempotency guard: a descriptor already mapped to the resolved port is
//! a no-op success. A descriptor carrying neither the default nor the
//! resolved mapping (e.g. a previous run used a different port) is a
//! reported failure, never a silent one.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_yaml_ng::Value;

use crate::error::{DeployError, DeployResult};

/// Container-side port every service mapping targets
pub const CONTAINER_PORT: u32 = 8000;

/// Host mapping the descriptor ships with
pub const DEFAULT_MAPPING: &str = "8000:8000";

/// Host-port mapping for a resolved port
pub fn host_mapping(port: u32) -> String {
    format!("{port}:{CONTAINER_PORT}")
}

/// Read-only view of the descriptor's port mappings, for precondition
/// checks that must not touch the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingState {
    /// Default mappings present; a rewrite to this port would apply
    RewritableDefault(usize),
    /// Descriptor already maps the resolved port
    AlreadyCurrent,
    /// Neither the default nor the resolved mapping exists
    Missing,
}

/// Scan the descriptor without modifying it.
pub fn scan_port_mapping(path: &Path, port: u32) -> DeployResult<MappingState> {
    let content = fs::read_to_string(path)?;
    let doc: Value = serde_yaml_ng::from_str(&content)?;
    let target = host_mapping(port);

    let mut defaults = 0usize;
    let mut current = 0usize;

    if let Some(services) = doc.get("services").and_then(Value::as_mapping) {
        for (_name, service) in services.iter() {
            let Some(ports) = service.get("ports").and_then(Value::as_sequence) else {
                continue;
            };
            for entry in ports {
                match entry.as_str() {
                    Some(mapping) if mapping == target => current += 1,
                    Some(mapping) if mapping == DEFAULT_MAPPING => defaults += 1,
                    _ => {}
                }
            }
        }
    }

    if defaults > 0 {
        Ok(MappingState::RewritableDefault(defaults))
    } else if current > 0 {
        Ok(MappingState::AlreadyCurrent)
    } else {
        Ok(MappingState::Missing)
    }
}

/// Result of a descriptor rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// Mappings were replaced and the original backed up
    Rewritten { replaced: usize, backup: PathBuf },
    /// Descriptor already maps the resolved port; nothing written
    AlreadyCurrent,
}

/// Rewrite the default port mapping in the descriptor to `port`.
pub fn rewrite_port_mapping(path: &Path, port: u32) -> DeployResult<RewriteOutcome> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DeployError::ConfigRewriteFailed {
                file: path.to_path_buf(),
                reason: "descriptor not found".to_string(),
            }
        } else {
            DeployError::Io(e)
        }
    })?;

    let mut doc: Value = serde_yaml_ng::from_str(&content)?;
    let target = host_mapping(port);

    let mut replaced = 0usize;
    let mut current = 0usize;

    if let Some(services) = doc.get_mut("services").and_then(Value::as_mapping_mut) {
        for (_name, service) in services.iter_mut() {
            let Some(ports) = service.get_mut("ports").and_then(Value::as_sequence_mut) else {
                continue;
            };
            for entry in ports.iter_mut() {
                let Some(mapping) = entry.as_str() else {
                    continue;
                };
                if mapping == target {
                    current += 1;
                } else if mapping == DEFAULT_MAPPING {
                    *entry = Value::String(target.clone());
                    replaced += 1;
                }
            }
        }
    }

    if replaced > 0 {
        let backup = backup_path(path);
        fs::write(&backup, &content)?;
        let rewritten = serde_yaml_ng::to_string(&doc)?;
        write_atomic(path, &rewritten)?;
        Ok(RewriteOutcome::Rewritten { replaced, backup })
    } else if current > 0 {
        Ok(RewriteOutcome::AlreadyCurrent)
    } else {
        Err(DeployError::ConfigRewriteFailed {
            file: path.to_path_buf(),
            reason: format!(
                "no '{DEFAULT_MAPPING}' port mapping found - was it already rewritten with a different port?"
            ),
        })
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

fn write_atomic(path: &Path, content: &str) -> DeployResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path).map_err(|e| DeployError::Io(e.error))?;
    Ok(())
}
