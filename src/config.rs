//! Deployment configuration
//!
//! Configuration is resolved exactly once at startup from three layers:
//! CLI positional overrides win over `stackup.toml` values, which win over
//! built-in defaults. The resolved [`DeploymentConfig`] is immutable and
//! threaded through the sequence explicitly - nothing downstream reads
//! ambient process state.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{DeployError, DeployResult};

/// Default host port exposed by the stack
pub const DEFAULT_PORT: u32 = 88888;

/// Default public hostname printed in the access report
pub const DEFAULT_DOMAIN: &str = "stack.example.com";

/// Name of the optional project configuration file
pub const CONFIG_FILE_NAME: &str = "stackup.toml";

const DEFAULT_DESCRIPTOR: &str = "docker-compose.yml";
const DEFAULT_SECRETS: &str = ".env";
const DEFAULT_SECRETS_TEMPLATE: &str = ".env.template";
const DEFAULT_SETTLE_SECS: u64 = 10;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Raw `stackup.toml` contents. All keys are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub deploy: DeploySection,
    pub backend: BackendSection,
    pub readiness: ReadinessSection,
}

/// `[deploy]` section: port, domain, and artifact paths
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeploySection {
    pub port: Option<u32>,
    pub domain: Option<String>,
    pub descriptor: Option<PathBuf>,
    pub secrets: Option<PathBuf>,
    pub secrets_template: Option<PathBuf>,
}

/// `[backend]` section: override for the orchestration command line,
/// e.g. `command = ["docker", "compose"]`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BackendSection {
    pub command: Option<Vec<String>>,
}

/// `[readiness]` section: bounded-wait tuning
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReadinessSection {
    pub settle_secs: Option<u64>,
    pub poll_interval_secs: Option<u64>,
    pub max_attempts: Option<u32>,
}

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
}

/// Fully resolved deployment configuration.
///
/// Paths are absolute-ized against the project root at resolution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
    pub port: u32,
    pub domain: String,
    pub descriptor: PathBuf,
    pub secrets: PathBuf,
    pub secrets_template: PathBuf,
    pub backend_command: Option<Vec<String>>,
    pub settle: Duration,
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl DeploymentConfig {
    /// Apply override-or-default policy on top of the loaded file.
    pub fn resolve(
        root: &Path,
        file: &ConfigFile,
        port_override: Option<u32>,
        domain_override: Option<String>,
    ) -> Self {
        let join = |p: Option<&PathBuf>, default: &str| {
            root.join(p.map(PathBuf::as_path).unwrap_or_else(|| Path::new(default)))
        };

        Self {
            port: port_override.or(file.deploy.port).unwrap_or(DEFAULT_PORT),
            domain: domain_override
                .or_else(|| file.deploy.domain.clone())
                .unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            descriptor: join(file.deploy.descriptor.as_ref(), DEFAULT_DESCRIPTOR),
            secrets: join(file.deploy.secrets.as_ref(), DEFAULT_SECRETS),
            secrets_template: join(
                file.deploy.secrets_template.as_ref(),
                DEFAULT_SECRETS_TEMPLATE,
            ),
            backend_command: file.backend.command.clone().filter(|c| !c.is_empty()),
            settle: Duration::from_secs(
                file.readiness.settle_secs.unwrap_or(DEFAULT_SETTLE_SECS),
            ),
            poll_interval: Duration::from_secs(
                file.readiness
                    .poll_interval_secs
                    .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
            ),
            // zero attempts would skip the readiness check entirely
            max_attempts: file
                .readiness
                .max_attempts
                .unwrap_or(DEFAULT_MAX_ATTEMPTS)
                .max(1),
        }
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> DeployResult<(ConfigFile, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: ConfigFile = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| DeployError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|key| ConfigWarning {
            key,
            file: path.to_path_buf(),
        })
        .collect();

    Ok((config, warnings))
}

/// Load `stackup.toml` from the project root, or defaults when absent.
pub fn load_project(root: &Path) -> DeployResult<(ConfigFile, Vec<ConfigWarning>)> {
    let path = root.join(CONFIG_FILE_NAME);
    if path.exists() {
        load_with_warnings(&path)
    } else {
        Ok((ConfigFile::default(), Vec::new()))
    }
}
