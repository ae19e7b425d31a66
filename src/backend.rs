//! Orchestration backend
//!
//! The sequencer never talks to the container runtime directly. It issues
//! `build` / `up -d` / `ps` through the [`ComposeBackend`] trait, and the
//! backend owns the service stack entirely.
//!
//! The concrete [`DockerCompose`] implementation prefers the standalone
//! `docker-compose` binary when present and falls back to the `docker
//! compose` plugin form.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{DeployError, DeployResult};

/// Status of one managed service as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStatus {
    pub name: String,
    pub state: String,
}

impl ServiceStatus {
    /// Whether the backend considers this service running
    pub fn is_up(&self) -> bool {
        self.state.contains("Up") || self.state.contains("running")
    }
}

/// Interface to the external orchestration system.
///
/// Implementations may fail with a backend-reported error on any
/// operation; the sequencer propagates those failures verbatim.
pub trait ComposeBackend {
    /// Human-readable command line, for reporting
    fn describe(&self) -> String;

    /// Verify the backend CLI is installed and runnable
    fn ensure_available(&self) -> DeployResult<()>;

    /// Build all service images
    fn build(&self) -> DeployResult<()>;

    /// Start the stack
    fn up(&self, detached: bool) -> DeployResult<()>;

    /// Query per-service status
    fn ps(&self) -> DeployResult<Vec<ServiceStatus>>;
}

/// Backend driving the docker compose CLI
pub struct DockerCompose {
    program: String,
    base_args: Vec<String>,
    descriptor: PathBuf,
    workdir: PathBuf,
}

impl DockerCompose {
    /// Pick the compose command for this host.
    ///
    /// An explicit `command` from `stackup.toml` wins; otherwise prefer
    /// `docker-compose` if it resolves on PATH, falling back to
    /// `docker compose`.
    pub fn detect(workdir: &Path, descriptor: &Path, command: Option<&[String]>) -> Self {
        let (program, base_args) = match command {
            Some([program, rest @ ..]) => (program.clone(), rest.to_vec()),
            _ => {
                let standalone = Command::new("which")
                    .arg("docker-compose")
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status()
                    .map(|s| s.success())
                    .unwrap_or(false);
                if standalone {
                    ("docker-compose".to_string(), Vec::new())
                } else {
                    ("docker".to_string(), vec!["compose".to_string()])
                }
            }
        };

        Self {
            program,
            base_args,
            descriptor: descriptor.to_path_buf(),
            workdir: workdir.to_path_buf(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.base_args)
            .arg("-f")
            .arg(&self.descriptor)
            .current_dir(&self.workdir);
        cmd
    }

    fn tool_missing(&self) -> DeployError {
        DeployError::ToolMissing {
            tool: self.describe(),
        }
    }
}

impl ComposeBackend for DockerCompose {
    fn describe(&self) -> String {
        if self.base_args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.base_args.join(" "))
        }
    }

    fn ensure_available(&self) -> DeployResult<()> {
        let result = Command::new(&self.program)
            .args(&self.base_args)
            .arg("version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match result {
            Ok(status) if status.success() => Ok(()),
            Ok(_) => Err(self.tool_missing()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(self.tool_missing()),
            Err(e) => Err(DeployError::Io(e)),
        }
    }

    fn build(&self) -> DeployResult<()> {
        // Inherit stdio so the operator sees build output live
        let status = self.command().arg("build").status().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                self.tool_missing()
            } else {
                DeployError::BuildFailed(e.to_string())
            }
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(DeployError::BuildFailed(format!(
                "{} build exited with {}",
                self.describe(),
                status
            )))
        }
    }

    fn up(&self, detached: bool) -> DeployResult<()> {
        let mut cmd = self.command();
        cmd.arg("up");
        if detached {
            cmd.arg("-d");
        }

        let status = cmd.status().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                self.tool_missing()
            } else {
                DeployError::StartFailed(e.to_string())
            }
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(DeployError::StartFailed(format!(
                "{} up exited with {}",
                self.describe(),
                status
            )))
        }
    }

    fn ps(&self) -> DeployResult<Vec<ServiceStatus>> {
        let output = self.command().arg("ps").output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                self.tool_missing()
            } else {
                DeployError::Io(e)
            }
        })?;

        if !output.status.success() {
            return Err(DeployError::Io(std::io::Error::other(format!(
                "{} ps exited with {}",
                self.describe(),
                output.status
            ))));
        }

        Ok(parse_ps_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parse the tabular `ps` output into per-service statuses.
///
/// The first line is the column header; each following non-empty line is
/// one service, with the container name in the first column.
pub fn parse_ps_output(output: &str) -> Vec<ServiceStatus> {
    output
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let name = line.split_whitespace().next()?;
            Some(ServiceStatus {
                name: name.to_string(),
                state: line.trim_end().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PS_MIXED: &str = "\
NAME                IMAGE          COMMAND       SERVICE   CREATED        STATUS                  PORTS
stack-web-1         stack-web      \"python run\"  web       2 minutes ago  Up 2 minutes            0.0.0.0:9090->8000/tcp
stack-mongo-1       mongo:6        \"mongod\"      mongo     2 minutes ago  Exited (1) 1 minute ago
";

    #[test]
    fn test_parse_ps_output_skips_header() {
        let services = parse_ps_output(PS_MIXED);
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].name, "stack-web-1");
        assert_eq!(services[1].name, "stack-mongo-1");
    }

    #[test]
    fn test_is_up_classification() {
        let services = parse_ps_output(PS_MIXED);
        assert!(services[0].is_up());
        assert!(!services[1].is_up());
    }

    #[test]
    fn test_parse_ps_output_empty() {
        assert!(parse_ps_output("").is_empty());
        assert!(parse_ps_output("NAME IMAGE STATUS\n").is_empty());
    }

    #[test]
    fn test_detect_honors_command_override() {
        let backend = DockerCompose::detect(
            Path::new("/proj"),
            Path::new("/proj/docker-compose.yml"),
            Some(&["podman-compose".to_string()]),
        );
        assert_eq!(backend.describe(), "podman-compose");
    }

    #[test]
    fn test_detect_override_with_base_args() {
        let backend = DockerCompose::detect(
            Path::new("/proj"),
            Path::new("/proj/docker-compose.yml"),
            Some(&["docker".to_string(), "compose".to_string()]),
        );
        assert_eq!(backend.describe(), "docker compose");
    }

    #[test]
    fn test_missing_tool_is_tool_missing() {
        let backend = DockerCompose::detect(
            Path::new("."),
            Path::new("docker-compose.yml"),
            Some(&["definitely-not-a-real-compose-binary".to_string()]),
        );
        let err = backend.ensure_available().unwrap_err();
        assert!(matches!(err, DeployError::ToolMissing { .. }));
    }
}
