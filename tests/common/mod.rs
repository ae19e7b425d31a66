//! Common test utilities for Stackup CLI tests.
//!
//! Provides `TestEnv` - an isolated project directory with a compose
//! descriptor, a secrets template, and a stub orchestration backend that
//! records every invocation, so the full CLI can run without docker.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Descriptor every test project starts from
pub const DESCRIPTOR: &str = "\
services:
  web:
    build: .
    ports:
      - \"8000:8000\"
    env_file: .env
  mongo:
    image: mongo:6
";

pub const TEMPLATE: &str = "API_KEY=\nMONGO_URI=mongodb://mongo:27017\n";

/// `ps` output with one running service
pub const PS_UP: &str = "\
NAME          IMAGE     COMMAND        SERVICE   CREATED         STATUS         PORTS
stack-web-1   web       \"python run\"   web       2 seconds ago   Up 2 seconds   0.0.0.0:9090->8000/tcp
";

/// `ps` output where everything exited
pub const PS_DOWN: &str = "\
NAME          IMAGE     COMMAND        SERVICE   CREATED         STATUS
stack-web-1   web       \"python run\"   web       2 seconds ago   Exited (1) 1 second ago
";

/// Result of running a Stackup CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated project directory plus a stub backend executable.
pub struct TestEnv {
    pub project: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    pub fn builder() -> TestEnvBuilder {
        TestEnvBuilder::default()
    }

    /// Get path relative to the project root
    pub fn path(&self, relative: &str) -> PathBuf {
        self.project.path().join(relative)
    }

    /// Run the stackup CLI from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        let output = Command::new(&self.bin)
            .current_dir(self.project.path())
            .args(args)
            .output()
            .expect("Failed to execute stackup");
        self.output_to_result(output)
    }

    fn output_to_result(&self, output: Output) -> TestResult {
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    pub fn write_file(&self, relative: &str, content: &str) {
        let full = self.path(relative);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("Failed to create directories");
        }
        fs::write(&full, content).expect("Failed to write file");
    }

    pub fn read_file(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative))
            .unwrap_or_else(|e| panic!("Failed to read {relative}: {e}"))
    }

    /// What the stub backend will print for `ps`
    pub fn set_ps_output(&self, content: &str) {
        self.write_file("stub/ps-output", content);
    }

    /// Make the stub backend fail a given subcommand (`build`, `up`, ...)
    pub fn fail_step(&self, step: &str) {
        self.write_file(&format!("stub/fail-{step}"), "");
    }

    /// Every invocation of the stub backend, one line per call
    pub fn backend_log(&self) -> String {
        let path = self.path("stub/backend.log");
        if path.exists() {
            fs::read_to_string(path).expect("Failed to read backend log")
        } else {
            String::new()
        }
    }
}

#[derive(Default)]
pub struct TestEnvBuilder {
    descriptor: Option<String>,
    secrets: Option<String>,
    without_template: bool,
    broken_backend: bool,
    ps_output: Option<String>,
}

impl TestEnvBuilder {
    /// Replace the default descriptor content
    pub fn with_descriptor(mut self, content: &str) -> Self {
        self.descriptor = Some(content.to_string());
        self
    }

    /// Pre-create the secrets file
    pub fn with_secrets(mut self, content: &str) -> Self {
        self.secrets = Some(content.to_string());
        self
    }

    /// Leave out the secrets template
    pub fn without_template(mut self) -> Self {
        self.without_template = true;
        self
    }

    /// Point the backend command at a binary that does not exist
    pub fn with_broken_backend(mut self) -> Self {
        self.broken_backend = true;
        self
    }

    /// Initial `ps` output (defaults to one service up)
    pub fn with_ps_output(mut self, content: &str) -> Self {
        self.ps_output = Some(content.to_string());
        self
    }

    pub fn build(self) -> TestEnv {
        let project = TempDir::new().expect("Failed to create temp dir");
        let root = project.path();

        fs::write(
            root.join("docker-compose.yml"),
            self.descriptor.as_deref().unwrap_or(DESCRIPTOR),
        )
        .expect("Failed to write descriptor");

        if !self.without_template {
            fs::write(root.join(".env.template"), TEMPLATE).expect("Failed to write template");
        }
        if let Some(secrets) = &self.secrets {
            fs::write(root.join(".env"), secrets).expect("Failed to write secrets");
        }

        let stub_dir = root.join("stub");
        fs::create_dir_all(&stub_dir).expect("Failed to create stub dir");
        let stub = stub_dir.join("mock-compose");
        write_stub(&stub);
        fs::write(
            stub_dir.join("ps-output"),
            self.ps_output.as_deref().unwrap_or(PS_UP),
        )
        .expect("Failed to write ps output");

        let backend = if self.broken_backend {
            root.join("stub/no-such-compose")
        } else {
            stub.clone()
        };

        fs::write(
            root.join("stackup.toml"),
            format!(
                "[backend]\ncommand = [\"{}\"]\n\n\
                 [readiness]\nsettle_secs = 0\npoll_interval_secs = 0\nmax_attempts = 2\n",
                backend.display()
            ),
        )
        .expect("Failed to write stackup.toml");

        TestEnv {
            project,
            bin: PathBuf::from(env!("CARGO_BIN_EXE_stackup")),
        }
    }
}

fn write_stub(path: &Path) {
    let script = "\
#!/bin/sh
dir=\"$(dirname \"$0\")\"
printf '%s\\n' \"$*\" >> \"$dir/backend.log\"
cmd=\"\"
for a in \"$@\"; do
  case \"$a\" in
    version|build|up|ps) cmd=\"$a\"; break;;
  esac
done
if [ -n \"$cmd\" ] && [ -e \"$dir/fail-$cmd\" ]; then
  exit 1
fi
if [ \"$cmd\" = \"ps\" ] && [ -e \"$dir/ps-output\" ]; then
  cat \"$dir/ps-output\"
fi
exit 0
";
    fs::write(path, script).expect("Failed to write stub backend");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path).expect("stub metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms).expect("Failed to chmod stub");
    }
}
