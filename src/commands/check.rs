//! `stackup check` - precondition report without side effects

use std::path::Path;

use anyhow::Result;
use serde_json::json;

use stackup::{config, ComposeBackend, DeploymentConfig, DockerCompose, MappingState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CheckStatus {
    Pass,
    Warning,
    Error,
}

struct Check {
    name: &'static str,
    status: CheckStatus,
    message: String,
}

impl Check {
    fn pass(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            status: CheckStatus::Pass,
            message: message.into(),
        }
    }

    fn warning(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            status: CheckStatus::Warning,
            message: message.into(),
        }
    }

    fn error(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            status: CheckStatus::Error,
            message: message.into(),
        }
    }
}

pub fn cmd_check(dir: &Path, json: bool) -> Result<()> {
    let mut checks = Vec::new();

    let file = match config::load_project(dir) {
        Ok((file, warnings)) => {
            checks.push(Check::pass("config", "configuration loads"));
            for warning in &warnings {
                checks.push(Check::warning(
                    "config",
                    format!("unknown key '{}'", warning.key),
                ));
            }
            file
        }
        Err(e) => {
            checks.push(Check::error("config", e.to_string()));
            config::ConfigFile::default()
        }
    };

    let config = DeploymentConfig::resolve(dir, &file, None, None);
    checks.push(Check::pass(
        "resolved",
        format!("port {}, domain {}", config.port, config.domain),
    ));

    let backend = DockerCompose::detect(dir, &config.descriptor, config.backend_command.as_deref());
    match backend.ensure_available() {
        Ok(()) => checks.push(Check::pass(
            "backend",
            format!("'{}' available", backend.describe()),
        )),
        Err(e) => checks.push(Check::error("backend", e.to_string())),
    }

    if config.descriptor.exists() {
        match stackup::scan_port_mapping(&config.descriptor, config.port) {
            Ok(MappingState::RewritableDefault(count)) => checks.push(Check::pass(
                "descriptor",
                format!("{count} default mapping(s) ready to rewrite"),
            )),
            Ok(MappingState::AlreadyCurrent) => checks.push(Check::pass(
                "descriptor",
                format!("already maps port {}", config.port),
            )),
            Ok(MappingState::Missing) => checks.push(Check::error(
                "descriptor",
                "no rewritable port mapping found",
            )),
            Err(e) => checks.push(Check::error("descriptor", e.to_string())),
        }
    } else {
        checks.push(Check::error(
            "descriptor",
            format!("{} not found", config.descriptor.display()),
        ));
    }

    if config.secrets.exists() {
        checks.push(Check::pass("secrets", "secrets file present"));
    } else if config.secrets_template.exists() {
        checks.push(Check::warning(
            "secrets",
            "secrets file absent - will be created from template on run",
        ));
    } else {
        checks.push(Check::error(
            "secrets",
            format!(
                "neither {} nor {} exists",
                config.secrets.display(),
                config.secrets_template.display()
            ),
        ));
    }

    let passes = checks.iter().filter(|c| c.status == CheckStatus::Pass).count();
    let warnings = checks
        .iter()
        .filter(|c| c.status == CheckStatus::Warning)
        .count();
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();

    if json {
        let output = json!({
            "event": "check",
            "passes": passes,
            "warnings": warnings,
            "errors": errors,
            "success": errors == 0,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("🩺 Stackup Check");
        println!();
        for check in &checks {
            let icon = match check.status {
                CheckStatus::Pass => "✓",
                CheckStatus::Warning => "⚠",
                CheckStatus::Error => "✗",
            };
            println!("  {} {} - {}", icon, check.name, check.message);
        }
        println!();
        println!("Summary: {passes} passed, {warnings} warnings, {errors} errors");
    }

    if errors > 0 {
        if !json {
            println!();
            println!("🔴 Check found issues. Fix the errors before running deploy.");
        }
        std::process::exit(1);
    }

    Ok(())
}
