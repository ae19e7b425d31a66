//! `stackup status` - one-shot backend status query

use std::path::Path;

use anyhow::Result;
use serde_json::json;

use stackup::{config, readiness, ComposeBackend, DeploymentConfig, DockerCompose, ReadinessResult};

pub fn cmd_status(dir: &Path, json: bool) -> Result<()> {
    let (file, warnings) = config::load_project(dir)?;
    super::run::print_config_warnings(&warnings, json);

    let config = DeploymentConfig::resolve(dir, &file, None, None);
    let backend = DockerCompose::detect(dir, &config.descriptor, config.backend_command.as_deref());

    backend.ensure_available()?;
    let services = backend.ps()?;
    let readiness = readiness::classify(&services);

    if json {
        let output = json!({
            "event": "status",
            "ready": readiness == ReadinessResult::Ready,
            "services": services
                .iter()
                .map(|s| json!({"name": s.name, "up": s.is_up()}))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("📊 Stackup Status");
        println!();
        if services.is_empty() {
            println!("  (no managed services)");
        }
        for service in &services {
            let icon = if service.is_up() { "✓" } else { "✗" };
            println!("  {} {}", icon, service.state);
        }
        println!();
        match readiness {
            ReadinessResult::Ready => println!("🟢 Stack is up."),
            _ => println!("🔴 No service is up."),
        }
    }

    if readiness != ReadinessResult::Ready {
        std::process::exit(1);
    }

    Ok(())
}
