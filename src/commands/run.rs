//! `stackup run` - the deployment sequence

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde_json::json;

use stackup::{
    config, report, ComposeBackend, ConfigWarning, ConfirmationSource, DeployError,
    DeploymentConfig, DockerCompose, InteractiveConfirmation, PollPlan, PreConfirmed,
    ReadinessResult, SequenceEvent, Sequencer,
};

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

pub fn cmd_run(
    dir: &Path,
    port: Option<u32>,
    domain: Option<String>,
    yes: bool,
    json: bool,
    verbose: u8,
) -> Result<()> {
    let (file, warnings) = config::load_project(dir)?;
    print_config_warnings(&warnings, json);

    let config = DeploymentConfig::resolve(dir, &file, port, domain);
    let backend = DockerCompose::detect(dir, &config.descriptor, config.backend_command.as_deref());

    if json {
        println!(
            "{}",
            json!({
                "event": "start",
                "command": "run",
                "port": config.port,
                "domain": config.domain,
            })
        );
    } else {
        println!("🚀 Stackup Deploy");
        println!("Directory: {}", dir.display());
        println!("Port: {}  Domain: {}", config.port, config.domain);
        println!();
    }

    let interactive = InteractiveConfirmation;
    let pre_confirmed = PreConfirmed;
    let confirm: &dyn ConfirmationSource = if yes { &pre_confirmed } else { &interactive };

    let summary = Sequencer::new(&config, &backend, confirm)
        .run(|event| print_event(&event, json, verbose))?;

    // URLs and hints are printed whatever the readiness outcome
    if json {
        println!(
            "{}",
            json!({
                "event": "report",
                "local_url": report::local_url(config.port),
                "domain_url": report::domain_url(&config.domain),
                "ready": summary.readiness == ReadinessResult::Ready,
            })
        );
    } else {
        println!();
        print!(
            "{}",
            report::render_access_report(&config, summary.readiness, &backend.describe())
        );
    }

    // Best-effort probe: services may still be initializing, so a failure
    // is only a warning
    match report::probe_health(config.port, PROBE_TIMEOUT) {
        Ok(code) => {
            if json {
                println!("{}", json!({"event": "health_probe", "status": code}));
            } else {
                println!("✓ Health probe: HTTP {code}");
            }
        }
        Err(message) => {
            if json {
                println!("{}", json!({"event": "health_probe", "error": message}));
            } else {
                println!("⚠ Health probe failed: {message} (services may still be starting)");
            }
        }
    }

    if summary.readiness != ReadinessResult::Ready {
        let plan = PollPlan::from_config(&config);
        return Err(DeployError::NotReady {
            waited_secs: plan.total_wait().as_secs(),
        }
        .into());
    }

    Ok(())
}

pub(crate) fn print_config_warnings(warnings: &[ConfigWarning], json: bool) {
    for warning in warnings {
        if json {
            println!(
                "{}",
                json!({
                    "event": "config_warning",
                    "key": warning.key,
                    "file": warning.file.display().to_string(),
                })
            );
        } else {
            eprintln!(
                "⚠ Unknown config key '{}' in {}",
                warning.key,
                warning.file.display()
            );
        }
    }
}

fn print_event(event: &SequenceEvent, json: bool, verbose: u8) {
    if json {
        print_event_json(event);
        return;
    }

    match event {
        SequenceEvent::BackendDetected { command } => {
            if verbose > 0 {
                println!("✓ Backend: {command}");
            }
        }
        SequenceEvent::ConfigResolved { .. } => {
            // already shown in the header
        }
        SequenceEvent::SecretsCreated { path } => {
            println!("🔑 Created {} from template", path.display());
        }
        SequenceEvent::SecretsPresent => {
            if verbose > 0 {
                println!("✓ Secrets file present");
            }
        }
        SequenceEvent::DescriptorRewritten { replaced, backup } => {
            println!(
                "📝 Rewrote {replaced} port mapping(s), backup: {}",
                backup.display()
            );
        }
        SequenceEvent::DescriptorCurrent => {
            if verbose > 0 {
                println!("✓ Descriptor already maps the resolved port");
            }
        }
        SequenceEvent::Building => println!("🔨 Building images..."),
        SequenceEvent::Starting => println!("▶ Starting stack..."),
        SequenceEvent::Settling { secs } => {
            println!("⏳ Waiting {secs}s for services to initialize...");
        }
        SequenceEvent::Poll {
            attempt,
            max_attempts,
            ready,
        } => {
            if verbose > 0 {
                let state = if *ready { "ready" } else { "not ready" };
                println!("  poll {attempt}/{max_attempts}: {state}");
            }
        }
    }
}

fn print_event_json(event: &SequenceEvent) {
    let value = match event {
        SequenceEvent::BackendDetected { command } => {
            json!({"event": "backend", "command": command})
        }
        SequenceEvent::ConfigResolved { port, domain } => {
            json!({"event": "config", "port": port, "domain": domain})
        }
        SequenceEvent::SecretsCreated { path } => {
            json!({"event": "secrets_created", "path": path.display().to_string()})
        }
        SequenceEvent::SecretsPresent => json!({"event": "secrets_present"}),
        SequenceEvent::DescriptorRewritten { replaced, backup } => {
            json!({
                "event": "descriptor_rewritten",
                "replaced": replaced,
                "backup": backup.display().to_string(),
            })
        }
        SequenceEvent::DescriptorCurrent => json!({"event": "descriptor_current"}),
        SequenceEvent::Building => json!({"event": "build"}),
        SequenceEvent::Starting => json!({"event": "start_stack"}),
        SequenceEvent::Settling { secs } => json!({"event": "settle", "secs": secs}),
        SequenceEvent::Poll {
            attempt,
            max_attempts,
            ready,
        } => {
            json!({
                "event": "poll",
                "attempt": attempt,
                "max_attempts": max_attempts,
                "ready": ready,
            })
        }
    };
    println!("{value}");
}
