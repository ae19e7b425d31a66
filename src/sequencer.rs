//! Deployment sequencer
//!
//! The linear bring-up sequence: precondition gates first, then ordered
//! side effects, then the bounded readiness wait. Failure at any gate or
//! side effect aborts the run - this is a best-effort bring-up tool, not a
//! transactional deployer, so nothing is rolled back.

use std::path::PathBuf;

use crate::backend::ComposeBackend;
use crate::config::DeploymentConfig;
use crate::confirm::ConfirmationSource;
use crate::descriptor::{self, RewriteOutcome};
use crate::error::{DeployError, DeployResult};
use crate::readiness::{self, PollPlan, ReadinessResult};
use crate::secrets::{self, SecretsOutcome};

/// Progress notification emitted after each completed step.
///
/// Purely informational: observers render these, they never steer the
/// sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceEvent {
    BackendDetected { command: String },
    ConfigResolved { port: u32, domain: String },
    SecretsCreated { path: PathBuf },
    SecretsPresent,
    DescriptorRewritten { replaced: usize, backup: PathBuf },
    DescriptorCurrent,
    Building,
    Starting,
    Settling { secs: u64 },
    Poll { attempt: u32, max_attempts: u32, ready: bool },
}

/// What the completed sequence did, for the final report
#[derive(Debug)]
pub struct SequenceReport {
    pub secrets: SecretsOutcome,
    pub rewrite: RewriteOutcome,
    pub readiness: ReadinessResult,
}

/// The deployment sequencer. Holds no state of its own beyond borrowed
/// collaborators; the service stack belongs to the backend.
pub struct Sequencer<'a> {
    config: &'a DeploymentConfig,
    backend: &'a dyn ComposeBackend,
    confirm: &'a dyn ConfirmationSource,
}

impl<'a> Sequencer<'a> {
    pub fn new(
        config: &'a DeploymentConfig,
        backend: &'a dyn ComposeBackend,
        confirm: &'a dyn ConfirmationSource,
    ) -> Self {
        Self {
            config,
            backend,
            confirm,
        }
    }

    /// Execute the full bring-up sequence.
    pub fn run(&self, mut observer: impl FnMut(SequenceEvent)) -> DeployResult<SequenceReport> {
        // Gate: the backend CLI must exist before any side effect
        self.backend.ensure_available()?;
        observer(SequenceEvent::BackendDetected {
            command: self.backend.describe(),
        });
        observer(SequenceEvent::ConfigResolved {
            port: self.config.port,
            domain: self.config.domain.clone(),
        });

        // One-time secrets materialization, with the single blocking pause
        let secrets = secrets::materialize(&self.config.secrets, &self.config.secrets_template)?;
        match secrets {
            SecretsOutcome::Created => {
                observer(SequenceEvent::SecretsCreated {
                    path: self.config.secrets.clone(),
                });
                let prompt = format!(
                    "Secrets file created at {} - fill in the required values, then continue",
                    self.config.secrets.display()
                );
                if !self.confirm.confirm(&prompt)? {
                    return Err(DeployError::Aborted);
                }
            }
            SecretsOutcome::AlreadyPresent => observer(SequenceEvent::SecretsPresent),
        }

        let rewrite = descriptor::rewrite_port_mapping(&self.config.descriptor, self.config.port)?;
        match &rewrite {
            RewriteOutcome::Rewritten { replaced, backup } => {
                observer(SequenceEvent::DescriptorRewritten {
                    replaced: *replaced,
                    backup: backup.clone(),
                });
            }
            RewriteOutcome::AlreadyCurrent => observer(SequenceEvent::DescriptorCurrent),
        }

        observer(SequenceEvent::Building);
        self.backend.build()?;

        observer(SequenceEvent::Starting);
        self.backend.up(true)?;

        let plan = PollPlan::from_config(self.config);
        if !plan.settle.is_zero() {
            observer(SequenceEvent::Settling {
                secs: plan.settle.as_secs(),
            });
        }
        let max_attempts = plan.max_attempts;
        let readiness = readiness::wait_until_ready(self.backend, &plan, |attempt, result| {
            observer(SequenceEvent::Poll {
                attempt,
                max_attempts,
                ready: result == ReadinessResult::Ready,
            });
        });

        Ok(SequenceReport {
            secrets,
            rewrite,
            readiness,
        })
    }
}
