//! Stackup - bring-up sequencer for containerized service stacks
//!
//! Stackup validates deployment preconditions, resolves configuration,
//! materializes the secrets file, rewrites the port mapping in the
//! orchestration descriptor, then drives the orchestration backend through
//! build and start and waits for the stack to report ready within a
//! bounded window.

pub mod backend;
pub mod config;
pub mod confirm;
pub mod descriptor;
pub mod error;
pub mod readiness;
pub mod report;
pub mod secrets;
pub mod sequencer;

// Re-exports for convenience
pub use backend::{parse_ps_output, ComposeBackend, DockerCompose, ServiceStatus};
pub use config::{load_project, ConfigFile, ConfigWarning, DeploymentConfig};
pub use confirm::{ConfirmationSource, InteractiveConfirmation, PreConfirmed};
pub use descriptor::{rewrite_port_mapping, scan_port_mapping, MappingState, RewriteOutcome};
pub use error::{DeployError, DeployResult};
pub use readiness::{PollPlan, ReadinessResult};
pub use secrets::SecretsOutcome;
pub use sequencer::{SequenceEvent, SequenceReport, Sequencer};
