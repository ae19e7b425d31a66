//! Confirmation source
//!
//! The secrets pause is the only blocking step in the sequence, so it sits
//! behind a trait: interactive runs prompt the operator, `--yes` and tests
//! inject a pre-confirmed source instead.

use is_terminal::IsTerminal;

use crate::error::{DeployError, DeployResult};

/// Trait for the one interactive suspension point in the sequence.
pub trait ConfirmationSource {
    /// Ask the operator to confirm. Returning `false` aborts the run.
    fn confirm(&self, prompt: &str) -> DeployResult<bool>;
}

/// Prompts the operator on the terminal and blocks until answered.
///
/// Refuses to block when stdin is not a terminal: a headless run cannot
/// answer a prompt, so it declines instead of hanging.
pub struct InteractiveConfirmation;

impl ConfirmationSource for InteractiveConfirmation {
    fn confirm(&self, prompt: &str) -> DeployResult<bool> {
        if !std::io::stdin().is_terminal() {
            eprintln!("stdin is not a terminal - rerun with --yes to skip the prompt");
            return Ok(false);
        }

        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| match e {
                dialoguer::Error::IO(io) => DeployError::Io(io),
            })
    }
}

/// Always confirms. Used by `--yes` and by tests.
pub struct PreConfirmed;

impl ConfirmationSource for PreConfirmed {
    fn confirm(&self, _prompt: &str) -> DeployResult<bool> {
        Ok(true)
    }
}
