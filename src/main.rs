//! Stackup CLI - bring-up sequencer for containerized service stacks
//!
//! Usage: stackup <COMMAND>
//!
//! Commands:
//!   run     Bring up the stack (secrets, descriptor, build, start, readiness)
//!   check   Validate deployment preconditions without side effects
//!   status  Show service status as reported by the backend

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            port,
            domain,
            yes,
            dir,
        } => commands::cmd_run(&dir, port, domain, yes, cli.json, cli.verbose),
        Commands::Check { dir } => commands::cmd_check(&dir, cli.json),
        Commands::Status { dir } => commands::cmd_status(&dir, cli.json),
    }
}
