use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Stackup - bring-up sequencer for containerized service stacks
#[derive(Parser, Debug)]
#[command(name = "stackup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bring up the stack: secrets, descriptor, build, start, readiness
    Run {
        /// Host port the stack is exposed on [default: 88888]
        port: Option<u32>,

        /// Public domain printed in the access report [default: stack.example.com]
        domain: Option<String>,

        /// Skip the secrets confirmation pause
        #[arg(short, long)]
        yes: bool,

        /// Project directory containing the descriptor
        #[arg(short = 'C', long, default_value = ".")]
        dir: PathBuf,
    },

    /// Validate deployment preconditions without side effects
    Check {
        /// Project directory containing the descriptor
        #[arg(short = 'C', long, default_value = ".")]
        dir: PathBuf,
    },

    /// Show service status as reported by the backend
    Status {
        /// Project directory containing the descriptor
        #[arg(short = 'C', long, default_value = ".")]
        dir: PathBuf,
    },
}
