//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod job;
mod scenario;

pub use job::JobCommands;
pub use scenario::ScenarioCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Indicator calculation jobs
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Scenarios and their job status
    Scenario {
        #[command(subcommand)]
        command: ScenarioCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Job { command } => job::handle_job_command(command, config).await,
        Commands::Scenario { command } => {
            scenario::handle_scenario_command(command, config).await
        }
    }
}
