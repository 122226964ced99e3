//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod status;
mod trigger;

pub use status::StatusArgs;
pub use trigger::TriggerArgs;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Trigger a build and optionally wait for its result
    Trigger(TriggerArgs),
    /// Show the latest build of a job
    Status(StatusArgs),
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
///
/// # Returns
/// Result indicating success or failure
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Trigger(args) => trigger::handle_trigger_command(args, config).await,
        Commands::Status(args) => status::handle_status_command(args, config).await,
    }
}
