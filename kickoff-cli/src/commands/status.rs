//! Status command handler
//!
//! Shows the most recent build of a job without triggering anything.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use colored::*;
use kickoff_core::dto::build::{BuildResult, BuildStatus};

use crate::config::Config;

/// Arguments of `kickoff status`
#[derive(Args)]
pub struct StatusArgs {
    /// Job name; use "folder/job" for jobs inside folders
    #[arg(env = "KICKOFF_JOB")]
    job: String,

    /// Print the raw status as JSON
    #[arg(long)]
    json: bool,
}

/// Handle the status command
///
/// # Arguments
/// * `args` - Parsed command arguments
/// * `config` - The CLI configuration
pub async fn handle_status_command(args: StatusArgs, config: &Config) -> Result<()> {
    let client = config.client()?;

    let build = client
        .last_build_status(&args.job)
        .await
        .with_context(|| format!("Failed to fetch latest build of '{}'", args.job))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&build)?);
    } else {
        print_build_details(&build);
    }

    Ok(())
}

/// Print detailed build information
fn print_build_details(build: &BuildStatus) {
    println!("{}", "Build Details:".bold());
    println!("  Name:      {}", build.full_display_name.cyan());
    println!("  Result:    {}", colorize_result(build.result));

    if let Some(started) = DateTime::<Utc>::from_timestamp_millis(build.timestamp) {
        println!("  Started:   {}", started.format("%Y-%m-%d %H:%M:%S"));
    }

    println!("  Duration:  {}s", build.duration / 1000);
    if build.estimated_duration >= 0 {
        println!("  Expected:  {}s", build.estimated_duration / 1000);
    }
}

/// Colorize a build result for display
fn colorize_result(result: Option<BuildResult>) -> ColoredString {
    match result {
        None => "RUNNING".cyan(),
        Some(BuildResult::Success) => "SUCCESS".green(),
        Some(BuildResult::Unstable) => "UNSTABLE".yellow(),
        Some(r @ (BuildResult::Aborted | BuildResult::NotBuilt)) => r.to_string().dimmed(),
        Some(other) => other.to_string().red(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_result_text() {
        colored::control::set_override(false);
        assert_eq!(colorize_result(None).to_string(), "RUNNING");
        assert_eq!(
            colorize_result(Some(BuildResult::Failure)).to_string(),
            "FAILURE"
        );
        assert_eq!(
            colorize_result(Some(BuildResult::NotBuilt)).to_string(),
            "NOT_BUILT"
        );
    }
}
