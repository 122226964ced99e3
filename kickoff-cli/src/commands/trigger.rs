//! Trigger command handler
//!
//! Arms the deadline, submits the build, and (with `--wait`) follows it to a
//! terminal state. Every failure surfaces as an error so the process exits
//! non-zero.

use std::sync::Arc;

use anyhow::Result;
use clap::{ArgAction, Args};
use colored::*;
use kickoff_client::{CiApi, DEFAULT_POLL_INTERVAL, Deadline, JobError, JobPoller};
use kickoff_core::domain::handle::JobHandle;
use kickoff_core::domain::outcome::JobOutcome;
use tracing::info;

use crate::config::{Config, TriggerConfig};

/// Arguments of `kickoff trigger`
#[derive(Args)]
pub struct TriggerArgs {
    /// Job name; use "folder/job" for jobs inside folders
    #[arg(env = "KICKOFF_JOB")]
    pub job: String,

    /// Build parameters as a JSON object, e.g. '{"BRANCH":"main"}'
    #[arg(long, env = "KICKOFF_PARAMETERS")]
    pub parameters: Option<String>,

    /// Wait for the build to finish; `--wait=false` turns it off explicitly
    #[arg(
        long,
        env = "KICKOFF_WAIT",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true"
    )]
    pub wait: bool,

    /// Seconds before giving up on the whole operation
    #[arg(long, env = "KICKOFF_TIMEOUT", default_value_t = 600)]
    pub timeout: u64,

    /// Seconds between status requests
    #[arg(long, env = "KICKOFF_POLL_INTERVAL", default_value_t = DEFAULT_POLL_INTERVAL.as_secs())]
    pub poll_interval: u64,
}

/// Handle the trigger command
///
/// # Arguments
/// * `args` - Parsed command arguments
/// * `config` - The CLI configuration
pub async fn handle_trigger_command(args: TriggerArgs, config: &Config) -> Result<()> {
    let trigger = TriggerConfig::new(
        args.job,
        args.parameters.as_deref(),
        args.wait,
        args.timeout,
        args.poll_interval,
    )?;
    trigger.validate()?;

    if !trigger.parameters.is_empty() {
        info!("Parameters: {:?}", trigger.parameters);
    }

    let client: Arc<dyn CiApi> = Arc::new(config.client()?);

    if let Some(outcome) = run_trigger(client, &trigger).await? {
        print_outcome(&trigger.job_name, &outcome);
    }

    Ok(())
}

/// Triggers the job and, if requested, waits for it
///
/// The deadline is armed before the trigger request so the timeout bounds the
/// whole operation. It is disarmed on every return path when `deadline` is
/// dropped.
///
/// # Returns
/// `None` when not waiting, the successful outcome otherwise. Non-success
/// outcomes are returned as the matching `JobError`.
pub async fn run_trigger(
    api: Arc<dyn CiApi>,
    trigger: &TriggerConfig,
) -> Result<Option<JobOutcome>, JobError> {
    let job = trigger.job_name.as_str();
    let deadline = Deadline::arm(trigger.timeout);
    let token = deadline.token();

    let handle = tokio::select! {
        biased;
        _ = token.cancelled() => {
            return Err(JobError::TimedOut {
                job: job.to_string(),
                timeout: trigger.timeout,
            });
        }
        handle = api.trigger(job, &trigger.parameters) => {
            handle.map_err(|source| JobError::Trigger {
                job: job.to_string(),
                source,
            })?
        }
    };

    print_triggered(job, &handle);

    if !trigger.wait {
        return Ok(None);
    }

    let poller = JobPoller::new(api).with_poll_interval(trigger.poll_interval);
    let outcome = poller.wait(job, &handle, &token).await?;
    deadline.disarm();

    match JobError::from_outcome(job, &outcome, trigger.timeout) {
        Some(err) => Err(err),
        None => Ok(Some(outcome)),
    }
}

fn print_triggered(job: &str, handle: &JobHandle) {
    println!(
        "{} Job '{}' triggered ({})",
        "▸".cyan(),
        job.bold(),
        handle.to_string().dimmed()
    );
}

fn print_outcome(job: &str, outcome: &JobOutcome) {
    println!("{} Job '{}': {}", "✓".green(), job.bold(), outcome);
}
