//! Job poller
//!
//! Follows one triggered job from the queue to a terminal build result.
//!
//! Queue-backed handles start in `Queued` and move to `Executing` as soon as
//! the queue item is bound to a build. Latest-build handles start directly in
//! `Executing` and ignore any build that started before the trigger. The
//! whole loop races the deadline token; whichever finishes first decides the
//! outcome.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kickoff_core::domain::handle::JobHandle;
use kickoff_core::domain::outcome::JobOutcome;
use kickoff_core::dto::build::BuildStatus;
use tokio::time::{self, Duration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::CiApi;
use crate::error::{ClientError, JobError};

/// Pause between two status requests
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Where the next status request goes
#[derive(Debug, Clone, PartialEq, Eq)]
enum PollState {
    Queued { queue_url: String },
    Executing { build_url: String },
    /// Waiting on `lastBuild`; builds older than `triggered_at` are not ours
    ExecutingLatest { triggered_at: DateTime<Utc> },
}

impl PollState {
    fn initial(handle: &JobHandle) -> Self {
        match handle {
            JobHandle::QueueLocation { url } => PollState::Queued {
                queue_url: url.clone(),
            },
            JobHandle::LatestBuild { triggered_at } => PollState::ExecutingLatest {
                triggered_at: *triggered_at,
            },
        }
    }
}

/// Result of a single poll
enum Step {
    Sleep,
    Advance(PollState),
    Done(JobOutcome),
}

/// Poller that waits for a triggered job to finish
pub struct JobPoller {
    api: Arc<dyn CiApi>,
    poll_interval: Duration,
}

impl JobPoller {
    /// Creates a poller with the default interval
    pub fn new(api: Arc<dyn CiApi>) -> Self {
        Self {
            api,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Polls until the job reaches a terminal state or `deadline` is cancelled
    ///
    /// # Arguments
    /// * `job_name` - The job name, used for `lastBuild` lookups and messages
    /// * `handle` - The handle returned by the trigger
    /// * `deadline` - Cancelled by the deadline timer; yields `TimedOut`
    ///
    /// # Returns
    /// The terminal outcome, or `JobError::PollTransport` if any status
    /// request fails. Transport errors are not retried.
    pub async fn wait(
        &self,
        job_name: &str,
        handle: &JobHandle,
        deadline: &CancellationToken,
    ) -> Result<JobOutcome, JobError> {
        info!("Waiting for '{}' ...", job_name);

        let result = tokio::select! {
            biased;
            _ = deadline.cancelled() => {
                warn!("Stopped waiting for '{}': deadline reached", job_name);
                Ok(JobOutcome::TimedOut)
            }
            result = self.run(job_name, handle) => result,
        };

        result.map_err(|source| JobError::PollTransport {
            job: job_name.to_string(),
            source,
        })
    }

    /// Drives the state machine to a terminal outcome
    async fn run(&self, job_name: &str, handle: &JobHandle) -> Result<JobOutcome, ClientError> {
        let mut state = PollState::initial(handle);

        loop {
            let step = match &state {
                PollState::Queued { queue_url } => self.poll_queue(job_name, queue_url).await?,
                PollState::Executing { build_url } => {
                    let build = self.api.build_status(build_url).await?;
                    self.inspect_build(build)
                }
                PollState::ExecutingLatest { triggered_at } => {
                    match self.api.last_build_status(job_name).await {
                        Ok(build) if build.started_before(*triggered_at) => {
                            info!(
                                "Job '{}' has not started yet. Sleeping for {}s...",
                                job_name,
                                self.poll_interval.as_secs()
                            );
                            Step::Sleep
                        }
                        Ok(build) => self.inspect_build(build),
                        // A job without any build answers 404 until ours is created.
                        Err(err) if err.is_not_found() => {
                            info!(
                                "Job '{}' has no builds yet. Sleeping for {}s...",
                                job_name,
                                self.poll_interval.as_secs()
                            );
                            Step::Sleep
                        }
                        Err(err) => return Err(err),
                    }
                }
            };

            match step {
                Step::Done(outcome) => return Ok(outcome),
                Step::Advance(next) => {
                    debug!("{:?} -> {:?}", state, next);
                    state = next;
                }
                Step::Sleep => time::sleep(self.poll_interval).await,
            }
        }
    }

    async fn poll_queue(&self, job_name: &str, queue_url: &str) -> Result<Step, ClientError> {
        let queue = self.api.queue_status(queue_url).await?;

        if queue.cancelled {
            let reason = match queue.why.as_deref() {
                Some(why) => format!("queue item {} was cancelled ({})", queue_url, why),
                None => format!("queue item {} was cancelled", queue_url),
            };
            return Ok(Step::Done(JobOutcome::Cancelled { reason }));
        }

        if let Some(build_url) = queue.build_url() {
            info!(
                "Job '{}' started executing. BuildUrl={}",
                job_name, build_url
            );
            return Ok(Step::Advance(PollState::Executing {
                build_url: build_url.to_string(),
            }));
        }

        info!(
            "Job '{}' is queued (Reason: '{}'). Sleeping for {}s...",
            job_name,
            queue.why.as_deref().unwrap_or("unknown"),
            self.poll_interval.as_secs()
        );
        Ok(Step::Sleep)
    }

    fn inspect_build(&self, build: BuildStatus) -> Step {
        match build.result {
            Some(result) if result.is_success() => {
                info!("Job '{}' completed successfully!", build.full_display_name);
                Step::Done(JobOutcome::Succeeded {
                    display_name: build.full_display_name,
                })
            }
            Some(result) => {
                info!(
                    "Job '{}' finished with result {}",
                    build.full_display_name, result
                );
                Step::Done(JobOutcome::Failed {
                    display_name: build.full_display_name,
                    result,
                })
            }
            None => {
                info!(
                    "Job '{}' is executing (Duration: {}ms, Expected: {}ms). Sleeping for {}s...",
                    build.full_display_name,
                    build.duration,
                    build.estimated_duration,
                    self.poll_interval.as_secs()
                );
                Step::Sleep
            }
        }
    }
}
