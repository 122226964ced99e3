//! CI server API seam
//!
//! The poll loop only needs four calls. Abstracting them behind a trait lets
//! the state machine be driven by a scripted server in tests.

use async_trait::async_trait;
use kickoff_core::domain::handle::JobHandle;
use kickoff_core::domain::parameters::JobParameters;
use kickoff_core::dto::build::BuildStatus;
use kickoff_core::dto::queue::QueueStatus;

use crate::CiClient;
use crate::error::Result;

/// Operations against a Jenkins-style CI server
#[async_trait]
pub trait CiApi: Send + Sync {
    /// Submits one build of `job_name` and returns the handle to follow it by
    async fn trigger(&self, job_name: &str, parameters: &JobParameters) -> Result<JobHandle>;

    /// Reads a queue item
    async fn queue_status(&self, queue_url: &str) -> Result<QueueStatus>;

    /// Reads a build the queue item was bound to
    async fn build_status(&self, build_url: &str) -> Result<BuildStatus>;

    /// Reads the most recent build of a job
    async fn last_build_status(&self, job_name: &str) -> Result<BuildStatus>;
}

#[async_trait]
impl CiApi for CiClient {
    async fn trigger(&self, job_name: &str, parameters: &JobParameters) -> Result<JobHandle> {
        CiClient::trigger(self, job_name, parameters).await
    }

    async fn queue_status(&self, queue_url: &str) -> Result<QueueStatus> {
        CiClient::queue_status(self, queue_url).await
    }

    async fn build_status(&self, build_url: &str) -> Result<BuildStatus> {
        CiClient::build_status(self, build_url).await
    }

    async fn last_build_status(&self, job_name: &str) -> Result<BuildStatus> {
        CiClient::last_build_status(self, job_name).await
    }
}
