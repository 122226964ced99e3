//! Job-related API endpoints

use chrono::Utc;
use kickoff_core::domain::handle::JobHandle;
use kickoff_core::domain::parameters::JobParameters;
use kickoff_core::dto::build::BuildStatus;
use kickoff_core::dto::queue::QueueStatus;
use reqwest::Url;
use reqwest::header::LOCATION;
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};
use crate::{CiClient, api_json_url};

impl CiClient {
    // =============================================================================
    // Trigger
    // =============================================================================

    /// Submit a build of a job
    ///
    /// Posts to `buildWithParameters` when parameters are given, otherwise to
    /// `build`. Each call starts a new build; nothing is retried.
    ///
    /// # Arguments
    /// * `job_name` - The job name, `/`-separated for jobs inside folders
    /// * `parameters` - Form parameters, possibly empty
    ///
    /// # Returns
    /// A queue handle when the server exposes the queue item through a
    /// `Location` header, otherwise a latest-build handle stamped with the
    /// submission time.
    pub async fn trigger(&self, job_name: &str, parameters: &JobParameters) -> Result<JobHandle> {
        let endpoint = if parameters.is_empty() {
            "build"
        } else {
            "buildWithParameters"
        };
        let url = self.job_url(job_name, &[endpoint])?;

        // Captured before sending so the new build cannot start earlier.
        let triggered_at = Utc::now();

        debug!("POST {} ({} parameter(s))", url, parameters.len());
        let mut request = self.client.post(url);
        if !parameters.is_empty() {
            request = request.form(parameters);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let location = match response.headers().get(LOCATION) {
            Some(value) => Some(value.to_str().map_err(|_| {
                ClientError::ParseError("Location header is not valid UTF-8".to_string())
            })?),
            None => None,
        };

        match location {
            Some(location) => {
                // Relative locations are relative to the server root, context path included.
                let queue_url = Url::parse(&format!("{}/", self.base_url))
                    .and_then(|base| base.join(location))
                    .map_err(|e| {
                        ClientError::ParseError(format!(
                            "invalid Location header '{}': {}",
                            location, e
                        ))
                    })?;
                info!("Job '{}' was queued. QueueUrl={}", job_name, queue_url);
                Ok(JobHandle::queue(queue_url.to_string()))
            }
            None => {
                warn!(
                    "Server returned no queue location for '{}'; following its latest build instead. \
                     Concurrent triggers of the same job may be misattributed.",
                    job_name
                );
                Ok(JobHandle::latest_build(triggered_at))
            }
        }
    }

    // =============================================================================
    // Status
    // =============================================================================

    /// Get the status of a queue item
    ///
    /// # Arguments
    /// * `queue_url` - The queue item URL returned by [`CiClient::trigger`]
    pub async fn queue_status(&self, queue_url: &str) -> Result<QueueStatus> {
        let url = api_json_url(queue_url);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Get the status of a specific build
    ///
    /// # Arguments
    /// * `build_url` - The build URL a queue item was bound to
    pub async fn build_status(&self, build_url: &str) -> Result<BuildStatus> {
        let url = api_json_url(build_url);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Get the status of the most recent build of a job
    ///
    /// # Arguments
    /// * `job_name` - The job name, `/`-separated for jobs inside folders
    pub async fn last_build_status(&self, job_name: &str) -> Result<BuildStatus> {
        let url = self.job_url(job_name, &["lastBuild", "api", "json"])?;
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        self.handle_response(response).await
    }
}
