//! Kickoff HTTP Client
//!
//! A small, type-safe client for triggering builds on a Jenkins-style CI
//! server and following them to a terminal state.
//!
//! # Example
//!
//! ```no_run
//! use kickoff_client::{CiClient, ClientOptions, Credentials, Deadline, JobPoller};
//! use kickoff_core::domain::parameters::JobParameters;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let options = ClientOptions {
//!         credentials: Credentials::basic("ci-bot", "api-token"),
//!         ..Default::default()
//!     };
//!     let client = Arc::new(CiClient::from_options("https://ci.example.com", &options)?);
//!
//!     let deadline = Deadline::arm(Duration::from_secs(600));
//!     let handle = client.trigger("deploy", &JobParameters::new()).await?;
//!
//!     let outcome = JobPoller::new(client)
//!         .wait("deploy", &handle, &deadline.token())
//!         .await?;
//!     deadline.disarm();
//!
//!     println!("{}", outcome);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod deadline;
pub mod error;
mod jobs;
pub mod poller;

// Re-export commonly used types
pub use api::CiApi;
pub use auth::Credentials;
pub use deadline::Deadline;
pub use error::{ClientError, JobError, Result};
pub use poller::{DEFAULT_POLL_INTERVAL, JobPoller};

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::warn;

/// Connection settings for [`CiClient::from_options`]
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Source of the default Authorization header
    pub credentials: Credentials,
    /// Caller headers merged over the defaults (caller wins per key)
    pub headers: Vec<(String, String)>,
    /// Skip TLS certificate validation. Off unless explicitly requested.
    pub accept_invalid_certs: bool,
}

/// HTTP client for the CI server API
///
/// Covers the two halves of a triggered run:
/// - Submitting a build (with or without parameters)
/// - Reading queue item and build status while waiting
#[derive(Debug, Clone)]
pub struct CiClient {
    /// Base URL of the CI server (e.g., "https://ci.example.com")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl CiClient {
    /// Create a new client with no credentials and default TLS settings
    ///
    /// # Example
    /// ```
    /// use kickoff_client::CiClient;
    ///
    /// let client = CiClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a client carrying credentials and caller headers on every request
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the CI server
    /// * `options` - Credentials, extra headers and TLS settings
    pub fn from_options(base_url: impl Into<String>, options: &ClientOptions) -> Result<Self> {
        let headers = auth::build_headers(&options.credentials, &options.headers)?;

        if options.accept_invalid_certs {
            warn!("TLS certificate validation is disabled for CI server requests");
        }

        let client = Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()?;

        Ok(Self::with_client(base_url, client))
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use kickoff_client::CiClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = CiClient::with_client("http://localhost:8080", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the CI server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // URL Helpers
    // =============================================================================

    /// URL of a job endpoint, e.g. `job_url("team/app", &["lastBuild", "api", "json"])`
    ///
    /// Folder jobs are addressed by `/`-separated names; each folder becomes its
    /// own `job/<name>` pair. Segments are percent-encoded.
    fn job_url(&self, job_name: &str, tail: &[&str]) -> Result<Url> {
        let segments: Vec<&str> = job_name.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return Err(ClientError::InvalidRequest(
                "job name cannot be empty".to_string(),
            ));
        }

        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ClientError::InvalidRequest(format!("invalid base URL '{}': {}", self.base_url, e))
        })?;

        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ClientError::InvalidRequest(format!(
                    "base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?;
            path.pop_if_empty();
            for segment in segments {
                path.push("job").push(segment);
            }
            path.extend(tail);
        }

        Ok(url)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

/// Appends `api/json` to a queue item or build URL
///
/// The server hands out these URLs with a trailing slash, but callers may not.
fn api_json_url(url: &str) -> String {
    if url.ends_with('/') {
        format!("{}api/json", url)
    } else {
        format!("{}/api/json", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = CiClient::new("http://localhost:8080");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = CiClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_from_options() {
        let options = ClientOptions {
            credentials: Credentials::basic("alice", "token"),
            headers: vec![("X-Team".to_string(), "platform".to_string())],
            accept_invalid_certs: false,
        };
        let client = CiClient::from_options("https://ci.example.com/", &options).unwrap();
        assert_eq!(client.base_url(), "https://ci.example.com");
    }

    #[test]
    fn test_job_url_simple() {
        let client = CiClient::new("https://ci.example.com");
        let url = client.job_url("deploy", &["build"]).unwrap();
        assert_eq!(url.as_str(), "https://ci.example.com/job/deploy/build");
    }

    #[test]
    fn test_job_url_under_context_path() {
        let client = CiClient::new("https://ci.example.com/jenkins/");
        let url = client
            .job_url("deploy", &["lastBuild", "api", "json"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://ci.example.com/jenkins/job/deploy/lastBuild/api/json"
        );
    }

    #[test]
    fn test_job_url_folders_and_encoding() {
        let client = CiClient::new("https://ci.example.com");
        let url = client
            .job_url("team/my app", &["buildWithParameters"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://ci.example.com/job/team/job/my%20app/buildWithParameters"
        );
    }

    #[test]
    fn test_job_url_rejects_empty_name() {
        let client = CiClient::new("https://ci.example.com");
        assert!(matches!(
            client.job_url("", &["build"]),
            Err(ClientError::InvalidRequest(_))
        ));
        assert!(client.job_url("//", &["build"]).is_err());
    }

    #[test]
    fn test_api_json_url() {
        assert_eq!(
            api_json_url("http://ci/queue/item/7/"),
            "http://ci/queue/item/7/api/json"
        );
        assert_eq!(
            api_json_url("http://ci/job/app/3"),
            "http://ci/job/app/3/api/json"
        );
    }
}
