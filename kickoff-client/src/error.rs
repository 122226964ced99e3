//! Error types for the Kickoff client

use std::time::Duration;

use kickoff_core::domain::outcome::JobOutcome;
use kickoff_core::dto::build::BuildResult;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while talking to the CI server
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Server returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}

/// Ways a trigger-and-wait operation can fail
///
/// Every variant is terminal; nothing is retried.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("failed to trigger job '{job}': {source}")]
    Trigger {
        job: String,
        #[source]
        source: ClientError,
    },

    #[error("failed to poll status of job '{job}': {source}")]
    PollTransport {
        job: String,
        #[source]
        source: ClientError,
    },

    #[error("job '{job}' was cancelled: {reason}")]
    Cancelled { job: String, reason: String },

    #[error("job '{job}' failed: '{display_name}' finished with result {result}")]
    Failed {
        job: String,
        display_name: String,
        result: BuildResult,
    },

    #[error("job '{job}' timed out after {}s", .timeout.as_secs())]
    TimedOut { job: String, timeout: Duration },
}

impl JobError {
    /// Maps a non-success outcome to the matching error
    ///
    /// Returns `None` for `Succeeded`.
    pub fn from_outcome(job: &str, outcome: &JobOutcome, timeout: Duration) -> Option<Self> {
        let job = job.to_string();
        match outcome {
            JobOutcome::Succeeded { .. } => None,
            JobOutcome::Failed {
                display_name,
                result,
            } => Some(Self::Failed {
                job,
                display_name: display_name.clone(),
                result: *result,
            }),
            JobOutcome::Cancelled { reason } => Some(Self::Cancelled {
                job,
                reason: reason.clone(),
            }),
            JobOutcome::TimedOut => Some(Self::TimedOut { job, timeout }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(ClientError::api_error(404, "nope").is_not_found());
        assert!(!ClientError::api_error(403, "denied").is_not_found());
        assert!(ClientError::api_error(502, "bad gateway").is_server_error());
        assert!(!ClientError::ParseError("x".into()).is_server_error());
    }

    #[test]
    fn test_failed_message_contains_display_name() {
        let err = JobError::Failed {
            job: "deploy".into(),
            display_name: "deploy #4".into(),
            result: BuildResult::Failure,
        };
        let message = err.to_string();
        assert!(message.contains("deploy #4"));
        assert!(message.contains("FAILURE"));
    }

    #[test]
    fn test_timed_out_message() {
        let err = JobError::TimedOut {
            job: "deploy".into(),
            timeout: Duration::from_secs(2),
        };
        assert_eq!(err.to_string(), "job 'deploy' timed out after 2s");
    }

    #[test]
    fn test_from_outcome() {
        let timeout = Duration::from_secs(60);
        let ok = JobOutcome::Succeeded {
            display_name: "deploy #3".into(),
        };
        assert!(JobError::from_outcome("deploy", &ok, timeout).is_none());

        let cancelled = JobOutcome::Cancelled {
            reason: "queue item cancelled".into(),
        };
        assert!(matches!(
            JobError::from_outcome("deploy", &cancelled, timeout),
            Some(JobError::Cancelled { .. })
        ));

        assert!(matches!(
            JobError::from_outcome("deploy", &JobOutcome::TimedOut, timeout),
            Some(JobError::TimedOut { timeout: t, .. }) if t == timeout
        ));
    }
}
