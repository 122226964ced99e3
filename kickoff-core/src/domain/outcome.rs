//! Terminal outcome of a triggered job

use crate::dto::build::BuildResult;

/// Terminal value of the poll loop
///
/// This is the only value handed back to the caller once waiting ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Succeeded {
        display_name: String,
    },
    Failed {
        display_name: String,
        result: BuildResult,
    },
    /// The server dropped the queue item before it ever executed
    Cancelled {
        reason: String,
    },
    /// The deadline fired first; the real result of the build is unknown
    TimedOut,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Succeeded { .. })
    }
}

impl std::fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobOutcome::Succeeded { display_name } => {
                write!(f, "'{}' completed successfully", display_name)
            }
            JobOutcome::Failed {
                display_name,
                result,
            } => write!(f, "'{}' finished with result {}", display_name, result),
            JobOutcome::Cancelled { reason } => write!(f, "cancelled: {}", reason),
            JobOutcome::TimedOut => f.write_str("timed out before reaching a terminal state"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_succeeded_is_success() {
        assert!(
            JobOutcome::Succeeded {
                display_name: "job #3".into()
            }
            .is_success()
        );
        assert!(
            !JobOutcome::Failed {
                display_name: "job #4".into(),
                result: BuildResult::Failure
            }
            .is_success()
        );
        assert!(!JobOutcome::TimedOut.is_success());
    }

    #[test]
    fn test_failed_message_names_build() {
        let outcome = JobOutcome::Failed {
            display_name: "job #4".into(),
            result: BuildResult::Failure,
        };
        assert_eq!(outcome.to_string(), "'job #4' finished with result FAILURE");
    }
}
