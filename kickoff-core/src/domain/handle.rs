//! Job handle domain types

use chrono::{DateTime, Utc};

/// Locator for one triggered unit of work
///
/// Issued once by the trigger call and only read afterwards. The variant tells
/// whether the server supports queue handles, and so which poll strategy
/// applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobHandle {
    /// Queue item URL returned by the server; not yet bound to a build number
    QueueLocation { url: String },
    /// No queue item was exposed, so the next build of the job is assumed to be
    /// ours. Builds started before `triggered_at` belong to someone else.
    LatestBuild { triggered_at: DateTime<Utc> },
}

impl JobHandle {
    pub fn queue(url: impl Into<String>) -> Self {
        JobHandle::QueueLocation { url: url.into() }
    }

    pub fn latest_build(triggered_at: DateTime<Utc>) -> Self {
        JobHandle::LatestBuild { triggered_at }
    }
}

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobHandle::QueueLocation { url } => write!(f, "queue item {}", url),
            JobHandle::LatestBuild { triggered_at } => write!(
                f,
                "latest build triggered at {}",
                triggered_at.format("%Y-%m-%d %H:%M:%S%.3f")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_display_queue_handle() {
        let handle = JobHandle::queue("http://ci/queue/item/7/");
        assert_eq!(handle.to_string(), "queue item http://ci/queue/item/7/");
    }

    #[test]
    fn test_display_latest_build_handle() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let handle = JobHandle::latest_build(ts);
        assert_eq!(
            handle.to_string(),
            "latest build triggered at 2023-11-14 22:13:20.123"
        );
    }
}
