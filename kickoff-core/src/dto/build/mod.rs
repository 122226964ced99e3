//! Build status DTOs
//!
//! Mirrors `GET {build}/api/json` and `GET {job}/lastBuild/api/json`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result reported by the server once a build has finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildResult {
    Success,
    Failure,
    Aborted,
    Unstable,
    NotBuilt,
    #[serde(other)]
    Unknown,
}

impl BuildResult {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildResult::Success)
    }
}

impl std::fmt::Display for BuildResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BuildResult::Success => "SUCCESS",
            BuildResult::Failure => "FAILURE",
            BuildResult::Aborted => "ABORTED",
            BuildResult::Unstable => "UNSTABLE",
            BuildResult::NotBuilt => "NOT_BUILT",
            BuildResult::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Status of a single build
///
/// `result` is `null` while the build is still running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStatus {
    #[serde(default)]
    pub full_display_name: String,
    #[serde(default)]
    pub result: Option<BuildResult>,
    /// Elapsed time in milliseconds
    #[serde(default)]
    pub duration: i64,
    /// Server's estimate in milliseconds, `-1` when unknown
    #[serde(default)]
    pub estimated_duration: i64,
    /// Start time in epoch milliseconds
    #[serde(default)]
    pub timestamp: i64,
}

impl BuildStatus {
    pub fn is_running(&self) -> bool {
        self.result.is_none()
    }

    /// True when this build started before `instant`, i.e. it cannot be the
    /// build produced by a trigger submitted at `instant`.
    pub fn started_before(&self, instant: DateTime<Utc>) -> bool {
        self.timestamp < instant.timestamp_millis()
    }
}
