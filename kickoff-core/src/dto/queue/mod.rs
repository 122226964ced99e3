//! Queue item DTOs
//!
//! Mirrors `GET {queue item}/api/json`.

use serde::Deserialize;

/// Reference to the build a queue item was turned into
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Executable {
    pub url: String,
    #[serde(default)]
    pub number: Option<u64>,
}

/// Status of a queue item
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QueueStatus {
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub executable: Option<Executable>,
    /// Human-readable reason the item is still waiting
    #[serde(default)]
    pub why: Option<String>,
}

impl QueueStatus {
    /// URL of the build this item was bound to, if any
    pub fn build_url(&self) -> Option<&str> {
        self.executable
            .as_ref()
            .map(|e| e.url.as_str())
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waiting_item() {
        let json = r#"{"cancelled":false,"executable":null,"why":"Waiting for next available executor"}"#;
        let status: QueueStatus = serde_json::from_str(json).unwrap();
        assert!(!status.cancelled);
        assert_eq!(status.build_url(), None);
        assert_eq!(
            status.why.as_deref(),
            Some("Waiting for next available executor")
        );
    }

    #[test]
    fn test_bound_item() {
        let json = r#"{"executable":{"number":3,"url":"http://ci/job/app/3/"},"why":null}"#;
        let status: QueueStatus = serde_json::from_str(json).unwrap();
        assert!(!status.cancelled);
        assert_eq!(status.build_url(), Some("http://ci/job/app/3/"));
    }

    #[test]
    fn test_cancelled_item_without_other_fields() {
        let status: QueueStatus = serde_json::from_str(r#"{"cancelled":true}"#).unwrap();
        assert!(status.cancelled);
        assert!(status.executable.is_none());
    }
}
