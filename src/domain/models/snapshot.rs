//! Serialized queue state for host reloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One queued entry as captured at save time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Technology name; re-resolved against the current set on restore
    pub technology: String,
    /// Level the entry was queued at
    pub level: u32,
}

/// Point-in-time capture of a force's queue.
///
/// Technology references are by name only. The host's technology set
/// may change between save and restore; the revalidator drops entries
/// that no longer resolve instead of erroring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct QueueSnapshot {
    /// When the capture was taken
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub requeue_multilevel: bool,
    #[serde(default)]
    pub entries: Vec<SnapshotEntry>,
}

impl QueueSnapshot {
    /// Serialize for host-side persistence.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a snapshot previously produced by [`Self::to_json`].
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let snapshot = QueueSnapshot {
            saved_at: Utc::now(),
            paused: true,
            requeue_multilevel: false,
            entries: vec![SnapshotEntry {
                technology: "rocketry".to_string(),
                level: 1,
            }],
        };
        let json = snapshot.to_json().unwrap();
        let parsed = QueueSnapshot::from_json(&json).unwrap();
        assert_eq!(parsed.entries, snapshot.entries);
        assert!(parsed.paused);
    }

    #[test]
    fn test_missing_fields_default() {
        let parsed =
            QueueSnapshot::from_json("{\"saved_at\":\"2024-01-01T00:00:00Z\"}").unwrap();
        assert!(!parsed.paused);
        assert!(parsed.entries.is_empty());
    }
}
