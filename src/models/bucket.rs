//! Buckets, events and server info

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Event bucket metadata (`GET /0/buckets/{id}/info`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucket {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: Map<String, Value>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Buckets keyed by bucket id
pub type BucketMap = HashMap<String, Bucket>;

/// A single tracked event. Duration is in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Event {
    /// Best-effort label: `app`, then `title`, then `status`.
    pub fn label(&self) -> String {
        ["app", "title", "status"]
            .iter()
            .find_map(|key| self.data.get(*key).and_then(Value::as_str))
            .unwrap_or("-")
            .to_string()
    }
}

/// Optional filters for event listing
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub limit: Option<u64>,
    pub team_id: Option<i32>,
}

impl EventQuery {
    /// Query-string pairs for the options that are set.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(start) = self.start {
            pairs.push(("start", start.to_rfc3339()));
        }
        if let Some(end) = self.end {
            pairs.push(("end", end.to_rfc3339()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(team_id) = self.team_id {
            pairs.push(("team_id", team_id.to_string()));
        }
        pairs
    }
}

/// Server info (`GET /0/info`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub hostname: String,
    pub version: String,
    #[serde(default)]
    pub testing: bool,
    #[serde(default)]
    pub device_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_event_query_skips_unset_options() {
        let query = EventQuery {
            limit: Some(50),
            ..Default::default()
        };
        assert_eq!(query.to_pairs(), vec![("limit", "50".to_string())]);
    }

    #[test]
    fn test_event_query_formats_dates_rfc3339() {
        let query = EventQuery {
            start: Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()),
            team_id: Some(4),
            ..Default::default()
        };
        let pairs = query.to_pairs();
        assert_eq!(pairs[0], ("start", "2024-03-01T08:00:00+00:00".to_string()));
        assert_eq!(pairs[1], ("team_id", "4".to_string()));
    }

    #[test]
    fn test_event_deserialize_and_label() {
        let event: Event = serde_json::from_str(
            r#"{"id": 7, "timestamp": "2024-03-01T08:00:00Z", "duration": 12.5,
                "data": {"app": "firefox", "title": "Docs"}}"#,
        )
        .unwrap();
        assert_eq!(event.id, Some(7));
        assert_eq!(event.duration, 12.5);
        assert_eq!(event.label(), "firefox");
    }

    #[test]
    fn test_bucket_type_field() {
        let bucket: Bucket = serde_json::from_str(
            r#"{"id": "aw-watcher-window_host", "type": "currentwindow",
                "hostname": "host", "created": null, "last_updated": null}"#,
        )
        .unwrap();
        assert_eq!(bucket.kind, "currentwindow");
        assert!(bucket.data.is_empty());
    }
}
