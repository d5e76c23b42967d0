//! The event entity and its creation payload.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Client-supplied fields for a new event.
///
/// This is what `POST /events` decodes and what the validator inspects.
/// It carries no `id` or `created_at`; those only exist once the store
/// has accepted the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    /// Event title. Must be non-empty after trimming, at most 100 characters.
    pub title: String,

    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// When the event starts.
    pub start_time: DateTime<Utc>,

    /// When the event ends. Never before `start_time`.
    pub end_time: DateTime<Utc>,
}

impl NewEvent {
    /// Returns a copy in the form the store keeps it: surrounding whitespace
    /// removed from the title and times truncated to microseconds.
    ///
    /// Applied after validation so the stored title is the one the length
    /// rule was checked against. Truncation never reorders the two times.
    pub fn normalized(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            start_time: self.start_time.trunc_subsecs(6),
            end_time: self.end_time.trunc_subsecs(6),
        }
    }
}

/// A stored event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Store-assigned identifier.
    pub id: String,

    /// Event title.
    pub title: String,

    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// When the event starts.
    pub start_time: DateTime<Utc>,

    /// When the event ends.
    pub end_time: DateTime<Utc>,

    /// Store-assigned insertion timestamp.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_new_event_deserializes_without_description() {
        let json = r#"{
            "title": "Team sync",
            "start_time": "2025-03-14T09:00:00Z",
            "end_time": "2025-03-14T10:00:00Z"
        }"#;
        let event: NewEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.title, "Team sync");
        assert_eq!(event.description, None);
        assert_eq!(event.start_time, start());
        assert_eq!(event.end_time, start() + Duration::hours(1));
    }

    #[test]
    fn test_event_serializes_created_at_in_camel_case() {
        let event = Event {
            id: "5f0c6a55-8a53-4f5b-9d1c-5a8f7f1f2c11".to_string(),
            title: "Team sync".to_string(),
            description: Some("weekly".to_string()),
            start_time: start(),
            end_time: start() + Duration::hours(1),
            created_at: start(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
        assert!(json.get("start_time").is_some());
        assert!(json.get("end_time").is_some());
        assert_eq!(json["description"], "weekly");
    }

    #[test]
    fn test_normalized_trims_title_only() {
        let event = NewEvent {
            title: "  Team sync \n".to_string(),
            description: Some("  keep me  ".to_string()),
            start_time: start(),
            end_time: start(),
        };
        let normalized = event.normalized();
        assert_eq!(normalized.title, "Team sync");
        assert_eq!(normalized.description.as_deref(), Some("  keep me  "));
        assert_eq!(normalized.start_time, start());
    }

    #[test]
    fn test_normalized_truncates_to_microseconds() {
        let start_time = start() + Duration::nanoseconds(123_456_789);
        let event = NewEvent {
            title: "Team sync".to_string(),
            description: None,
            start_time,
            end_time: start_time + Duration::nanoseconds(1),
        };

        let normalized = event.normalized();
        assert_eq!(normalized.start_time, start() + Duration::microseconds(123_456));
        assert_eq!(normalized.end_time, normalized.start_time);
        assert!(normalized.end_time >= normalized.start_time);
    }
}
