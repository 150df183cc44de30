//! Calendar API wire types.
//!
//! Field names follow the Google Calendar v3 JSON schema (camelCase,
//! `dateTime`/`timeZone` on event boundaries).

use serde::{Deserialize, Serialize};

/// An event boundary: RFC 3339 timestamp plus time zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    pub date_time: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventTime {
    /// A UTC-qualified boundary.
    pub fn utc(date_time: &str) -> Self {
        Self {
            date_time: date_time.to_string(),
            time_zone: Some("UTC".to_string()),
        }
    }
}

/// Body for an event insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRequest {
    pub summary: String,
    pub description: String,
    pub start: EventTime,
    pub end: EventTime,
}

impl EventRequest {
    /// A timed event with UTC boundaries.
    pub fn timed(summary: &str, description: &str, start: &str, end: &str) -> Self {
        Self {
            summary: summary.to_string(),
            description: description.to_string(),
            start: EventTime::utc(start),
            end: EventTime::utc(end),
        }
    }
}

/// The provider's event representation, echoed back to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<EventTime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<EventTime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
}
