//! Calendar event model.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A single calendar event, as produced by an event source.
///
/// `start` and `end` carry the offset they were resolved with. Well-formed
/// events satisfy `start <= end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Event title.
    pub summary: String,

    /// Start instant.
    pub start: DateTime<FixedOffset>,

    /// End instant.
    pub end: DateTime<FixedOffset>,

    /// Free-form description; hashtags are read from here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Event location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Unique identifier from the source (ICS `UID` or API id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    /// Hashtags found in the description, in order of appearance.
    #[serde(default)]
    pub hashtags: Vec<String>,
}

impl CalendarEvent {
    /// Creates an event with only the required fields set.
    pub fn new(
        summary: impl Into<String>,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            summary: summary.into(),
            start,
            end,
            description: None,
            location: None,
            uid: None,
            hashtags: Vec::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the unique identifier.
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Replaces the hashtag list.
    pub fn with_hashtags(mut self, hashtags: Vec<String>) -> Self {
        self.hashtags = hashtags;
        self
    }

    /// Duration in hours (`end - start`, fractional).
    pub fn duration_hours(&self) -> f64 {
        let seconds = (self.end - self.start).num_milliseconds() as f64 / 1000.0;
        seconds / 3600.0
    }

    /// Duration formatted as `H:MM`.
    ///
    /// Minutes are truncated, so a 90.9 minute event renders as `1:30`.
    pub fn duration_formatted(&self) -> String {
        let total_minutes = (self.duration_hours() * 60.0) as i64;
        let hours = total_minutes.div_euclid(60);
        let minutes = total_minutes.rem_euclid(60);
        format!("{hours}:{minutes:02}")
    }

    /// Hashtags joined with `", "` for flat output formats.
    pub fn hashtags_joined(&self) -> String {
        self.hashtags.join(", ")
    }

    /// Builds the flat export view of this event.
    pub fn to_record(&self) -> EventRecord {
        EventRecord {
            summary: self.summary.clone(),
            start: self.start.to_rfc3339(),
            end: self.end.to_rfc3339(),
            duration_hours: round_hours(self.duration_hours()),
            duration_formatted: self.duration_formatted(),
            description: self.description.clone().unwrap_or_default(),
            location: self.location.clone().unwrap_or_default(),
            hashtags: self.hashtags_joined(),
        }
    }
}

/// Flat, serializable view of an event used by exporters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub summary: String,
    pub start: String,
    pub end: String,
    pub duration_hours: f64,
    pub duration_formatted: String,
    pub description: String,
    pub location: String,
    pub hashtags: String,
}

/// Sum of the durations of `events`, in hours.
pub fn total_hours(events: &[CalendarEvent]) -> f64 {
    events.iter().map(CalendarEvent::duration_hours).sum()
}

/// Rounds an hour value to two decimals for display and export.
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}
