use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Origin of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    /// Read-only external calendar feed.
    Ical,
    /// Editable store-backed event.
    Custom,
}

/// Length of a custom event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDuration {
    /// Whole hours.
    #[serde(default)]
    pub hours: u32,
    /// Remaining minutes.
    #[serde(default)]
    pub minutes: u32,
}

/// A calendar entry shown in the events view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Headline.
    pub title: String,
    /// Start instant.
    pub start: DateTime<Utc>,
    /// End instant, never before `start`.
    pub end: Option<DateTime<Utc>>,
    /// Date-only event without a time of day.
    pub all_day: bool,
    /// Producer of the event.
    pub source: EventSource,
    /// Free text attached to custom events.
    pub description: Option<String>,
    /// Announced length of custom events.
    pub duration: Option<EventDuration>,
}

impl Event {
    /// Build a feed event with only the mandatory fields.
    pub fn new(title: impl Into<String>, start: DateTime<Utc>, source: EventSource) -> Self {
        Self {
            title: title.into(),
            start,
            end: None,
            all_day: false,
            source,
            description: None,
            duration: None,
        }
    }

    /// Set the end instant, dropping it when it precedes the start.
    pub fn with_end(mut self, end: Option<DateTime<Utc>>) -> Self {
        self.end = end.filter(|end| *end >= self.start);
        self
    }
}
