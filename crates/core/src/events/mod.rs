//! Event sources and week-based aggregation.

/// Merge, week bucketing and search navigation.
pub mod aggregator;
/// Store-backed custom events.
pub mod custom;
/// Remote iCalendar feed.
pub mod feed;

pub use aggregator::{
    events_in_week, find_matching_week, group_by_day, initial_week, merge_and_sort, shift_week,
    EventCalendar,
};
pub use custom::load_custom_events;
pub use feed::{normalize_feed_url, parse_ical, CalendarFeed};
