use chrono::{TimeZone, Utc};
use tracing::{info, warn};

use crate::{
    error::StoreError,
    models::{Event, EventSource},
    store::{CustomEventDocument, CustomEventRepository},
};

/// Read the custom events collection as events tagged [`EventSource::Custom`].
pub fn load_custom_events(
    repository: &dyn CustomEventRepository,
) -> Result<Vec<Event>, StoreError> {
    let events: Vec<Event> = repository
        .read_all_custom_events()?
        .into_iter()
        .filter_map(decode_custom_event)
        .collect();
    info!(count = events.len(), "custom events loaded");
    Ok(events)
}

fn decode_custom_event(document: CustomEventDocument) -> Option<Event> {
    let Some(start) = document
        .start_seconds()
        .and_then(|seconds| Utc.timestamp_opt(seconds, 0).single())
    else {
        warn!(title = %document.title, "skipping custom event without a usable start");
        return None;
    };
    let end = document
        .end_seconds()
        .and_then(|seconds| Utc.timestamp_opt(seconds, 0).single());

    let mut event = Event::new(document.title, start, EventSource::Custom).with_end(end);
    event.all_day = document.all_day;
    event.description = document.description.filter(|text| !text.trim().is_empty());
    event.duration = document.duration;
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventDuration;
    use serde_json::json;

    struct FixedEvents(Vec<CustomEventDocument>);

    impl CustomEventRepository for FixedEvents {
        fn read_all_custom_events(&self) -> Result<Vec<CustomEventDocument>, StoreError> {
            Ok(self.0.clone())
        }
    }

    struct Unavailable;

    impl CustomEventRepository for Unavailable {
        fn read_all_custom_events(&self) -> Result<Vec<CustomEventDocument>, StoreError> {
            Err(StoreError::NotFound("custom_events".to_string()))
        }
    }

    fn document(value: serde_json::Value) -> CustomEventDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn decodes_backend_timestamps_and_optional_fields() {
        let repo = FixedEvents(vec![
            document(json!({
                "title": "Studio showcase",
                "start": { "seconds": 1_780_000_000, "nanoseconds": 0 },
                "end": 1_780_003_600,
                "description": "Live on stream",
                "duration": { "hours": 1 }
            })),
            document(json!({ "title": "Bare", "start": 1_780_100_000 })),
            document(json!({ "title": "Broken", "start": "next week" })),
        ]);

        let events = load_custom_events(&repo).unwrap();
        assert_eq!(events.len(), 2);

        let showcase = &events[0];
        assert_eq!(showcase.source, EventSource::Custom);
        assert_eq!(showcase.start.timestamp(), 1_780_000_000);
        assert_eq!(showcase.end.map(|end| end.timestamp()), Some(1_780_003_600));
        assert_eq!(showcase.description.as_deref(), Some("Live on stream"));
        assert_eq!(showcase.duration, Some(EventDuration { hours: 1, minutes: 0 }));

        let bare = &events[1];
        assert_eq!(bare.end, None);
        assert_eq!(bare.description, None);
        assert_eq!(bare.duration, None);
    }

    #[test]
    fn store_failure_is_returned_to_the_caller() {
        assert!(matches!(
            load_custom_events(&Unavailable),
            Err(StoreError::NotFound(_))
        ));
    }
}
