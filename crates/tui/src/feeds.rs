use std::sync::Arc;

use radar_core::{
    config::AppConfig,
    events::{load_custom_events, CalendarFeed},
    leaks::{LeakPost, LeaksFeed},
    models::Event,
    DocumentStore,
};
use tokio::sync::mpsc;
use tracing::{error, warn};

/// Results delivered by background fetches.
pub enum FeedEvent {
    Events { ical: Vec<Event>, custom: Vec<Event> },
    Leaks(Vec<LeakPost>),
    /// A source could not be reached; its list was replaced by an empty one.
    Unavailable(&'static str),
}

/// Remote sources plus the channel their results are sent on.
#[derive(Clone)]
pub struct Feeds {
    calendar: Option<CalendarFeed>,
    leaks: Option<LeaksFeed>,
    store: Arc<DocumentStore>,
    sender: mpsc::Sender<FeedEvent>,
}

impl Feeds {
    pub fn new(config: &AppConfig, store: Arc<DocumentStore>) -> (Self, mpsc::Receiver<FeedEvent>) {
        let calendar = if config.has_calendar() {
            CalendarFeed::new(&config.calendar_url, config.fetch_timeout())
                .map_err(|err| error!(%err, "calendar feed disabled"))
                .ok()
        } else {
            warn!("no calendar_url configured; only custom events will be shown");
            None
        };
        let leaks = LeaksFeed::new(&config.leaks_url, config.fetch_timeout())
            .map_err(|err| error!(%err, "leaks feed disabled"))
            .ok();
        let (sender, receiver) = mpsc::channel(8);
        (
            Self {
                calendar,
                leaks,
                store,
                sender,
            },
            receiver,
        )
    }

    /// Fetch the calendar and read custom events in the background.
    pub fn refresh_events(&self) {
        let calendar = self.calendar.clone();
        let store = Arc::clone(&self.store);
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let ical = match calendar {
                Some(feed) => match feed.fetch().await {
                    Ok(events) => events,
                    Err(err) => {
                        error!(url = %feed.url(), %err, "calendar feed unavailable");
                        report(&sender, "Could not load the events calendar").await;
                        Vec::new()
                    }
                },
                None => Vec::new(),
            };
            let read = tokio::task::spawn_blocking(move || load_custom_events(store.as_ref()));
            let custom = match read.await {
                Ok(Ok(events)) => events,
                Ok(Err(err)) => {
                    error!(%err, "custom events unavailable");
                    report(&sender, "Could not load custom events").await;
                    Vec::new()
                }
                Err(err) => {
                    error!(%err, "custom events task failed");
                    report(&sender, "Could not load custom events").await;
                    Vec::new()
                }
            };
            if sender.send(FeedEvent::Events { ical, custom }).await.is_err() {
                warn!("events fetched after the UI closed");
            }
        });
    }

    /// Fetch the leaks listing in the background.
    pub fn refresh_leaks(&self) {
        let Some(feed) = self.leaks.clone() else {
            return;
        };
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let posts = match feed.fetch().await {
                Ok(posts) => posts,
                Err(err) => {
                    error!(url = %feed.url(), %err, "leaks listing unavailable");
                    report(&sender, "Could not load leaks & rumours").await;
                    Vec::new()
                }
            };
            if sender.send(FeedEvent::Leaks(posts)).await.is_err() {
                warn!("leaks fetched after the UI closed");
            }
        });
    }

    pub fn has_leaks(&self) -> bool {
        self.leaks.is_some()
    }
}

async fn report(sender: &mpsc::Sender<FeedEvent>, message: &'static str) {
    if sender.send(FeedEvent::Unavailable(message)).await.is_err() {
        warn!(message, "feed failure after the UI closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::{fs, time::Duration};
    use tempfile::tempdir;

    const CUSTOM_EVENTS: &str = "custom_events.json";

    async fn until_events(receiver: &mut mpsc::Receiver<FeedEvent>) -> Vec<FeedEvent> {
        let mut seen = Vec::new();
        while let Ok(Some(event)) =
            tokio::time::timeout(Duration::from_secs(10), receiver.recv()).await
        {
            let done = matches!(event, FeedEvent::Events { .. });
            seen.push(event);
            if done {
                break;
            }
        }
        seen
    }

    #[tokio::test]
    async fn unreachable_calendar_is_reported_and_custom_events_still_arrive() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join(CUSTOM_EVENTS),
            r#"{"e1":{"title":"Launch stream","start":{"seconds":1780000000,"nanoseconds":0}}}"#,
        )?;
        let store = Arc::new(DocumentStore::open(dir.path())?);
        let config = AppConfig {
            calendar_url: "http://127.0.0.1:9/calendar.ics".to_string(),
            fetch_timeout_secs: 2,
            ..AppConfig::default()
        };

        let (feeds, mut receiver) = Feeds::new(&config, store);
        feeds.refresh_events();
        let seen = until_events(&mut receiver).await;

        assert_eq!(seen.len(), 2);
        assert!(matches!(
            seen[0],
            FeedEvent::Unavailable("Could not load the events calendar")
        ));
        match &seen[1] {
            FeedEvent::Events { ical, custom } => {
                assert!(ical.is_empty());
                assert_eq!(custom.len(), 1);
                assert_eq!(custom[0].title, "Launch stream");
            }
            _ => panic!("calendar failure must still deliver the events"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn unreadable_custom_events_are_reported() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join(CUSTOM_EVENTS), "{ not json")?;
        let store = Arc::new(DocumentStore::open(dir.path())?);
        let config = AppConfig::default();

        let (feeds, mut receiver) = Feeds::new(&config, store);
        feeds.refresh_events();
        let seen = until_events(&mut receiver).await;

        assert_eq!(seen.len(), 2);
        assert!(matches!(
            seen[0],
            FeedEvent::Unavailable("Could not load custom events")
        ));
        assert!(matches!(
            &seen[1],
            FeedEvent::Events { ical, custom } if ical.is_empty() && custom.is_empty()
        ));
        Ok(())
    }
}
