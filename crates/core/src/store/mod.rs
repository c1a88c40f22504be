//! Persistence and authentication adapters.
//!
//! The catalog treats its backend as an opaque document store with live
//! snapshot subscriptions plus an auth provider. [`DocumentStore`] and
//! [`LocalAuth`] implement those seams on the local filesystem.

/// Admin sign-in.
pub mod auth;
/// Directory-backed document store.
pub mod document;
/// Snapshot subscriptions.
pub mod subscription;
/// File watcher pushing external changes to subscribers.
pub mod watcher;

use serde::{Deserialize, Serialize};

use crate::{
    error::StoreError,
    models::{EventDuration, Game, GameDocument, GameId, RawTimeValue},
};

pub use auth::{AuthProvider, LocalAuth, Session};
pub use document::DocumentStore;
pub use subscription::{Subscription, SubscriberRegistry};
pub use watcher::StoreWatcher;

/// CRUD and live subscription over the games collection.
pub trait GameRepository: Send + Sync {
    /// Insert a new game and return its assigned id.
    fn create(&self, document: GameDocument) -> Result<GameId, StoreError>;
    /// Overwrite the fields of an existing game.
    fn update(&self, id: &GameId, document: GameDocument) -> Result<(), StoreError>;
    /// Remove a game permanently.
    fn delete(&self, id: &GameId) -> Result<(), StoreError>;
    /// Current contents of the collection.
    fn snapshot(&self) -> Result<Vec<Game>, StoreError>;
    /// Open a push channel delivering the full collection after every change.
    fn subscribe(&self) -> Result<Subscription<Vec<Game>>, StoreError>;
}

/// Read access to the custom events collection.
pub trait CustomEventRepository: Send + Sync {
    /// Every stored custom event document.
    fn read_all_custom_events(&self) -> Result<Vec<CustomEventDocument>, StoreError>;
}

/// Custom event as stored; every field but the title and start is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomEventDocument {
    /// Headline.
    #[serde(default)]
    pub title: String,
    /// Start time in any stored timestamp shape.
    pub start: serde_json::Value,
    /// Optional end time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<serde_json::Value>,
    /// Date-only event.
    #[serde(default, rename = "allDay", alias = "all_day")]
    pub all_day: bool,
    /// Free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Announced length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<EventDuration>,
}

impl CustomEventDocument {
    pub(crate) fn start_seconds(&self) -> Option<i64> {
        decode_seconds(&self.start)
    }

    pub(crate) fn end_seconds(&self) -> Option<i64> {
        self.end.as_ref().and_then(decode_seconds)
    }
}

fn decode_seconds(value: &serde_json::Value) -> Option<i64> {
    serde_json::from_value::<RawTimeValue>(value.clone())
        .ok()
        .and_then(|raw| raw.seconds())
}
