#![warn(clippy::all, missing_docs)]

//! Core domain logic for Release Radar.
//!
//! This crate hosts the game catalog and events models, the calendar and
//! leaks feed adapters, the local document store with live subscriptions,
//! and the list, form and UI state logic used by the terminal frontend.

pub mod catalog;
pub mod config;
pub mod dates;
pub mod error;
pub mod events;
pub mod form;
pub mod leaks;
pub mod models;
pub mod prefs;
pub mod state;
pub mod store;

pub use catalog::{GameFilter, ReleaseStatus, SortKey};
pub use config::AppConfig;
pub use error::{AuthError, ConfigError, FeedError, FormError, StoreError};
pub use events::{CalendarFeed, EventCalendar};
pub use form::{GameForm, SubmitOutcome};
pub use leaks::{LeakPost, LeaksFeed};
pub use models::{Event, Game, GameDocument, GameId, Platform, ReleaseDate};
pub use prefs::{FilterPreferences, PreferenceStore};
pub use state::{AppState, Modal, View};
pub use store::{AuthProvider, DocumentStore, GameRepository, LocalAuth, StoreWatcher};
