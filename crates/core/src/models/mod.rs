//! Shared domain models.

mod event;
mod game;

pub use event::{Event, EventDuration, EventSource};
pub use game::{Company, Game, GameDocument, GameId, Platform, Platforms, Ratings, ReleaseDate};

pub(crate) use game::RawTimeValue;
