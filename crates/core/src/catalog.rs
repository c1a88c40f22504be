//! Ordering, filtering and the "next release" pick for the game list.
//!
//! Timestamp release dates sort by epoch milliseconds while labels such as
//! `Q3 2026` or `TBA 2027` sort by `year * 100 + offset`. The two scales are
//! not comparable in any meaningful way; mixed lists keep whatever order the
//! raw keys produce.

use std::{cmp::Ordering, collections::BTreeSet};

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    dates::day_difference,
    models::{Company, Game, Platform, ReleaseDate},
};

static QUARTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Q([1-4]) (\d{4})").expect("quarter pattern is valid"));
static TBA_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"TBA (\d{4})").expect("tba pattern is valid"));

/// Position of a release date in the catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    /// Comparable numeric key.
    Finite(i64),
    /// Undated entries, after everything else.
    Last,
}

/// Compute the sort key of a release date.
pub fn sort_key(release_date: &ReleaseDate) -> SortKey {
    match release_date {
        ReleaseDate::Timestamp(seconds) => SortKey::Finite(seconds.saturating_mul(1000)),
        ReleaseDate::Label(label) => label_key(label),
    }
}

fn label_key(label: &str) -> SortKey {
    if let Some(caps) = QUARTER.captures(label) {
        let quarter: i64 = caps[1].parse().unwrap_or(0);
        if let Ok(year) = caps[2].parse::<i64>() {
            return SortKey::Finite(year * 100 + quarter);
        }
    }
    if let Some(caps) = TBA_YEAR.captures(label) {
        if let Ok(year) = caps[1].parse::<i64>() {
            return SortKey::Finite(year * 100 + 99);
        }
    }
    SortKey::Last
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sort ascending by release key, then by name.
pub fn sort_games(mut games: Vec<Game>) -> Vec<Game> {
    games.sort_by(|a, b| {
        sort_key(a.release_date())
            .cmp(&sort_key(b.release_date()))
            .then_with(|| compare_names(a.name(), b.name()))
    });
    games
}

/// Which kind of release date the list shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateKind {
    /// Games with a known day.
    #[default]
    Dated,
    /// Games with a label such as `Q2 2026` or `TBA`.
    Labelled,
}

impl DateKind {
    /// Whether a release date belongs to this kind.
    pub fn matches(self, release_date: &ReleaseDate) -> bool {
        match self {
            DateKind::Dated => release_date.is_timestamp(),
            DateKind::Labelled => !release_date.is_timestamp(),
        }
    }

    /// The other kind.
    pub fn toggled(self) -> Self {
        match self {
            DateKind::Dated => DateKind::Labelled,
            DateKind::Labelled => DateKind::Dated,
        }
    }
}

/// Released/upcoming filter for dated games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseStatus {
    /// Release instant at or after now.
    Upcoming,
    /// Release instant before now.
    Released,
}

impl ReleaseStatus {
    /// Map the persisted `show_only_upcoming` flag.
    pub fn from_flag(show_only_upcoming: Option<bool>) -> Option<Self> {
        show_only_upcoming.map(|upcoming| {
            if upcoming {
                ReleaseStatus::Upcoming
            } else {
                ReleaseStatus::Released
            }
        })
    }

    /// Inverse of [`ReleaseStatus::from_flag`].
    pub fn to_flag(status: Option<Self>) -> Option<bool> {
        status.map(|status| status == ReleaseStatus::Upcoming)
    }
}

/// Criteria applied to the game list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameFilter {
    /// Case-insensitive text matched against names and credits.
    pub search: String,
    /// Platforms that must all be enabled.
    pub platforms: BTreeSet<Platform>,
    /// Optional released/upcoming restriction.
    pub release_status: Option<ReleaseStatus>,
    /// Kind of release date to show.
    pub date_kind: DateKind,
}

impl GameFilter {
    /// Whether a game passes every criterion.
    pub fn accepts(&self, game: &Game, now: &DateTime<Utc>) -> bool {
        self.date_kind.matches(game.release_date())
            && self.matches_search(game)
            && self.matches_platforms(game)
            && self.matches_status(game, now)
    }

    fn matches_search(&self, game: &Game) -> bool {
        let needle = self.search.trim().to_lowercase();
        let contains = |text: &str| text.to_lowercase().contains(&needle);
        contains(game.name())
            || game.document.developers.iter().any(|dev| contains(&dev.name))
            || game.document.editors.iter().any(|editor| contains(&editor.name))
    }

    fn matches_platforms(&self, game: &Game) -> bool {
        self.platforms
            .iter()
            .all(|platform| game.document.platforms.is_enabled(*platform))
    }

    fn matches_status(&self, game: &Game, now: &DateTime<Utc>) -> bool {
        match (self.release_status, game.release_date().instant()) {
            (Some(ReleaseStatus::Upcoming), Some(instant)) => instant >= *now,
            (Some(ReleaseStatus::Released), Some(instant)) => instant < *now,
            _ => true,
        }
    }
}

/// Games accepted by `filter`, in input order.
pub fn filter_games(games: &[Game], filter: &GameFilter, now: &DateTime<Utc>) -> Vec<Game> {
    games
        .iter()
        .filter(|game| filter.accepts(game, now))
        .cloned()
        .collect()
}

/// Filtered and sorted list, as displayed.
pub fn visible_games(games: &[Game], filter: &GameFilter, now: &DateTime<Utc>) -> Vec<Game> {
    sort_games(filter_games(games, filter, now))
}

/// Dated game releasing soonest, today included. Ties keep the first one seen.
pub fn select_featured<'a, Tz: TimeZone>(
    games: &'a [Game],
    now: &DateTime<Utc>,
    tz: &Tz,
) -> Option<&'a Game> {
    let mut best: Option<(&Game, i64)> = None;
    for game in games {
        let Some(instant) = game.release_date().instant() else {
            continue;
        };
        let days = day_difference(&instant, now, tz);
        if days < 0 {
            continue;
        }
        if best.map_or(true, |(_, closest)| days < closest) {
            best = Some((game, days));
        }
    }
    best.map(|(game, _)| game)
}

/// Countdown text for a release instant.
pub fn release_message<Tz: TimeZone>(
    release: &DateTime<Utc>,
    now: &DateTime<Utc>,
    tz: &Tz,
) -> String {
    match day_difference(release, now, tz) {
        0 => "Releases today !".to_string(),
        1 => "Releases tomorrow".to_string(),
        days if days > 1 => format!("Releases in {days} days"),
        _ => "Already released".to_string(),
    }
}

/// Whether a dated game is already out. Labelled games never are.
pub fn is_released(game: &Game, now: &DateTime<Utc>) -> bool {
    game.release_date()
        .instant()
        .map_or(false, |instant| instant < *now)
}

/// Platforms enabled on at least one game, in key order.
pub fn available_platforms(games: &[Game]) -> BTreeSet<Platform> {
    games
        .iter()
        .flat_map(|game| game.document.platforms.enabled())
        .collect()
}

/// `A`, `A & B`, `A, B & C`.
pub fn format_credits(companies: &[Company]) -> String {
    let names: Vec<&str> = companies.iter().map(|company| company.name.as_str()).collect();
    match names.split_last() {
        None => String::new(),
        Some((last, [])) => (*last).to_string(),
        Some((last, rest)) => format!("{} & {}", rest.join(", "), last),
    }
}
