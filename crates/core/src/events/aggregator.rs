use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};

use crate::{
    dates::{local_date, start_of_week, week_end, week_start_of},
    models::Event,
};

/// Concatenate both sources and sort by start.
///
/// The sort is stable: equal starts keep feed events first, then input order.
pub fn merge_and_sort(ical_events: Vec<Event>, custom_events: Vec<Event>) -> Vec<Event> {
    let mut events = ical_events;
    events.extend(custom_events);
    events.sort_by_key(|event| event.start);
    events
}

/// Week to show first: the one holding the next event, else the earliest one.
pub fn initial_week<Tz: TimeZone>(
    events: &[Event],
    now: &DateTime<Utc>,
    tz: &Tz,
) -> Option<NaiveDate> {
    let chosen = events
        .iter()
        .find(|event| event.start >= *now)
        .or_else(|| events.iter().min_by_key(|event| event.start))?;
    Some(week_start_of(&chosen.start, tz))
}

/// Events whose local start date falls within the week starting at `week_start`.
pub fn events_in_week<Tz: TimeZone>(
    events: &[Event],
    week_start: NaiveDate,
    tz: &Tz,
) -> Vec<Event> {
    let last = week_end(week_start);
    events
        .iter()
        .filter(|event| {
            let day = local_date(&event.start, tz);
            day >= week_start && day <= last
        })
        .cloned()
        .collect()
}

/// Group events by local start date, ascending.
pub fn group_by_day<Tz: TimeZone>(events: &[Event], tz: &Tz) -> BTreeMap<NaiveDate, Vec<Event>> {
    let mut days: BTreeMap<NaiveDate, Vec<Event>> = BTreeMap::new();
    for event in events {
        days.entry(local_date(&event.start, tz))
            .or_default()
            .push(event.clone());
    }
    days
}

/// Move `offset` weeks forward (or backward when negative).
pub fn shift_week(week_start: NaiveDate, offset: i64) -> NaiveDate {
    let days = Days::new(offset.unsigned_abs().saturating_mul(7));
    let shifted = if offset >= 0 {
        week_start.checked_add_days(days)
    } else {
        week_start.checked_sub_days(days)
    };
    shifted.unwrap_or(week_start)
}

/// Week holding the earliest event whose title contains `query`, ignoring case.
pub fn find_matching_week<Tz: TimeZone>(
    events: &[Event],
    query: &str,
    tz: &Tz,
) -> Option<NaiveDate> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    events
        .iter()
        .filter(|event| event.title.to_lowercase().contains(&needle))
        .min_by_key(|event| event.start)
        .map(|event| week_start_of(&event.start, tz))
}

/// Week-by-week navigation over the merged events.
#[derive(Debug, Clone)]
pub struct EventCalendar<Tz: TimeZone> {
    events: Vec<Event>,
    tz: Tz,
    initial: Option<NaiveDate>,
    current: Option<NaiveDate>,
    query: String,
}

impl<Tz: TimeZone> EventCalendar<Tz> {
    /// Build the calendar from both sources, opening on the initial week.
    pub fn new(
        ical_events: Vec<Event>,
        custom_events: Vec<Event>,
        now: &DateTime<Utc>,
        tz: Tz,
    ) -> Self {
        let events = merge_and_sort(ical_events, custom_events);
        let initial = initial_week(&events, now, &tz);
        Self {
            events,
            tz,
            initial,
            current: initial,
            query: String::new(),
        }
    }

    /// Calendar without events.
    pub fn empty(tz: Tz) -> Self {
        Self {
            events: Vec::new(),
            tz,
            initial: None,
            current: None,
            query: String::new(),
        }
    }

    /// Every event, sorted.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Monday of the week on screen; `None` when there are no events.
    pub fn current_week(&self) -> Option<NaiveDate> {
        self.current
    }

    /// Active search text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Move by whole weeks.
    pub fn shift(&mut self, offset: i64) {
        if let Some(week) = self.current {
            self.current = Some(shift_week(week, offset));
        }
    }

    /// Jump back to the initial week.
    pub fn reset(&mut self) {
        self.current = self.initial;
    }

    /// Update the search and jump to the first matching week, or back to the initial week.
    ///
    /// Returns whether a match was found.
    pub fn set_query(&mut self, query: &str) -> bool {
        self.query = query.to_string();
        match find_matching_week(&self.events, query, &self.tz) {
            Some(week) => {
                self.current = Some(week);
                true
            }
            None => {
                self.current = self.initial;
                false
            }
        }
    }

    /// Events of the current week grouped by day.
    pub fn current_days(&self) -> BTreeMap<NaiveDate, Vec<Event>> {
        match self.current {
            Some(week) => group_by_day(&events_in_week(&self.events, week, &self.tz), &self.tz),
            None => BTreeMap::new(),
        }
    }

    /// Whether any event falls within the current week.
    pub fn current_week_is_empty(&self) -> bool {
        self.current_days().is_empty()
    }

    /// Week containing today, used when the calendar has nothing to show.
    pub fn this_week(&self, now: &DateTime<Utc>) -> NaiveDate {
        start_of_week(local_date(now, &self.tz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventSource;
    use chrono::FixedOffset;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
    }

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn ical(title: &str, start: DateTime<Utc>) -> Event {
        Event::new(title, start, EventSource::Ical)
    }

    fn custom(title: &str, start: DateTime<Utc>) -> Event {
        Event::new(title, start, EventSource::Custom)
    }

    #[test]
    fn merge_sorts_and_keeps_every_event() {
        let feed = vec![ical("B", at(2026, 6, 5, 10)), ical("A", at(2026, 6, 1, 10))];
        let own = vec![custom("C", at(2026, 6, 3, 10)), custom("Tie", at(2026, 6, 5, 10))];
        let merged = merge_and_sort(feed, own);

        assert_eq!(merged.len(), 4);
        assert!(merged.windows(2).all(|pair| pair[0].start <= pair[1].start));
        let titles: Vec<_> = merged.iter().map(|event| event.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C", "B", "Tie"]);
    }

    #[test]
    fn merge_of_empty_sources_is_empty() {
        assert!(merge_and_sort(Vec::new(), Vec::new()).is_empty());
    }

    #[test]
    fn initial_week_prefers_next_event_then_earliest() {
        let events = merge_and_sort(
            vec![ical("Past", at(2026, 1, 7, 12)), ical("Next", at(2026, 3, 4, 12))],
            Vec::new(),
        );
        assert_eq!(initial_week(&events, &at(2026, 2, 1, 0), &Utc), Some(ymd(2026, 3, 2)));
        assert_eq!(initial_week(&events, &at(2026, 9, 1, 0), &Utc), Some(ymd(2026, 1, 5)));
        assert_eq!(initial_week(&[], &at(2026, 9, 1, 0), &Utc), None);
    }

    #[test]
    fn week_filter_compares_local_dates() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        // Sunday 23:00 UTC is Monday 01:00 at +02:00.
        let events = vec![ical("Late", at(2026, 3, 1, 23)), ical("Sunday", at(2026, 3, 8, 12))];
        let week = events_in_week(&events, ymd(2026, 3, 2), &tz);
        assert_eq!(week.len(), 2);
        assert_eq!(events_in_week(&events, ymd(2026, 3, 2), &Utc).len(), 1);

        let again = events_in_week(&week, ymd(2026, 3, 2), &tz);
        assert_eq!(again, week);
    }

    #[test]
    fn groups_days_in_ascending_order() {
        let events = vec![
            ical("Thu", at(2026, 3, 5, 9)),
            ical("Mon", at(2026, 3, 2, 9)),
            ical("Thu late", at(2026, 3, 5, 20)),
        ];
        let days = group_by_day(&events, &Utc);
        let keys: Vec<_> = days.keys().copied().collect();
        assert_eq!(keys, vec![ymd(2026, 3, 2), ymd(2026, 3, 5)]);
        assert_eq!(days[&ymd(2026, 3, 5)].len(), 2);
    }

    #[test]
    fn grouping_an_empty_week_is_empty() {
        let week = week_start_of(&at(2026, 3, 4, 0), &Utc);
        assert!(group_by_day(&events_in_week(&[], week, &Utc), &Utc).is_empty());
    }

    #[test]
    fn shifts_by_whole_weeks() {
        assert_eq!(shift_week(ymd(2026, 3, 2), 1), ymd(2026, 3, 9));
        assert_eq!(shift_week(ymd(2026, 3, 2), -2), ymd(2026, 2, 16));
        assert_eq!(shift_week(ymd(2026, 3, 2), 0), ymd(2026, 3, 2));
    }

    #[test]
    fn search_finds_first_matching_week() {
        let events = vec![
            ical("Zelda Direct", at(2026, 3, 4, 18)),
            ical("Mario Day", at(2026, 3, 10, 18)),
        ];
        assert_eq!(find_matching_week(&events, "zel", &Utc), Some(ymd(2026, 3, 2)));
        assert_eq!(find_matching_week(&events, "MARIO", &Utc), Some(ymd(2026, 3, 9)));
        assert_eq!(find_matching_week(&events, "metroid", &Utc), None);
        assert_eq!(find_matching_week(&events, "  ", &Utc), None);
    }

    #[test]
    fn calendar_navigation_reverts_on_cleared_search() {
        let mut calendar = EventCalendar::new(
            vec![ical("Mario Day", at(2026, 3, 10, 18))],
            vec![custom("Zelda Direct", at(2026, 4, 15, 18))],
            &at(2026, 3, 1, 0),
            Utc,
        );
        assert_eq!(calendar.current_week(), Some(ymd(2026, 3, 9)));

        assert!(calendar.set_query("zelda"));
        assert_eq!(calendar.current_week(), Some(ymd(2026, 4, 13)));
        assert_eq!(calendar.current_days().len(), 1);

        assert!(!calendar.set_query(""));
        assert_eq!(calendar.current_week(), Some(ymd(2026, 3, 9)));

        calendar.shift(-1);
        assert_eq!(calendar.current_week(), Some(ymd(2026, 3, 2)));
        assert!(calendar.current_week_is_empty());
        calendar.reset();
        assert_eq!(calendar.current_week(), Some(ymd(2026, 3, 9)));
    }

    #[test]
    fn empty_calendar_has_no_week() {
        let mut calendar = EventCalendar::empty(Utc);
        calendar.shift(3);
        assert_eq!(calendar.current_week(), None);
        assert!(calendar.current_days().is_empty());
        assert_eq!(calendar.this_week(&at(2026, 3, 4, 0)), ymd(2026, 3, 2));
    }
}
