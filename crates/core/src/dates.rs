//! Calendar arithmetic and date formatting.
//!
//! Week computations use ISO weeks (Monday first) whatever the locale says.
//! Functions that need a wall clock take the time zone explicitly so the UI
//! can pass `Local` and tests can pin a fixed offset.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc};

use crate::models::EventDuration;

/// Monday of the week containing `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_monday());
    date - Days::new(back)
}

/// Calendar date of an instant in the given zone.
pub fn local_date<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// Monday of the local week containing `instant`.
pub fn week_start_of<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    start_of_week(local_date(instant, tz))
}

/// Last day of the week starting at `week_start`.
pub fn week_end(week_start: NaiveDate) -> NaiveDate {
    week_start + Days::new(6)
}

/// Whole calendar days from `now` to `target`, both truncated to local dates.
pub fn day_difference<Tz: TimeZone>(target: &DateTime<Utc>, now: &DateTime<Utc>, tz: &Tz) -> i64 {
    (local_date(target, tz) - local_date(now, tz)).num_days()
}

/// `Mar 2 – Mar 8`, or `Dec 29, 2025 – Jan 4, 2026` when the week spans two years.
pub fn format_week_range(week_start: NaiveDate) -> String {
    let end = week_end(week_start);
    if week_start.year() == end.year() {
        format!("{} – {}", week_start.format("%b %-d"), end.format("%b %-d"))
    } else {
        format!(
            "{} – {}",
            week_start.format("%b %-d, %Y"),
            end.format("%b %-d, %Y")
        )
    }
}

/// `1h30min`, `2h`, `45min`; `0min` when nothing is set.
pub fn format_duration(duration: Option<EventDuration>) -> String {
    let EventDuration { hours, minutes } = duration.unwrap_or_default();
    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if minutes > 0 {
        out.push_str(&format!("{minutes}min"));
    }
    if out.is_empty() {
        out.push_str("0min");
    }
    out
}

/// `18:00`, or `18:00 – 19:30` when an end is known.
pub fn format_time_range<Tz>(start: &DateTime<Utc>, end: Option<&DateTime<Utc>>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let start = start.with_timezone(tz).format("%H:%M").to_string();
    match end {
        Some(end) => format!("{start} – {}", end.with_timezone(tz).format("%H:%M")),
        None => start,
    }
}

/// Day heading in the events view, e.g. `Thursday, June 4`.
pub fn format_day_heading(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}

/// Release day as shown on game cards, e.g. `02 March 2026`.
pub fn format_release_day<Tz>(instant: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    instant.with_timezone(tz).format("%d %B %Y").to_string()
}

/// Midnight UTC of a calendar date, the instant stored for form-entered days.
pub fn utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Weekday};

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn week_starts_on_monday_for_every_day() {
        let mut day = ymd(2025, 12, 1);
        for _ in 0..120 {
            let start = start_of_week(day);
            assert_eq!(start.weekday(), Weekday::Mon);
            assert!(start <= day);
            assert!(day < start + Days::new(7));
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn sunday_belongs_to_previous_monday() {
        assert_eq!(start_of_week(ymd(2026, 3, 8)), ymd(2026, 3, 2));
    }

    #[test]
    fn week_start_uses_the_local_calendar_date() {
        let instant = Utc.with_ymd_and_hms(2026, 3, 1, 23, 30, 0).unwrap();
        let paris = FixedOffset::east_opt(3600).unwrap();
        // Sunday 23:30 UTC is already Monday in Paris.
        assert_eq!(week_start_of(&instant, &Utc), ymd(2026, 2, 23));
        assert_eq!(week_start_of(&instant, &paris), ymd(2026, 3, 2));
    }

    #[test]
    fn formats_week_ranges() {
        assert_eq!(format_week_range(ymd(2026, 3, 2)), "Mar 2 – Mar 8");
        assert_eq!(format_week_range(ymd(2026, 3, 30)), "Mar 30 – Apr 5");
        assert_eq!(
            format_week_range(ymd(2025, 12, 29)),
            "Dec 29, 2025 – Jan 4, 2026"
        );
    }

    #[test]
    fn formats_durations() {
        let duration = |hours, minutes| Some(EventDuration { hours, minutes });
        assert_eq!(format_duration(duration(1, 30)), "1h30min");
        assert_eq!(format_duration(duration(2, 0)), "2h");
        assert_eq!(format_duration(duration(0, 45)), "45min");
        assert_eq!(format_duration(duration(0, 0)), "0min");
        assert_eq!(format_duration(None), "0min");
    }

    #[test]
    fn formats_time_ranges() {
        let start = Utc.with_ymd_and_hms(2026, 6, 4, 18, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 6, 4, 19, 30, 0).unwrap();
        assert_eq!(format_time_range(&start, None, &Utc), "18:00");
        assert_eq!(format_time_range(&start, Some(&end), &Utc), "18:00 – 19:30");
    }

    #[test]
    fn day_difference_truncates_to_dates() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 23, 0, 0).unwrap();
        let release = Utc.with_ymd_and_hms(2026, 1, 2, 1, 0, 0).unwrap();
        assert_eq!(day_difference(&release, &now, &Utc), 1);
        assert_eq!(day_difference(&now, &release, &Utc), -1);
    }
}
