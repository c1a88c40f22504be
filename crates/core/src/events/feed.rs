use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::{
    error::FeedError,
    models::{Event, EventSource},
};

/// Remote iCalendar feed of industry events.
#[derive(Debug, Clone)]
pub struct CalendarFeed {
    client: reqwest::Client,
    url: String,
}

impl CalendarFeed {
    /// Build a feed client. `webcal://` URLs are rewritten to `https://`.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: normalize_feed_url(url),
        })
    }

    /// URL actually requested.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download and parse the feed, interpreting floating times in the local zone.
    pub async fn fetch(&self) -> Result<Vec<Event>, FeedError> {
        debug!(url = %self.url, "fetching calendar feed");
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let events = parse_ical(&body, &Local)?;
        info!(count = events.len(), "calendar feed loaded");
        Ok(events)
    }
}

/// Replace a leading `webcal://` scheme with `https://`.
pub fn normalize_feed_url(url: &str) -> String {
    let trimmed = url.trim();
    match trimmed.get(..9) {
        Some(scheme) if scheme.eq_ignore_ascii_case("webcal://") => {
            format!("https://{}", &trimmed[9..])
        }
        _ => trimmed.to_string(),
    }
}

/// Parse an iCalendar document into feed events sorted by start.
///
/// Floating times and times carrying a `TZID` are read in `tz`.
pub fn parse_ical<Tz: TimeZone>(text: &str, tz: &Tz) -> Result<Vec<Event>, FeedError> {
    let lines = unfold_lines(text);
    if !lines
        .iter()
        .any(|line| line.eq_ignore_ascii_case("BEGIN:VCALENDAR"))
    {
        return Err(FeedError::Malformed("missing BEGIN:VCALENDAR".to_string()));
    }

    let mut events = Vec::new();
    let mut current: Option<RawEvent> = None;
    for line in &lines {
        let Some(property) = Property::parse(line) else {
            continue;
        };
        match (property.name.as_str(), property.value.as_str()) {
            ("BEGIN", value) if value.eq_ignore_ascii_case("VEVENT") => {
                current = Some(RawEvent::default());
            }
            ("END", value) if value.eq_ignore_ascii_case("VEVENT") => {
                if let Some(raw) = current.take() {
                    match raw.into_event(tz) {
                        Some(event) => events.push(event),
                        None => warn!("skipping calendar event without a usable DTSTART"),
                    }
                }
            }
            _ => {
                if let Some(raw) = current.as_mut() {
                    raw.apply(property);
                }
            }
        }
    }

    events.sort_by_key(|event| event.start);
    Ok(events)
}

/// Join RFC 5545 continuation lines (leading space or tab) onto their predecessor.
fn unfold_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in text.lines() {
        let raw = raw.trim_end_matches('\r');
        if let Some(rest) = raw.strip_prefix(' ').or_else(|| raw.strip_prefix('\t')) {
            if let Some(last) = lines.last_mut() {
                last.push_str(rest);
                continue;
            }
        }
        if !raw.is_empty() {
            lines.push(raw.to_string());
        }
    }
    lines
}

#[derive(Debug)]
struct Property {
    name: String,
    params: Vec<(String, String)>,
    value: String,
}

impl Property {
    fn parse(line: &str) -> Option<Self> {
        let colon = find_value_separator(line)?;
        let (head, value) = (&line[..colon], &line[colon + 1..]);
        let mut parts = head.split(';');
        let name = parts.next()?.trim().to_ascii_uppercase();
        let params = parts
            .filter_map(|param| {
                let (key, value) = param.split_once('=')?;
                Some((
                    key.trim().to_ascii_uppercase(),
                    value.trim().trim_matches('"').to_string(),
                ))
            })
            .collect();
        Some(Self {
            name,
            params,
            value: value.to_string(),
        })
    }

    fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

// Parameter values may be quoted and contain colons, e.g. TZID="Europe/Paris:x".
fn find_value_separator(line: &str) -> Option<usize> {
    let mut quoted = false;
    for (idx, ch) in line.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            ':' if !quoted => return Some(idx),
            _ => {}
        }
    }
    None
}

#[derive(Debug, Default)]
struct RawEvent {
    summary: Option<String>,
    start: Option<Property>,
    end: Option<Property>,
}

impl RawEvent {
    fn apply(&mut self, property: Property) {
        match property.name.as_str() {
            "SUMMARY" => self.summary = Some(unescape_text(&property.value)),
            "DTSTART" => self.start = Some(property),
            "DTEND" => self.end = Some(property),
            _ => {}
        }
    }

    fn into_event<Tz: TimeZone>(self, tz: &Tz) -> Option<Event> {
        let (start, all_day) = parse_date_value(self.start.as_ref()?, tz)?;
        let end = self
            .end
            .as_ref()
            .and_then(|property| parse_date_value(property, tz))
            .map(|(end, _)| end);
        if let Some(end) = end.filter(|end| *end < start) {
            warn!(%start, %end, "calendar event ends before it starts; dropping end");
        }

        let mut event = Event::new(self.summary.unwrap_or_default(), start, EventSource::Ical)
            .with_end(end);
        event.all_day = all_day;
        Some(event)
    }
}

static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{8}$").expect("invalid date regex"));
static DATE_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{8}T\d{6})(Z?)$").expect("invalid date-time regex"));

fn parse_date_value<Tz: TimeZone>(property: &Property, tz: &Tz) -> Option<(DateTime<Utc>, bool)> {
    let value = property.value.trim();
    let date_only = property
        .param("VALUE")
        .map(|kind| kind.eq_ignore_ascii_case("DATE"))
        .unwrap_or(false)
        || DATE_RE.is_match(value);

    if date_only {
        let date = NaiveDate::parse_from_str(value.get(..8)?, "%Y%m%d").ok()?;
        let midnight = date.and_time(chrono::NaiveTime::MIN);
        return to_utc(midnight, tz).map(|start| (start, true));
    }

    let caps = DATE_TIME_RE.captures(value)?;
    let naive = NaiveDateTime::parse_from_str(caps.get(1)?.as_str(), "%Y%m%dT%H%M%S").ok()?;
    let is_utc = caps.get(2).map(|m| !m.as_str().is_empty()).unwrap_or(false);
    if is_utc {
        Some((naive.and_utc(), false))
    } else {
        if let Some(zone) = property.param("TZID") {
            debug!(zone, "reading TZID time in the local zone");
        }
        to_utc(naive, tz).map(|start| (start, false))
    }
}

fn to_utc<Tz: TimeZone>(naive: NaiveDateTime, tz: &Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|value| value.with_timezone(&Utc))
}

fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
