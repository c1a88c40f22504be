use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Opaque identifier assigned by the store on creation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    /// Wrap an identifier produced by the store.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A developer or editor credit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Studio or publisher name.
    #[serde(default)]
    pub name: String,
    /// Website of the company.
    #[serde(default)]
    pub link: String,
}

impl Company {
    /// Build a credit from its parts.
    pub fn new(name: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
        }
    }

    /// Both fields are filled in.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.link.trim().is_empty()
    }
}

/// Release date of a game: an absolute day or a free-form label such as `Q3 2026`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseDate {
    /// Seconds since the Unix epoch.
    Timestamp(i64),
    /// `TBA`, `TBA <year>`, `Q<n> <year>` or any other text.
    Label(String),
}

impl ReleaseDate {
    /// Absolute release instant, if the date is not a label.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            ReleaseDate::Timestamp(seconds) => Utc.timestamp_opt(*seconds, 0).single(),
            ReleaseDate::Label(_) => None,
        }
    }

    /// Whether this is an absolute timestamp.
    pub fn is_timestamp(&self) -> bool {
        matches!(self, ReleaseDate::Timestamp(_))
    }
}

impl From<DateTime<Utc>> for ReleaseDate {
    fn from(value: DateTime<Utc>) -> Self {
        ReleaseDate::Timestamp(value.timestamp())
    }
}

impl Serialize for ReleaseDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ReleaseDate::Timestamp(seconds) => serializer.serialize_i64(*seconds),
            ReleaseDate::Label(label) => serializer.serialize_str(label),
        }
    }
}

impl<'de> Deserialize<'de> for ReleaseDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawTimeValue::deserialize(deserializer)? {
            RawTimeValue::Label(label) => Ok(ReleaseDate::Label(label)),
            other => other
                .seconds()
                .map(ReleaseDate::Timestamp)
                .ok_or_else(|| de::Error::custom("release date out of range")),
        }
    }
}

/// Time values as they appear in stored documents.
///
/// Backend exports encode timestamps as `{ "seconds": .., "nanoseconds": .. }`
/// while documents written locally use plain integers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawTimeValue {
    Seconds(i64),
    Fractional(f64),
    Backend {
        seconds: i64,
        #[serde(default)]
        #[allow(dead_code)]
        nanoseconds: i64,
    },
    Label(String),
}

impl RawTimeValue {
    pub(crate) fn seconds(&self) -> Option<i64> {
        match self {
            RawTimeValue::Seconds(seconds) => Some(*seconds),
            RawTimeValue::Fractional(value) if value.is_finite() => Some(value.floor() as i64),
            RawTimeValue::Fractional(_) => None,
            RawTimeValue::Backend { seconds, .. } => Some(*seconds),
            RawTimeValue::Label(text) => DateTime::parse_from_rfc3339(text.trim())
                .ok()
                .map(|value| value.timestamp()),
        }
    }
}

/// Supported gaming platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// Windows, Linux and macOS.
    #[serde(rename = "pc")]
    Pc,
    /// PlayStation.
    #[serde(rename = "ps")]
    PlayStation,
    /// Xbox Series.
    #[serde(rename = "xbox")]
    Xbox,
    /// Nintendo Switch.
    #[serde(rename = "switch")]
    Switch,
    /// Nintendo Switch 2.
    #[serde(rename = "switch_2")]
    Switch2,
}

impl Platform {
    /// Every platform in display order.
    pub const ALL: [Platform; 5] = [
        Platform::Pc,
        Platform::PlayStation,
        Platform::Xbox,
        Platform::Switch,
        Platform::Switch2,
    ];

    /// Storage key.
    pub fn key(self) -> &'static str {
        match self {
            Platform::Pc => "pc",
            Platform::PlayStation => "ps",
            Platform::Xbox => "xbox",
            Platform::Switch => "switch",
            Platform::Switch2 => "switch_2",
        }
    }

    /// Human readable name.
    pub fn label(self) -> &'static str {
        match self {
            Platform::Pc => "PC",
            Platform::PlayStation => "PlayStation",
            Platform::Xbox => "Xbox Series",
            Platform::Switch => "Nintendo Switch",
            Platform::Switch2 => "Nintendo Switch 2",
        }
    }

    /// Parse a storage key, ignoring case.
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|platform| platform.key().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Platform availability flags. A missing flag reads as disabled.
#[derive(Debug, Clone, Default)]
pub struct Platforms(BTreeMap<Platform, bool>);

impl PartialEq for Platforms {
    fn eq(&self, other: &Self) -> bool {
        Platform::ALL
            .into_iter()
            .all(|platform| self.is_enabled(platform) == other.is_enabled(platform))
    }
}

impl Eq for Platforms {}

impl Platforms {
    /// Flags with the given platforms enabled.
    pub fn with(enabled: impl IntoIterator<Item = Platform>) -> Self {
        Self(enabled.into_iter().map(|platform| (platform, true)).collect())
    }

    /// Whether the platform is enabled.
    pub fn is_enabled(&self, platform: Platform) -> bool {
        self.0.get(&platform).copied().unwrap_or(false)
    }

    /// Set a single flag.
    pub fn set(&mut self, platform: Platform, enabled: bool) {
        self.0.insert(platform, enabled);
    }

    /// Flip a single flag.
    pub fn toggle(&mut self, platform: Platform) {
        let enabled = self.is_enabled(platform);
        self.set(platform, !enabled);
    }

    /// Enabled platforms in display order.
    pub fn enabled(&self) -> impl Iterator<Item = Platform> + '_ {
        self.0
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(platform, _)| *platform)
    }

    /// At least one platform is enabled.
    pub fn any_enabled(&self) -> bool {
        self.0.values().any(|enabled| *enabled)
    }
}

impl Serialize for Platforms {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let flags: BTreeMap<&str, bool> = Platform::ALL
            .into_iter()
            .map(|platform| (platform.key(), self.is_enabled(platform)))
            .collect();
        flags.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Platforms {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawPlatforms {
            Flags(BTreeMap<String, bool>),
            List(Vec<String>),
        }

        // Unknown keys are dropped rather than failing the whole document.
        let flags = match RawPlatforms::deserialize(deserializer)? {
            RawPlatforms::Flags(map) => map
                .into_iter()
                .filter_map(|(key, enabled)| Platform::from_key(&key).map(|p| (p, enabled)))
                .collect(),
            RawPlatforms::List(keys) => keys
                .iter()
                .filter_map(|key| Platform::from_key(key))
                .map(|platform| (platform, true))
                .collect(),
        };
        Ok(Platforms(flags))
    }
}

/// Review scores. `0` means "not rated yet".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratings {
    /// Aggregated critics score, 0 to 100.
    #[serde(default)]
    pub critics: u8,
    /// Aggregated players score, 0 to 100.
    #[serde(default)]
    pub players: u8,
    /// Page with the aggregated scores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Ratings {
    /// Critics score for display.
    pub fn display_critics(&self) -> String {
        display_score(self.critics)
    }

    /// Players score for display.
    pub fn display_players(&self) -> String {
        display_score(self.players)
    }
}

fn display_score(score: u8) -> String {
    if score == 0 {
        "/".to_string()
    } else {
        score.to_string()
    }
}

/// Stored fields of a game entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDocument {
    /// Full title.
    pub name: String,
    /// Official website.
    pub link: String,
    /// Release day or label.
    #[serde(rename = "release_date", alias = "releaseDate")]
    pub release_date: ReleaseDate,
    /// Developer credits.
    #[serde(default)]
    pub developers: Vec<Company>,
    /// Publisher credits.
    #[serde(default)]
    pub editors: Vec<Company>,
    /// Platform availability.
    #[serde(default)]
    pub platforms: Platforms,
    /// Review scores.
    #[serde(default)]
    pub ratings: Ratings,
}

/// A catalog entry as delivered by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Store identifier.
    pub id: GameId,
    /// Stored fields.
    #[serde(flatten)]
    pub document: GameDocument,
}

impl Game {
    /// Attach an identifier to a document.
    pub fn new(id: GameId, document: GameDocument) -> Self {
        Self { id, document }
    }

    /// Shortcut to the title.
    pub fn name(&self) -> &str {
        &self.document.name
    }

    /// Shortcut to the release date.
    pub fn release_date(&self) -> &ReleaseDate {
        &self.document.release_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_every_release_date_shape() {
        let stored: ReleaseDate = serde_json::from_value(json!(1_772_323_200)).unwrap();
        assert_eq!(stored, ReleaseDate::Timestamp(1_772_323_200));

        let backend: ReleaseDate =
            serde_json::from_value(json!({ "seconds": 1_772_323_200, "nanoseconds": 5 })).unwrap();
        assert_eq!(backend, ReleaseDate::Timestamp(1_772_323_200));

        let label: ReleaseDate = serde_json::from_value(json!("Q3 2026")).unwrap();
        assert_eq!(label, ReleaseDate::Label("Q3 2026".to_string()));
    }

    #[test]
    fn platforms_accept_legacy_lists_and_unknown_keys() {
        let legacy: Platforms = serde_json::from_value(json!(["pc", "PS"])).unwrap();
        assert!(legacy.is_enabled(Platform::Pc));
        assert!(legacy.is_enabled(Platform::PlayStation));
        assert!(!legacy.is_enabled(Platform::Xbox));

        let flags: Platforms =
            serde_json::from_value(json!({ "switch_2": true, "xbox": false, "dreamcast": true }))
                .unwrap();
        assert_eq!(flags.enabled().collect::<Vec<_>>(), vec![Platform::Switch2]);
        assert_eq!(flags, Platforms::with([Platform::Switch2]));
    }

    #[test]
    fn game_round_trips_through_store_layout() {
        let value = json!({
            "id": "abc",
            "name": "Hollow Knight: Silksong",
            "link": "https://hollowknightsilksong.com",
            "release_date": "TBA",
            "developers": [{ "name": "Team Cherry", "link": "https://teamcherry.com.au" }],
            "editors": [],
            "platforms": { "pc": true, "switch": true },
            "ratings": { "critics": 0, "players": 0 }
        });
        let game: Game = serde_json::from_value(value).unwrap();
        assert_eq!(game.id.as_str(), "abc");
        assert_eq!(game.release_date(), &ReleaseDate::Label("TBA".to_string()));
        assert_eq!(game.document.ratings.display_critics(), "/");

        let encoded = serde_json::to_value(&game).unwrap();
        assert_eq!(encoded["platforms"]["pc"], json!(true));
        assert_eq!(encoded["platforms"]["xbox"], json!(false));
        assert_eq!(encoded["release_date"], json!("TBA"));
    }
}
