//! Persisted list filters.
//!
//! Preferences live in a small JSON object keyed by name so other UI state
//! can share the file later. Only the `gameFilters` entry is used today.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::{
    catalog::{GameFilter, ReleaseStatus},
    models::Platform,
};

/// Key holding the filter record.
pub const FILTERS_KEY: &str = "gameFilters";

/// Platform selection and release-status toggle restored between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPreferences {
    /// Platforms that must all be enabled.
    #[serde(default, deserialize_with = "lenient_platforms")]
    pub selected_platforms: BTreeSet<Platform>,
    /// `Some(true)` upcoming only, `Some(false)` released only.
    #[serde(default)]
    pub show_only_upcoming: Option<bool>,
}

impl FilterPreferences {
    /// Capture the persisted parts of a filter.
    pub fn from_filter(filter: &GameFilter) -> Self {
        Self {
            selected_platforms: filter.platforms.clone(),
            show_only_upcoming: ReleaseStatus::to_flag(filter.release_status),
        }
    }

    /// Copy the preferences into a filter, keeping its search text and date kind.
    pub fn apply_to(&self, filter: &mut GameFilter) {
        filter.platforms = self.selected_platforms.clone();
        filter.release_status = ReleaseStatus::from_flag(self.show_only_upcoming);
    }

    /// Whether any filter is active, used to open the filter bar on start.
    pub fn is_active(&self) -> bool {
        !self.selected_platforms.is_empty() || self.show_only_upcoming.is_some()
    }
}

// Older records stored upper-cased keys; unknown entries are dropped.
fn lenient_platforms<'de, D>(deserializer: D) -> Result<BTreeSet<Platform>, D::Error>
where
    D: Deserializer<'de>,
{
    let keys = Vec::<String>::deserialize(deserializer)?;
    Ok(keys.iter().filter_map(|key| Platform::from_key(key)).collect())
}

/// JSON key-value file holding UI preferences.
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Store backed by the given file, created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved filters, or defaults when absent or unreadable.
    pub fn load(&self) -> FilterPreferences {
        match self.read_entries() {
            Ok(entries) => entries
                .get(FILTERS_KEY)
                .cloned()
                .map(|value| {
                    serde_json::from_value(value).unwrap_or_else(|err| {
                        warn!(%err, "ignoring malformed filter preferences");
                        FilterPreferences::default()
                    })
                })
                .unwrap_or_default(),
            Err(err) => {
                warn!(error = %format!("{err:#}"), "failed to read preferences");
                FilterPreferences::default()
            }
        }
    }

    /// Persist the filters, keeping any other keys in the file.
    pub fn save(&self, preferences: &FilterPreferences) -> Result<()> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.insert(
            FILTERS_KEY.to_string(),
            serde_json::to_value(preferences).context("failed to encode filter preferences")?,
        );
        self.write_entries(&entries)
    }

    /// Forget the saved filters.
    pub fn clear(&self) -> Result<()> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(_) => return Ok(()),
        };
        if entries.remove(FILTERS_KEY).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse {}", self.path.display()))
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let serialized =
            serde_json::to_string_pretty(entries).context("failed to encode preferences")?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DateKind;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let store = PreferenceStore::new(dir.path().join("prefs.json"));
        assert_eq!(store.load(), FilterPreferences::default());
        assert!(!store.load().is_active());
    }

    #[test]
    fn saves_and_restores_filters() {
        let dir = tempdir().unwrap();
        let store = PreferenceStore::new(dir.path().join("nested/prefs.json"));
        let preferences = FilterPreferences {
            selected_platforms: [Platform::Pc, Platform::Switch2].into_iter().collect(),
            show_only_upcoming: Some(true),
        };
        store.save(&preferences).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw[FILTERS_KEY]["selectedPlatforms"][1], "switch_2");
        assert_eq!(raw[FILTERS_KEY]["showOnlyUpcoming"], true);
        assert_eq!(store.load(), preferences);
    }

    #[test]
    fn clear_keeps_unrelated_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(
            &path,
            r#"{"theme":"dark","gameFilters":{"selectedPlatforms":["PC","SWITCH_2","N64"],"showOnlyUpcoming":null}}"#,
        )
        .unwrap();
        let store = PreferenceStore::new(&path);

        let restored = store.load();
        assert_eq!(
            restored.selected_platforms,
            [Platform::Pc, Platform::Switch2].into_iter().collect()
        );
        assert_eq!(restored.show_only_upcoming, None);

        store.clear().unwrap();
        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert!(raw.get(FILTERS_KEY).is_none());
        assert_eq!(store.load(), FilterPreferences::default());
    }

    #[test]
    fn corrupt_file_degrades_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(PreferenceStore::new(path).load(), FilterPreferences::default());
    }

    #[test]
    fn applies_to_filter_without_touching_search() {
        let mut filter = GameFilter {
            search: "zelda".to_string(),
            date_kind: DateKind::Labelled,
            ..GameFilter::default()
        };
        let preferences = FilterPreferences {
            selected_platforms: [Platform::Xbox].into_iter().collect(),
            show_only_upcoming: Some(false),
        };
        preferences.apply_to(&mut filter);
        assert_eq!(filter.search, "zelda");
        assert_eq!(filter.release_status, Some(ReleaseStatus::Released));
        assert_eq!(FilterPreferences::from_filter(&filter), preferences);
    }
}
