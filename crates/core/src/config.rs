//! Application configuration.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

/// Directory name under the user's config directory.
pub const APP_DIR: &str = "release-radar";

const DEFAULT_LEAKS_URL: &str = "https://www.reddit.com/r/GamingLeaksAndRumours/new.json";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

/// Credentials of an account allowed to edit the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminAccount {
    /// Sign-in email.
    pub email: String,
    /// Sign-in password.
    pub password: String,
}

/// Runtime settings for the catalog and its feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// iCalendar feed with industry events. `webcal://` is accepted.
    #[serde(default)]
    pub calendar_url: String,
    /// Subreddit listing used by the leaks view.
    #[serde(default = "default_leaks_url")]
    pub leaks_url: String,
    /// Directory holding the document store collections.
    #[serde(default = "default_data_root")]
    pub data_root: PathBuf,
    /// Key-value file holding persisted UI preferences.
    #[serde(default = "default_preferences_path")]
    pub preferences_path: PathBuf,
    /// Upper bound for every remote fetch.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Accounts allowed to sign in as admin.
    #[serde(default)]
    pub admins: Vec<AdminAccount>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            calendar_url: String::new(),
            leaks_url: default_leaks_url(),
            data_root: default_data_root(),
            preferences_path: default_preferences_path(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            admins: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file, then `RADAR_*` environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration from an explicit file path (which may be absent).
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = config::Config::builder()
            .add_source(config::File::from(path.to_path_buf()).required(false))
            .add_source(config::Environment::with_prefix("RADAR"))
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        let config: AppConfig = settings
            .try_deserialize()
            .context("failed to decode configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that would make the application unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.leaks_url.trim().is_empty() {
            return Err(ConfigError::MissingField("leaks_url"));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "fetch_timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.admins.iter().any(|admin| admin.email.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                field: "admins",
                reason: "every account needs an email".to_string(),
            });
        }
        Ok(())
    }

    /// Timeout applied to feed requests.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Whether an events calendar is configured.
    pub fn has_calendar(&self) -> bool {
        !self.calendar_url.trim().is_empty()
    }
}

/// Location of the configuration file.
pub fn config_path() -> PathBuf {
    app_dir().join("config.toml")
}

/// Write a default configuration file if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    let path = config_path();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let serialized = render_default_config(&AppConfig::default());
    fs::write(&path, serialized)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote default configuration");
    Ok(())
}

fn render_default_config(config: &AppConfig) -> String {
    format!(
        "# Release Radar configuration\n\
         calendar_url = \"\"\n\
         leaks_url = \"{}\"\n\
         data_root = \"{}\"\n\
         preferences_path = \"{}\"\n\
         fetch_timeout_secs = {}\n\
         \n\
         # [[admins]]\n\
         # email = \"admin@example.com\"\n\
         # password = \"change-me\"\n",
        config.leaks_url,
        escape_path(&config.data_root),
        escape_path(&config.preferences_path),
        config.fetch_timeout_secs,
    )
}

fn escape_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "\\\\")
}

fn app_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn default_leaks_url() -> String {
    DEFAULT_LEAKS_URL.to_string()
}

fn default_data_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("store")
}

fn default_preferences_path() -> PathBuf {
    app_dir().join("preferences.json")
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_file_values_over_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
calendar_url = "webcal://example.com/events.ics"
fetch_timeout_secs = 5

[[admins]]
email = "admin@example.com"
password = "secret"
"#,
        )?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.calendar_url, "webcal://example.com/events.ics");
        assert_eq!(config.fetch_timeout(), Duration::from_secs(5));
        assert_eq!(config.leaks_url, DEFAULT_LEAKS_URL);
        assert_eq!(config.admins.len(), 1);
        assert!(config.has_calendar());
        Ok(())
    }

    #[test]
    fn missing_file_uses_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("absent.toml"))?;
        assert!(!config.has_calendar());
        assert_eq!(config.fetch_timeout_secs, DEFAULT_FETCH_TIMEOUT_SECS);
        Ok(())
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = AppConfig {
            fetch_timeout_secs: 0,
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "fetch_timeout_secs", .. })
        ));
    }

    #[test]
    fn default_config_renders_loadable_toml() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, render_default_config(&AppConfig::default()))?;
        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.leaks_url, DEFAULT_LEAKS_URL);
        assert!(config.admins.is_empty());
        Ok(())
    }
}
