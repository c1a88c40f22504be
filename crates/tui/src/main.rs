mod app;
mod feeds;

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    sync::Arc,
};

use radar_core::{
    config::{self, AppConfig},
    prefs::PreferenceStore,
    store::{DocumentStore, LocalAuth, StoreWatcher},
};
use tracing::{debug, info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    info!(data_root = %config.data_root.display(), "starting release radar");

    let store = Arc::new(DocumentStore::open(&config.data_root)?);
    let _watcher = match StoreWatcher::spawn(Arc::clone(&store)) {
        Ok(watcher) => Some(watcher),
        Err(err) => {
            warn!(%err, "external changes to the store will not be picked up");
            None
        }
    };
    let auth = Arc::new(LocalAuth::new(config.admins.clone()));
    let preferences = PreferenceStore::new(&config.preferences_path);
    debug!(path = %preferences.path().display(), "filter preferences file");

    let (feeds, feed_rx) = feeds::Feeds::new(&config, Arc::clone(&store));
    feeds.refresh_events();
    feeds.refresh_leaks();

    let mut app = app::RadarApp::new(store, auth, preferences, feeds);
    app.attach_feeds(feed_rx);
    app.run().await
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("radar.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // The terminal belongs to the UI, so logs only go to the file.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
