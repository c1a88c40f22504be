use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use chrono::Utc;
use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    error::StoreError,
    models::{Game, GameDocument, GameId},
};

use super::{
    CustomEventDocument, CustomEventRepository, GameRepository, SubscriberRegistry, Subscription,
};

/// File holding the games collection.
pub const GAMES_FILE: &str = "games.json";
/// File holding the custom events collection.
pub const CUSTOM_EVENTS_FILE: &str = "custom_events.json";

/// Document store keeping each collection as a JSON object keyed by id.
///
/// Writes replace the whole file through a temporary file and rename. The last
/// writer wins; there is no conflict detection.
pub struct DocumentStore {
    root: PathBuf,
    write_lock: Mutex<()>,
    subscribers: SubscriberRegistry<Vec<Game>>,
    id_counter: AtomicU64,
}

impl DocumentStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        info!(root = %root.display(), "document store opened");
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
            subscribers: SubscriberRegistry::new(),
            id_counter: AtomicU64::new(0),
        })
    }

    /// Directory holding the collection files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Push a fresh snapshot to subscribers, e.g. after an external write.
    pub fn republish(&self) -> Result<(), StoreError> {
        let games = self.snapshot()?;
        self.subscribers.publish(&games);
        Ok(())
    }

    /// Number of open subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn games_path(&self) -> PathBuf {
        self.root.join(GAMES_FILE)
    }

    fn next_id(&self) -> String {
        let counter = self.id_counter.fetch_add(1, Ordering::Relaxed);
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        format!("{nanos:x}{counter:04x}")
    }

    fn mutate_games<R>(
        &self,
        apply: impl FnOnce(&mut BTreeMap<String, Value>) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let (result, committed) = {
            let _guard = self.write_lock.lock();
            let path = self.games_path();
            let mut games: BTreeMap<String, Value> = read_collection(&path)?;
            let result = apply(&mut games)?;
            write_collection(&path, &games)?;
            (result, games)
        };
        // Subscribers get the collection just written, without reading it back.
        self.subscribers.publish(&games_from(committed));
        Ok(result)
    }
}

impl GameRepository for DocumentStore {
    fn create(&self, document: GameDocument) -> Result<GameId, StoreError> {
        let path = self.games_path();
        let value = encode(&path, &document)?;
        let id = self.next_id();
        self.mutate_games(|games| {
            games.insert(id.clone(), value);
            Ok(())
        })?;
        info!(id = %id, name = %document.name, "game created");
        Ok(GameId::new(id))
    }

    fn update(&self, id: &GameId, document: GameDocument) -> Result<(), StoreError> {
        let path = self.games_path();
        let value = encode(&path, &document)?;
        self.mutate_games(|games| match games.get_mut(id.as_str()) {
            Some(existing) => {
                *existing = value;
                Ok(())
            }
            None => Err(StoreError::NotFound(id.to_string())),
        })?;
        info!(id = %id, "game updated");
        Ok(())
    }

    fn delete(&self, id: &GameId) -> Result<(), StoreError> {
        self.mutate_games(|games| {
            games
                .remove(id.as_str())
                .map(|_| ())
                .ok_or_else(|| StoreError::NotFound(id.to_string()))
        })?;
        info!(id = %id, "game deleted");
        Ok(())
    }

    fn snapshot(&self) -> Result<Vec<Game>, StoreError> {
        let raw: BTreeMap<String, Value> = read_collection(&self.games_path())?;
        Ok(games_from(raw))
    }

    fn subscribe(&self) -> Result<Subscription<Vec<Game>>, StoreError> {
        let initial = self.snapshot()?;
        Ok(self.subscribers.subscribe(initial))
    }
}

impl CustomEventRepository for DocumentStore {
    fn read_all_custom_events(&self) -> Result<Vec<CustomEventDocument>, StoreError> {
        let raw: BTreeMap<String, Value> = read_collection(&self.root.join(CUSTOM_EVENTS_FILE))?;
        Ok(decode_documents::<CustomEventDocument>(raw, "custom event")
            .into_values()
            .collect())
    }
}

fn games_from(raw: BTreeMap<String, Value>) -> Vec<Game> {
    decode_documents::<GameDocument>(raw, "game")
        .into_iter()
        .map(|(id, document)| Game::new(GameId::new(id), document))
        .collect()
}

fn decode_documents<T: DeserializeOwned>(
    raw: BTreeMap<String, Value>,
    kind: &str,
) -> BTreeMap<String, T> {
    raw.into_iter()
        .filter_map(|(id, value)| match serde_json::from_value(value) {
            Ok(document) => Some((id, document)),
            Err(err) => {
                warn!(%id, %err, "skipping undecodable {kind} document");
                None
            }
        })
        .collect()
}

fn encode<T: Serialize>(path: &Path, document: &T) -> Result<Value, StoreError> {
    serde_json::to_value(document).map_err(|source| StoreError::Serialization {
        path: path.to_path_buf(),
        source,
    })
}

fn read_collection(path: &Path) -> Result<BTreeMap<String, Value>, StoreError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(&content).map_err(|source| StoreError::Serialization {
        path: path.to_path_buf(),
        source,
    })
}

fn write_collection(path: &Path, collection: &BTreeMap<String, Value>) -> Result<(), StoreError> {
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let serialized =
        serde_json::to_vec_pretty(collection).map_err(|source| StoreError::Serialization {
            path: path.to_path_buf(),
            source,
        })?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    temp.write_all(&serialized).map_err(io_err)?;
    temp.persist(path).map_err(|err| io_err(err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Company, Platform, Platforms, Ratings, ReleaseDate};
    use anyhow::Result;
    use serde_json::json;
    use tempfile::tempdir;

    fn document(name: &str) -> GameDocument {
        GameDocument {
            name: name.to_string(),
            link: "https://example.com".to_string(),
            release_date: ReleaseDate::Label("TBA 2027".to_string()),
            developers: vec![Company::new("Studio", "https://studio.example.com")],
            editors: vec![Company::new("Publisher", "https://publisher.example.com")],
            platforms: Platforms::with([Platform::Pc]),
            ratings: Ratings::default(),
        }
    }

    #[test]
    fn create_update_delete_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let store = DocumentStore::open(dir.path())?;

        let id = store.create(document("Alpha"))?;
        let games = store.snapshot()?;
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].id, id);

        let mut changed = document("Alpha Remastered");
        changed.release_date = ReleaseDate::Timestamp(1_780_000_000);
        store.update(&id, changed.clone())?;
        assert_eq!(store.snapshot()?[0].document, changed);

        store.delete(&id)?;
        assert!(store.snapshot()?.is_empty());
        Ok(())
    }

    #[test]
    fn missing_documents_are_reported() -> Result<()> {
        let dir = tempdir()?;
        let store = DocumentStore::open(dir.path())?;
        let ghost = GameId::new("ghost");
        assert!(matches!(
            store.update(&ghost, document("Ghost")),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.delete(&ghost), Err(StoreError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn subscribers_receive_full_snapshots() -> Result<()> {
        let dir = tempdir()?;
        let store = DocumentStore::open(dir.path())?;
        store.create(document("Alpha"))?;

        let mut subscription = store.subscribe()?;
        assert_eq!(subscription.next().await.map(|games| games.len()), Some(1));

        store.create(document("Beta"))?;
        let snapshot = subscription.next().await.unwrap_or_default();
        let mut names: Vec<_> = snapshot.iter().map(|game| game.name().to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["Alpha", "Beta"]);

        subscription.dispose();
        assert_eq!(store.subscriber_count(), 0);
        store.create(document("Gamma"))?;
        Ok(())
    }

    #[tokio::test]
    async fn committed_write_is_published_and_reported_ok() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join(GAMES_FILE),
            serde_json::to_string(&json!({ "bad": { "name": 42 } }))?,
        )?;
        let store = DocumentStore::open(dir.path())?;
        let mut subscription = store.subscribe()?;
        assert_eq!(subscription.next().await.map(|games| games.len()), Some(0));

        let id = store.create(document("Alpha"))?;
        let published = subscription.next().await.unwrap_or_default();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].id, id);

        let raw: Value = serde_json::from_str(&fs::read_to_string(dir.path().join(GAMES_FILE))?)?;
        assert!(raw.get("bad").is_some());
        assert!(raw.get(id.as_str()).is_some());
        Ok(())
    }

    #[test]
    fn undecodable_documents_are_skipped() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join(GAMES_FILE),
            serde_json::to_string(&json!({
                "good": serde_json::to_value(document("Good"))?,
                "bad": { "name": 42 }
            }))?,
        )?;
        let store = DocumentStore::open(dir.path())?;
        let games = store.snapshot()?;
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].id.as_str(), "good");
        Ok(())
    }

    #[test]
    fn reads_custom_events() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join(CUSTOM_EVENTS_FILE),
            serde_json::to_string(&json!({
                "e1": { "title": "Launch stream", "start": { "seconds": 1_780_000_000, "nanoseconds": 0 } },
                "e2": { "title": "Missing start" }
            }))?,
        )?;
        let store = DocumentStore::open(dir.path())?;
        let events = store.read_all_custom_events()?;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].start_seconds(), Some(1_780_000_000));
        assert_eq!(events[0].end_seconds(), None);
        Ok(())
    }
}
