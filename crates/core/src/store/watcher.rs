use std::{path::Path, sync::Arc};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use crate::error::StoreError;

use super::{document::GAMES_FILE, DocumentStore};

/// Republishes the games collection whenever its file changes on disk.
///
/// Writes made through the store itself also trigger a delivery; subscribers
/// replace their list wholesale so a repeated snapshot is harmless.
pub struct StoreWatcher {
    _watcher: RecommendedWatcher,
}

impl StoreWatcher {
    /// Start watching the store directory. Dropping the handle stops the watcher.
    pub fn spawn(store: Arc<DocumentStore>) -> Result<Self, StoreError> {
        let root = store.root().to_path_buf();
        let handler_store = Arc::clone(&store);
        let mut watcher = notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
            match result {
                Ok(event) if touches_games(&event) => {
                    debug!(kind = ?event.kind, "games collection changed on disk");
                    if let Err(err) = handler_store.republish() {
                        warn!(%err, "failed to republish games after external change");
                    }
                }
                Ok(_) => {}
                Err(err) => warn!(%err, "store watcher error"),
            }
        })?;
        watcher.watch(&root, RecursiveMode::NonRecursive)?;
        Ok(Self { _watcher: watcher })
    }
}

fn touches_games(event: &notify::Event) -> bool {
    let relevant_kind = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    relevant_kind
        && event
            .paths
            .iter()
            .any(|path| path.file_name() == Some(Path::new(GAMES_FILE).as_os_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};
    use std::path::PathBuf;

    #[test]
    fn only_games_file_changes_are_relevant() {
        let games = notify::Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/tmp/store").join(GAMES_FILE));
        assert!(touches_games(&games));

        let temp = notify::Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/tmp/store/.tmpXYZ"));
        assert!(!touches_games(&temp));

        let access = notify::Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path(PathBuf::from("/tmp/store").join(GAMES_FILE));
        assert!(!touches_games(&access));
    }
}
