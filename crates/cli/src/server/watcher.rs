use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Serialize;
use std::path::{Component, Path};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::broadcast;

/// Directories whose changes never trigger a reload
const IGNORED_DIRS: &[&str] = &["node_modules", "dist", ".git"];

/// Notification pushed to connected clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReloadMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub path: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
}

impl ReloadMessage {
    pub fn update(path: &Path) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self {
            kind: "update",
            path: path.to_string_lossy().into_owned(),
            timestamp,
        }
    }
}

/// Keeps the file watcher alive.
pub struct ElementWatcher {
    _watcher: RecommendedWatcher,
}

/// Watch `dir` recursively and broadcast an update for every created,
/// modified or removed file
pub fn watch_element(
    dir: &Path,
    reload: broadcast::Sender<ReloadMessage>,
) -> notify::Result<ElementWatcher> {
    let mut watcher: RecommendedWatcher =
        notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!("File watch error: {}", e);
                    return;
                }
            };
            if !matches!(
                event.kind,
                EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
            ) {
                return;
            }
            for path in event.paths.iter().filter(|path| !is_ignored(path)) {
                tracing::debug!("Element file changed: {:?}", path);
                // No connected clients is fine
                let _ = reload.send(ReloadMessage::update(path));
            }
        })?;

    watcher.watch(dir, RecursiveMode::Recursive)?;
    tracing::debug!("Watching {:?}", dir);
    Ok(ElementWatcher { _watcher: watcher })
}

pub fn is_ignored(path: &Path) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => IGNORED_DIRS.iter().any(|ignored| name == *ignored),
        _ => false,
    })
}
