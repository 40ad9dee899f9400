// src/watch/watcher.rs

use std::path::Path;

use anyhow::Result;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::watch::patterns::MonitorProfile;

/// Handle for a filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping this handle stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl WatcherHandle {
    pub(crate) fn from_watcher(watcher: RecommendedWatcher) -> Self {
        Self { _inner: watcher }
    }
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher over one monitor root.
///
/// Each notify event becomes at most one `RuntimeEvent::FilesChanged` batch
/// holding the matching paths, relative to the monitor root. Only additions
/// and modifications are admitted.
///
/// Returns `Ok(None)` when the root directory does not exist; a default
/// config ships monitors for both features/ and spec/, and projects with
/// only one of the two must still start.
pub fn spawn_monitor(
    profile: MonitorProfile,
    events_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<Option<WatcherHandle>> {
    let root = profile.root().clone();
    if !root.is_dir() {
        warn!(monitor = %profile.name(), root = %root.display(), "monitor root does not exist, skipping");
        return Ok(None);
    }
    let root = root.canonicalize().unwrap_or(root);

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // tracing is not reliably usable from this thread; stderr fallback.
                    eprintln!("specwatch: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("specwatch: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!(monitor = %profile.name(), root = %root.display(), "file monitor started");

    let async_root = root.clone();
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                continue;
            }
            debug!(monitor = %profile.name(), ?event, "received notify event");

            let paths: Vec<String> = event
                .paths
                .iter()
                .filter_map(|path| relative_str(&async_root, path))
                .filter(|rel| profile.matches(rel))
                .collect();

            if paths.is_empty() {
                continue;
            }

            let batch = RuntimeEvent::FilesChanged {
                monitor: profile.name().to_string(),
                paths,
            };
            if events_tx.send(batch).await.is_err() {
                // Coordinator gone; no point keeping this loop alive.
                return;
            }
        }

        debug!(monitor = %profile.name(), "file monitor loop ended");
    });

    Ok(Some(WatcherHandle { _inner: watcher }))
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Returns `None` if the path is not under `root` and cannot be relativized.
pub(crate) fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let s = rel.to_string_lossy().replace('\\', "/");
    Some(s)
}

/// Convenience used by `lib.rs`: keep whichever handles were actually
/// created.
pub fn spawn_monitors(
    profiles: Vec<MonitorProfile>,
    events_tx: &mpsc::Sender<RuntimeEvent>,
) -> Result<Vec<WatcherHandle>> {
    let mut handles = Vec::new();
    for profile in profiles {
        if let Some(handle) = spawn_monitor(profile, events_tx.clone())? {
            handles.push(handle);
        }
    }
    Ok(handles)
}
