// src/watch/branch.rs

//! Branch-pointer watching.
//!
//! Watches exactly one file (`<git_dir>/HEAD`) and forwards freshly parsed
//! branch names to the coordinator, which decides whether the branch actually
//! moved.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::RuntimeEvent;
use crate::watch::watcher::WatcherHandle;

const HEAD_FILE: &str = "HEAD";
const REF_PREFIX: &str = "ref: refs/heads/";

/// Read the active branch name from `<git_dir>/HEAD`.
///
/// Returns `Ok(None)` when the file does not exist (not a repository, or not
/// yet one); any other read error is fatal. A detached HEAD yields the raw
/// commit hash, which is still usable for change detection.
pub fn read_current_branch(git_dir: &Path) -> Result<Option<String>> {
    let head_path = git_dir.join(HEAD_FILE);
    match fs::read_to_string(&head_path) {
        Ok(contents) => Ok(Some(parse_head(&contents))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => {
            Err(err).with_context(|| format!("reading branch pointer at {:?}", head_path))
        }
    }
}

/// Strip the symbolic-ref prefix and trailing newline from HEAD contents.
fn parse_head(contents: &str) -> String {
    contents
        .trim_end_matches('\n')
        .strip_prefix(REF_PREFIX)
        .unwrap_or(contents.trim_end_matches('\n'))
        .to_string()
}

/// Spawn a watcher on the version-control metadata directory.
///
/// Only modifications of the `HEAD` file are considered. Each one re-reads
/// the file and sends `RuntimeEvent::BranchChanged` with the parsed name;
/// equality with the tracked branch is the coordinator's concern. A read
/// error other than "not found" is surfaced as a fatal event.
pub fn spawn_branch_watcher(
    git_dir: impl Into<PathBuf>,
    events_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<Option<WatcherHandle>> {
    let git_dir = git_dir.into();
    if !git_dir.is_dir() {
        info!(dir = %git_dir.display(), "no version-control metadata, branch watching disabled");
        return Ok(None);
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    eprintln!("specwatch: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("specwatch: branch watch error: {err}");
            }
        },
        Config::default(),
    )?;

    // HEAD sits directly in the metadata dir; no need to recurse into refs/.
    watcher.watch(&git_dir, RecursiveMode::NonRecursive)?;

    info!(dir = %git_dir.display(), "branch watcher started");

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                continue;
            }
            if !event
                .paths
                .iter()
                .any(|p| p.file_name().is_some_and(|n| n == HEAD_FILE))
            {
                continue;
            }

            match read_current_branch(&git_dir) {
                Ok(Some(branch)) => {
                    debug!(branch = %branch, "branch pointer file changed");
                    if events_tx
                        .send(RuntimeEvent::BranchChanged { branch })
                        .await
                        .is_err()
                    {
                        return;
                    }
                }
                Ok(None) => {
                    // HEAD vanished mid-flight; nothing to compare against.
                    debug!("branch pointer file missing after change event");
                }
                Err(err) => {
                    let _ = events_tx.send(RuntimeEvent::Fatal(err)).await;
                    return;
                }
            }
        }

        debug!("branch watcher loop ended");
    });

    Ok(Some(WatcherHandle::from_watcher(watcher)))
}
