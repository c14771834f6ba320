// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph file watcher.
//!
//! Watches the directory holding the graph file and reports debounced
//! changes to that one file, so the session can ask its store for a
//! reload. Saves from this editor also show up here; the store's
//! timestamp check turns those into no-ops.

use notify_debouncer_full::{
    new_debouncer,
    notify::{self, EventKind, RecommendedWatcher, RecursiveMode},
    DebounceEventResult, Debouncer, RecommendedCache,
};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

/// Events emitted by the watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphFileEvent {
    /// The graph file was created, written or renamed into place
    Changed,
    /// The graph file was deleted
    Removed,
    /// The watcher reported an error
    Error(String),
}

/// Whether `path` names the watched file
fn is_target(path: &Path, file_name: &OsString) -> bool {
    path.file_name() == Some(file_name.as_os_str())
}

/// Map one notify event kind onto a graph file event
fn classify(kind: &EventKind) -> Option<GraphFileEvent> {
    match kind {
        EventKind::Create(_) | EventKind::Modify(_) => Some(GraphFileEvent::Changed),
        EventKind::Remove(_) => Some(GraphFileEvent::Removed),
        EventKind::Any | EventKind::Access(_) | EventKind::Other => None,
    }
}

/// Debounced watcher for a single graph file
pub struct GraphFileWatcher {
    /// The underlying debounced watcher
    _watcher: Debouncer<RecommendedWatcher, RecommendedCache>,
    /// Receiver for graph file events
    event_rx: Receiver<GraphFileEvent>,
    /// The watched file
    path: PathBuf,
}

impl GraphFileWatcher {
    /// Start watching `graph_path`. Its directory must exist.
    pub fn new(graph_path: &Path, debounce: Duration) -> Result<Self, notify::Error> {
        let (event_tx, event_rx) = mpsc::channel();
        let file_name = graph_path
            .file_name()
            .map(OsString::from)
            .ok_or_else(|| notify::Error::generic("graph path has no file name"))?;
        let dir = match graph_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut watcher = new_debouncer(debounce, None, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    for event in events {
                        if !event.paths.iter().any(|p| is_target(p, &file_name)) {
                            continue;
                        }
                        if let Some(graph_event) = classify(&event.kind) {
                            let _ = event_tx.send(graph_event);
                        }
                    }
                }
                Err(errors) => {
                    for error in errors {
                        let _ = event_tx.send(GraphFileEvent::Error(error.to_string()));
                    }
                }
            }
        })?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::info!("Watching graph file for changes: {:?}", graph_path);

        Ok(Self {
            _watcher: watcher,
            event_rx,
            path: graph_path.to_path_buf(),
        })
    }

    /// The watched file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Poll for pending events (non-blocking)
    pub fn poll_events(&self) -> Vec<GraphFileEvent> {
        let mut events = Vec::new();
        loop {
            match self.event_rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::warn!("Graph file watcher channel disconnected");
                    break;
                }
            }
        }
        events
    }

    /// Block until the next event; `None` once the watcher is gone
    pub fn wait_event(&self) -> Option<GraphFileEvent> {
        self.event_rx.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify_debouncer_full::notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};

    #[test]
    fn test_target_matching() {
        let name = OsString::from("AssetGraph.json");
        assert!(is_target(Path::new("/p/Temp/AssetGraph.json"), &name));
        assert!(!is_target(Path::new("/p/Temp/.tmpA1b2C3"), &name));
        assert!(!is_target(Path::new("/p/Temp"), &OsString::from("Other.json")));
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            classify(&EventKind::Create(CreateKind::File)),
            Some(GraphFileEvent::Changed)
        );
        assert_eq!(
            classify(&EventKind::Modify(ModifyKind::Name(RenameMode::To))),
            Some(GraphFileEvent::Changed)
        );
        assert_eq!(
            classify(&EventKind::Remove(RemoveKind::File)),
            Some(GraphFileEvent::Removed)
        );
        assert_eq!(classify(&EventKind::Other), None);
    }

    #[test]
    fn test_watch_requires_file_name() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GraphFileWatcher::new(Path::new("/"), Duration::from_millis(50)).is_err());
        let watcher =
            GraphFileWatcher::new(&dir.path().join("AssetGraph.json"), Duration::from_millis(50))
                .unwrap();
        assert!(watcher.poll_events().is_empty());
    }
}
