// SPDX-License-Identifier: MIT OR Apache-2.0
//! `AssetGraph` editor host.
//!
//! Everything the graph model leaves to its host except drawing:
//! - Settings (data location, hit-test metrics)
//! - The editing session routing events to the gesture engine
//! - Watching the graph file for changes made by other writers

pub mod file_watcher;
pub mod session;
pub mod settings;

pub use file_watcher::{GraphFileEvent, GraphFileWatcher};
pub use session::EditorSession;
pub use settings::{EditorSettings, SettingsError};
