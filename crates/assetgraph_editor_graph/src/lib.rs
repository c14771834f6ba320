// SPDX-License-Identifier: MIT OR Apache-2.0
//! Asset graph model for the `AssetGraph` editor.
//!
//! This crate holds everything behind the node canvas:
//! - Typed nodes with directional connection points
//! - Directed, de-duplicated connections
//! - A gesture state machine for drag-to-connect and tap-to-delete
//! - A staleness-aware JSON load/save cycle
//!
//! ## Architecture
//!
//! The host draws the canvas and answers hit tests through
//! [`GraphGeometry`]. Pointer and tap notifications are normalized into
//! [`GraphEvent`]s and fed to an [`InteractionEngine`], which edits the
//! [`GraphDocument`]. [`GraphStore`] reads and writes the document.

pub mod point;
pub mod node;
pub mod connection;
pub mod graph;
pub mod geometry;
pub mod interaction;
pub mod persistence;

pub use point::{compatible, ConnectionPoint, PointDirection, PointId, DEFAULT_INPUT_LABEL};
pub use node::{LookupError, Node, NodeBuilder, NodeError, NodeId, NodeKind};
pub use connection::{Connection, ConnectionId, Endpoint};
pub use graph::{ConnectionError, DocumentError, GraphDocument};
pub use geometry::{GraphGeometry, LayoutMetrics, NodeLayout};
pub use interaction::{DeletableAction, EngineOutcome, EngineState, GraphEvent, InteractionEngine};
pub use persistence::{GraphFormatError, GraphStore, PersistError, ReloadOutcome};

// Hosts speak in egui positions
pub use egui::Pos2;
