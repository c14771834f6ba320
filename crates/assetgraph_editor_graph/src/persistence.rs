// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph file load/save.
//!
//! The on-disk record is JSON:
//!
//! ```json
//! {
//!   "last_modified": "2024-05-01T10:00:00Z",
//!   "nodes": [{ "class_name": "Split", "id": "…", "kind": "Filter",
//!               "script_path": "Assets/Split.cs", "pos": { "x": 0, "y": 0 },
//!               "output_labels": ["main"] }],
//!   "connections": [{ "label": "main", "from_node": "…", "to_node": "…" }]
//! }
//! ```
//!
//! Every field is checked on load and the first problem fails the whole
//! load with a [`GraphFormatError`] naming what was wrong. Saves go through
//! a temporary file in the same directory so the previous file survives a
//! crash mid-write.

use crate::connection::Endpoint;
use crate::graph::{ConnectionError, DocumentError, GraphDocument};
use crate::node::{LookupError, Node, NodeError, NodeId, NodeKind};
use crate::point::{PointDirection, DEFAULT_INPUT_LABEL};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Serialized graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphRecord {
    /// Staleness token
    pub last_modified: DateTime<Utc>,
    /// Nodes in draw order
    pub nodes: Vec<NodeRecord>,
    /// Connections in creation order
    pub connections: Vec<ConnectionRecord>,
}

/// Serialized node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Display name
    pub class_name: String,
    /// Node ID
    pub id: String,
    /// Kind name
    pub kind: String,
    /// Script path for scripted kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_path: Option<String>,
    /// Position
    pub pos: PosRecord,
    /// Output point labels in order
    pub output_labels: Vec<String>,
}

/// Serialized position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PosRecord {
    /// X coordinate
    #[serde(serialize_with = "finite")]
    pub x: f32,
    /// Y coordinate
    #[serde(serialize_with = "finite")]
    pub y: f32,
}

/// JSON has no NaN or infinity, so refuse them instead of writing `null`.
fn finite<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f32(*value)
    } else {
        Err(<S::Error as serde::ser::Error>::custom(format!("node position {value} is not finite")))
    }
}

/// Serialized connection; always ends at the target's default input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    /// Connection label, also the label of the start output
    pub label: String,
    /// Start node ID
    pub from_node: String,
    /// End node ID
    pub to_node: String,
}

/// Just the staleness token, so a reload check skips the node arrays
#[derive(Deserialize)]
struct RecordHeader {
    last_modified: DateTime<Utc>,
}

impl GraphRecord {
    /// Snapshot a document
    pub fn from_document(document: &GraphDocument) -> Self {
        let nodes = document
            .nodes()
            .map(|node| NodeRecord {
                class_name: node.name.clone(),
                id: node.id.to_string(),
                kind: node.kind.as_str().to_string(),
                script_path: node.script_path.clone(),
                pos: PosRecord { x: node.position[0], y: node.position[1] },
                output_labels: node.output_labels().map(str::to_string).collect(),
            })
            .collect();

        let connections = document
            .connections()
            .map(|c| ConnectionRecord {
                label: c.label.clone(),
                from_node: c.start.node.to_string(),
                to_node: c.end.node.to_string(),
            })
            .collect();

        Self {
            last_modified: document.last_modified,
            nodes,
            connections,
        }
    }

    /// Rebuild a document, validating every node and connection
    pub fn into_document(self) -> Result<GraphDocument, GraphFormatError> {
        let mut document = GraphDocument::new();
        document.last_modified = self.last_modified;

        for (index, record) in self.nodes.into_iter().enumerate() {
            let node = node_from_record(index, record)?;
            document.add_node(node).map_err(|e| match e {
                DocumentError::DuplicateNode(id) => GraphFormatError::DuplicateNode(id),
            })?;
        }

        for (index, record) in self.connections.into_iter().enumerate() {
            let from = parse_id(format!("connections[{index}].from_node"), &record.from_node)?;
            let to = parse_id(format!("connections[{index}].to_node"), &record.to_node)?;

            let start_node = document.node(from).ok_or_else(|| GraphFormatError::UnknownNode {
                field: format!("connections[{index}].from_node"),
                id: from,
            })?;
            let end_node = document.node(to).ok_or_else(|| GraphFormatError::UnknownNode {
                field: format!("connections[{index}].to_node"),
                id: to,
            })?;

            let start = start_node.point_by_label_in(&record.label, PointDirection::Output)?;
            let end = end_node.point_by_label_in(DEFAULT_INPUT_LABEL, PointDirection::Input)?;
            let (start, end) = (Endpoint::new(from, start.id), Endpoint::new(to, end.id));

            document
                .add_connection(record.label, start, end)
                .map_err(|source| GraphFormatError::Connection { index, source })?;
        }

        Ok(document)
    }
}

fn parse_id(field: String, value: &str) -> Result<NodeId, GraphFormatError> {
    value.parse().map_err(|_| GraphFormatError::InvalidId {
        field,
        value: value.to_string(),
    })
}

fn node_from_record(index: usize, record: NodeRecord) -> Result<Node, GraphFormatError> {
    let id = parse_id(format!("nodes[{index}].id"), &record.id)?;
    let kind: NodeKind = record.kind.parse().map_err(|_| GraphFormatError::UnknownKind {
        node: id,
        value: record.kind.clone(),
    })?;

    for (axis, value) in [("x", record.pos.x), ("y", record.pos.y)] {
        if !value.is_finite() {
            return Err(GraphFormatError::NonFinitePosition {
                field: format!("nodes[{index}].pos.{axis}"),
                node: id,
            });
        }
    }

    let mut builder = Node::builder(kind, record.class_name)
        .id(id)
        .position(record.pos.x, record.pos.y)
        .outputs(record.output_labels);
    if let Some(path) = record.script_path {
        builder = builder.script_path(path);
    }

    builder.build().map_err(|e| match e {
        NodeError::DuplicateLabel(label) => GraphFormatError::DuplicateLabel { node: id, label },
        NodeError::MissingScriptPath(_) => GraphFormatError::MissingScriptPath { node: id, kind },
    })
}

/// Parse a graph from JSON text
pub fn from_json_str(text: &str) -> Result<GraphDocument, GraphFormatError> {
    let record: GraphRecord = serde_json::from_str(text)?;
    record.into_document()
}

/// Render a graph as JSON text
pub fn to_json_string(document: &GraphDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&GraphRecord::from_document(document))
}

/// Load a graph file, writing a fresh empty graph first if there is none.
///
/// Returns the document and the timestamp it was stored with.
pub fn load(path: &Path) -> Result<(GraphDocument, DateTime<Utc>), PersistError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let mut document = GraphDocument::new();
            document.last_modified = Utc::now();
            save(&document, path)?;
            tracing::info!("Created empty graph at {:?}", path);
            let stamp = document.last_modified;
            return Ok((document, stamp));
        }
        Err(source) => return Err(PersistError::io(path, source)),
    };

    let document = from_json_str(&text).map_err(|source| PersistError::Format {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        nodes = document.node_count(),
        connections = document.connection_count(),
        "Loaded graph from {:?}",
        path
    );
    let stamp = document.last_modified;
    Ok((document, stamp))
}

/// Read only the stored timestamp. `None` if the file does not exist.
pub fn read_timestamp(path: &Path) -> Result<Option<DateTime<Utc>>, PersistError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(PersistError::io(path, source)),
    };
    let header: RecordHeader = serde_json::from_str(&text).map_err(|e| PersistError::Format {
        path: path.to_path_buf(),
        source: GraphFormatError::Json(e),
    })?;
    Ok(Some(header.last_modified))
}

/// Write a graph file atomically, stamped with the document's timestamp
pub fn save(document: &GraphDocument, path: &Path) -> Result<(), PersistError> {
    let text = to_json_string(document).map_err(PersistError::Encode)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| PersistError::io(dir, e))?;

    let mut file = NamedTempFile::new_in(dir).map_err(|e| PersistError::io(dir, e))?;
    file.write_all(text.as_bytes())
        .and_then(|()| file.as_file().sync_all())
        .map_err(|e| PersistError::io(path, e))?;
    file.persist(path).map_err(|e| PersistError::io(path, e.error))?;

    tracing::debug!("Saved graph to {:?}", path);
    Ok(())
}

/// Result of a reload request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The stored timestamp matched; the document was left alone
    Unchanged,
    /// The document was rebuilt from the file
    Reloaded,
}

/// A graph file plus the timestamp last read from or written to it
#[derive(Debug, Clone)]
pub struct GraphStore {
    path: PathBuf,
    last_loaded: Option<DateTime<Utc>>,
}

impl GraphStore {
    /// Create a store for a path. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_loaded: None,
        }
    }

    /// The graph file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Timestamp of the last successful load or save
    pub fn last_loaded(&self) -> Option<DateTime<Utc>> {
        self.last_loaded
    }

    /// Load the file unconditionally, bootstrapping it if absent
    pub fn open(&mut self) -> Result<GraphDocument, PersistError> {
        let (document, stamp) = load(&self.path)?;
        self.last_loaded = Some(stamp);
        Ok(document)
    }

    /// Rebuild `document` from the file unless its timestamp is the one
    /// already loaded.
    ///
    /// When unchanged, `document` keeps its runtime point and connection
    /// IDs, so gestures holding them stay valid.
    pub fn reload(&mut self, document: &mut GraphDocument) -> Result<ReloadOutcome, PersistError> {
        if let Some(stamp) = read_timestamp(&self.path)? {
            if self.last_loaded == Some(stamp) {
                tracing::debug!("Graph at {:?} unchanged since {}, skipping reload", self.path, stamp);
                return Ok(ReloadOutcome::Unchanged);
            }
        }

        *document = self.open()?;
        Ok(ReloadOutcome::Reloaded)
    }

    /// Stamp `document` with the current time and write it
    pub fn save(&mut self, document: &mut GraphDocument) -> Result<(), PersistError> {
        document.last_modified = Utc::now();
        save(document, &self.path)?;
        self.last_loaded = Some(document.last_modified);
        tracing::info!("Saved graph to {:?}", self.path);
        Ok(())
    }
}

/// Problem in a stored graph record
#[derive(Debug, thiserror::Error)]
pub enum GraphFormatError {
    /// Not JSON, or a required field is missing or has the wrong type
    #[error("Malformed graph record: {0}")]
    Json(#[from] serde_json::Error),

    /// An ID field is not a valid node ID
    #[error("Invalid id in {field}: {value:?}")]
    InvalidId {
        /// Offending field
        field: String,
        /// Offending value
        value: String,
    },

    /// `kind` is outside the closed set
    #[error("Node {node} has unknown kind {value:?}")]
    UnknownKind {
        /// Node carrying the kind
        node: NodeId,
        /// Offending value
        value: String,
    },

    /// Scripted kind without `script_path`
    #[error("{kind} node {node} is missing script_path")]
    MissingScriptPath {
        /// Offending node
        node: NodeId,
        /// Its kind
        kind: NodeKind,
    },

    /// A coordinate overflows `f32` or is not a number
    #[error("{field} of node {node} is not a finite coordinate")]
    NonFinitePosition {
        /// Offending field
        field: String,
        /// Offending node
        node: NodeId,
    },

    /// Two nodes share an ID
    #[error("Duplicate node id {0}")]
    DuplicateNode(NodeId),

    /// A node lists the same output label twice
    #[error("Node {node} lists output {label:?} twice")]
    DuplicateLabel {
        /// Offending node
        node: NodeId,
        /// Repeated label
        label: String,
    },

    /// A connection names a node that is not in the file
    #[error("{field} refers to unknown node {id}")]
    UnknownNode {
        /// Offending field
        field: String,
        /// Missing node
        id: NodeId,
    },

    /// A connection names a point its node does not have
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// A connection breaks a document invariant
    #[error("connections[{index}]: {source}")]
    Connection {
        /// Position in the connections array
        index: usize,
        /// What was wrong
        source: ConnectionError,
    },
}

/// Error when reading or writing a graph file
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// File system failure
    #[error("I/O error on {path:?}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// The file exists but is not a valid graph
    #[error("Invalid graph file {path:?}: {source}")]
    Format {
        /// Graph file
        path: PathBuf,
        /// What was wrong
        source: GraphFormatError,
    },

    /// The document could not be encoded
    #[error("Failed to encode graph: {0}")]
    Encode(serde_json::Error),
}

impl PersistError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The format error, if this is one
    pub fn format_error(&self) -> Option<&GraphFormatError> {
        match self {
            Self::Format { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn sample() -> GraphDocument {
        let mut doc = GraphDocument::new();
        doc.last_modified = "2024-05-01T10:00:00.123456789Z".parse().unwrap();

        let source = Node::builder(NodeKind::Source, "Textures")
            .outputs(["textures", "models"])
            .position(-20.0, 12.5)
            .build()
            .unwrap();
        let filter = Node::builder(NodeKind::Filter, "Split")
            .script_path("Assets/Split.cs")
            .outputs(["main", "rest"])
            .position(240.0, 0.0)
            .build()
            .unwrap();
        let bundle = Node::builder(NodeKind::Bundlizer, "Bundle")
            .script_path("Assets/Bundle.cs")
            .position(480.0, 30.0)
            .build()
            .unwrap();
        let sink = Node::builder(NodeKind::Destination, "Out")
            .position(720.0, 30.0)
            .build()
            .unwrap();

        let wire = |from: &Node, label: &str, to: &Node| {
            (
                label.to_string(),
                Endpoint::new(from.id, from.point_by_label(label).unwrap().id),
                Endpoint::new(to.id, to.default_input().unwrap().id),
            )
        };
        let wires = [
            wire(&source, "textures", &filter),
            wire(&source, "models", &bundle),
            wire(&filter, "main", &bundle),
            wire(&filter, "rest", &sink),
        ];

        for node in [source, filter, bundle, sink] {
            doc.add_node(node).unwrap();
        }
        for (label, start, end) in wires {
            doc.add_connection(label, start, end).unwrap();
        }
        doc
    }

    type NodeSig = (NodeId, NodeKind, String, Option<String>, [u32; 2], Vec<(String, bool)>);
    type EdgeSig = (NodeId, String, NodeId, String, String);

    /// Order-independent identity of a document, ignoring runtime point IDs
    fn signature(doc: &GraphDocument) -> (BTreeSet<String>, BTreeSet<String>, DateTime<Utc>) {
        let nodes = doc
            .nodes()
            .map(|n| {
                let sig: NodeSig = (
                    n.id,
                    n.kind,
                    n.name.clone(),
                    n.script_path.clone(),
                    n.position.map(f32::to_bits),
                    n.points().iter().map(|p| (p.label.clone(), p.is_input())).collect(),
                );
                format!("{sig:?}")
            })
            .collect();
        let edges = doc
            .connections()
            .map(|c| {
                let sig: EdgeSig = (
                    c.start.node,
                    doc.point(c.start).unwrap().label.clone(),
                    c.end.node,
                    doc.point(c.end).unwrap().label.clone(),
                    c.label.clone(),
                );
                format!("{sig:?}")
            })
            .collect();
        (nodes, edges, doc.last_modified)
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        let doc = sample();

        save(&doc, &path).unwrap();
        let (loaded, stamp) = load(&path).unwrap();

        assert_eq!(stamp, doc.last_modified);
        assert_eq!(signature(&loaded), signature(&doc));
        assert_eq!(loaded.connection_count(), 4);
        let order: Vec<_> = loaded.node_ids().collect();
        assert_eq!(order, doc.node_ids().collect::<Vec<_>>());
    }

    #[test]
    fn test_missing_file_bootstraps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Temp").join("graph.json");

        let (doc, stamp) = load(&path).unwrap();
        assert_eq!(doc.node_count(), 0);
        assert_eq!(doc.connection_count(), 0);
        assert!(path.exists());

        let (again, again_stamp) = load(&path).unwrap();
        assert_eq!(again_stamp, stamp);
        assert_eq!(again.node_count(), 0);
    }

    fn record_with(node: serde_json::Value, connections: serde_json::Value) -> String {
        serde_json::json!({
            "last_modified": "2024-05-01T10:00:00Z",
            "nodes": [node],
            "connections": connections,
        })
        .to_string()
    }

    fn filter_json(id: &str, kind: &str) -> serde_json::Value {
        serde_json::json!({
            "class_name": "Split",
            "id": id,
            "kind": kind,
            "script_path": "Assets/Split.cs",
            "pos": { "x": 0, "y": 0 },
            "output_labels": ["main"],
        })
    }

    const ID: &str = "6f1c2a5e-8d1b-4c39-9a7e-2a0f5d3c9b11";

    #[test]
    fn test_unknown_kind_fails() {
        let text = record_with(filter_json(ID, "Bogus"), serde_json::json!([]));
        let err = from_json_str(&text).unwrap_err();
        assert!(
            matches!(&err, GraphFormatError::UnknownKind { value, .. } if value == "Bogus"),
            "{err}"
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        fs::write(&path, &text).unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err.format_error(), Some(GraphFormatError::UnknownKind { .. })));
    }

    #[test]
    fn test_missing_fields_fail() {
        let mut node = filter_json(ID, "Filter");
        node.as_object_mut().unwrap().remove("pos");
        let err = from_json_str(&record_with(node, serde_json::json!([]))).unwrap_err();
        assert!(err.to_string().contains("pos"), "{err}");

        let mut node = filter_json(ID, "Filter");
        node.as_object_mut().unwrap().remove("script_path");
        let err = from_json_str(&record_with(node, serde_json::json!([]))).unwrap_err();
        assert!(matches!(err, GraphFormatError::MissingScriptPath { kind: NodeKind::Filter, .. }));

        let err = from_json_str(r#"{"nodes": [], "connections": []}"#).unwrap_err();
        assert!(err.to_string().contains("last_modified"), "{err}");

        let err = from_json_str(&record_with(filter_json("node-1", "Filter"), serde_json::json!([])))
            .unwrap_err();
        assert!(matches!(err, GraphFormatError::InvalidId { ref field, .. } if field == "nodes[0].id"));
    }

    #[test]
    fn test_bad_connections_fail() {
        let stale_label = serde_json::json!([{ "label": "gone", "from_node": ID, "to_node": ID }]);
        let err = from_json_str(&record_with(filter_json(ID, "Filter"), stale_label)).unwrap_err();
        assert!(matches!(err, GraphFormatError::Lookup(LookupError::NoSuchPoint { .. })));

        let other = "0b0c7f57-1f62-4d7b-a1c5-8e8f7a5b7d20";
        let unknown = serde_json::json!([{ "label": "main", "from_node": ID, "to_node": other }]);
        let err = from_json_str(&record_with(filter_json(ID, "Filter"), unknown)).unwrap_err();
        assert!(matches!(err, GraphFormatError::UnknownNode { id, .. } if id.to_string() == other));

        let self_loop = serde_json::json!([{ "label": "main", "from_node": ID, "to_node": ID }]);
        let err = from_json_str(&record_with(filter_json(ID, "Filter"), self_loop)).unwrap_err();
        assert!(matches!(
            err,
            GraphFormatError::Connection { index: 0, source: ConnectionError::SelfLoop(_) }
        ));
    }

    #[test]
    fn test_output_named_like_default_input_fails() {
        let mut node = filter_json(ID, "Filter");
        node["output_labels"] = serde_json::json!(["main", DEFAULT_INPUT_LABEL]);
        let err = from_json_str(&record_with(node, serde_json::json!([]))).unwrap_err();
        assert!(
            matches!(&err, GraphFormatError::DuplicateLabel { label, .. } if label == DEFAULT_INPUT_LABEL),
            "{err}"
        );
    }

    #[test]
    fn test_out_of_range_position_fails() {
        let mut node = filter_json(ID, "Filter");
        node["pos"]["x"] = serde_json::json!(1e300);
        let err = from_json_str(&record_with(node, serde_json::json!([]))).unwrap_err();
        assert!(
            matches!(&err, GraphFormatError::NonFinitePosition { field, .. } if field == "nodes[0].pos.x"),
            "{err}"
        );
    }

    #[test]
    fn test_non_finite_position_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        let mut doc = sample();
        save(&doc, &path).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let first = doc.node_ids().next().unwrap();
        assert!(doc.move_node(first, [f32::NAN, 10.0]));
        assert!(matches!(save(&doc, &path), Err(PersistError::Encode(_))));

        doc.move_node(first, [0.0, f32::INFINITY]);
        assert!(matches!(save(&doc, &path), Err(PersistError::Encode(_))));

        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        assert!(load(&path).is_ok());
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        save(&sample(), &path).unwrap();
        save(&sample(), &path).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_store_suppresses_unchanged_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        save(&sample(), &path).unwrap();

        let mut store = GraphStore::new(&path);
        let mut doc = store.open().unwrap();
        let runtime_ids: Vec<_> = doc.connections().map(|c| c.id).collect();

        assert_eq!(store.reload(&mut doc).unwrap(), ReloadOutcome::Unchanged);
        assert_eq!(doc.connections().map(|c| c.id).collect::<Vec<_>>(), runtime_ids);

        // Another writer replaces the file with a newer stamp
        let mut newer = sample();
        newer.last_modified = Utc::now();
        let first = newer.node_ids().next().unwrap();
        newer.remove_node(first);
        save(&newer, &path).unwrap();

        assert_eq!(store.reload(&mut doc).unwrap(), ReloadOutcome::Reloaded);
        assert_eq!(doc.node_count(), 3);
        assert_eq!(store.last_loaded(), Some(newer.last_modified));
    }

    #[test]
    fn test_store_save_marks_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = GraphStore::new(dir.path().join("graph.json"));
        let mut doc = sample();

        store.save(&mut doc).unwrap();
        assert_eq!(store.last_loaded(), Some(doc.last_modified));
        assert_eq!(store.reload(&mut doc).unwrap(), ReloadOutcome::Unchanged);
    }
}
