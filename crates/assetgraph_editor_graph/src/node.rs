// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the asset graph.

use crate::point::{ConnectionPoint, PointDirection, PointId, DEFAULT_INPUT_LABEL};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for NodeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// What a node does to the assets flowing through it.
///
/// Kinds only change which points are legal; graph mechanics are the same
/// for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Feeds assets into the graph; has no input
    Source,
    /// Splits assets by script
    Filter,
    /// Builds prefabs by script
    Prefabricator,
    /// Groups assets into bundles by script
    Bundlizer,
    /// Final sink
    Destination,
}

impl NodeKind {
    /// All kinds in declaration order
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Source,
        NodeKind::Filter,
        NodeKind::Prefabricator,
        NodeKind::Bundlizer,
        NodeKind::Destination,
    ];

    /// Stored name of this kind
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "Source",
            Self::Filter => "Filter",
            Self::Prefabricator => "Prefabricator",
            Self::Bundlizer => "Bundlizer",
            Self::Destination => "Destination",
        }
    }

    /// Whether nodes of this kind are driven by a script
    pub fn takes_script(self) -> bool {
        matches!(self, Self::Filter | Self::Prefabricator | Self::Bundlizer)
    }

    /// Whether nodes of this kind get the default input point
    pub fn has_default_input(self) -> bool {
        self != Self::Source
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error for a kind name outside the closed set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown node kind: {0:?}")]
pub struct UnknownKind(pub String);

impl FromStr for NodeKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// A node instance in the graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Node kind
    pub kind: NodeKind,
    /// Display name (not used for identity)
    pub name: String,
    /// Position in the graph UI
    pub position: [f32; 2],
    /// Script driving this node, for scripted kinds only
    pub script_path: Option<String>,
    /// Connection points, outputs first, then the default input
    points: Vec<ConnectionPoint>,
}

impl Node {
    /// Start building a node of the given kind
    pub fn builder(kind: NodeKind, name: impl Into<String>) -> NodeBuilder {
        NodeBuilder {
            id: None,
            kind,
            name: name.into(),
            position: [0.0, 0.0],
            script_path: None,
            outputs: Vec::new(),
        }
    }

    /// All points in order
    pub fn points(&self) -> &[ConnectionPoint] {
        &self.points
    }

    /// Input points
    pub fn inputs(&self) -> impl Iterator<Item = &ConnectionPoint> {
        self.points.iter().filter(|p| p.is_input())
    }

    /// Output points
    pub fn outputs(&self) -> impl Iterator<Item = &ConnectionPoint> {
        self.points.iter().filter(|p| p.is_output())
    }

    /// Labels of the output points, in order
    pub fn output_labels(&self) -> impl Iterator<Item = &str> {
        self.outputs().map(|p| p.label.as_str())
    }

    /// Get a point by ID
    pub fn point(&self, point_id: PointId) -> Option<&ConnectionPoint> {
        self.points.iter().find(|p| p.id == point_id)
    }

    /// Find the first point carrying `label`, whatever its direction.
    pub fn point_by_label(&self, label: &str) -> Result<&ConnectionPoint, LookupError> {
        self.points
            .iter()
            .find(|p| p.label == label)
            .ok_or_else(|| self.no_such_point(label))
    }

    /// Find the point with `label` among points of one direction.
    pub fn point_by_label_in(
        &self,
        label: &str,
        direction: PointDirection,
    ) -> Result<&ConnectionPoint, LookupError> {
        self.points
            .iter()
            .find(|p| p.direction == direction && p.label == label)
            .ok_or_else(|| self.no_such_point(label))
    }

    /// The default input point, if this kind has one
    pub fn default_input(&self) -> Option<&ConnectionPoint> {
        self.point_by_label_in(DEFAULT_INPUT_LABEL, PointDirection::Input).ok()
    }

    fn no_such_point(&self, label: &str) -> LookupError {
        LookupError::NoSuchPoint {
            node: self.id,
            label: label.to_string(),
        }
    }
}

/// Builder for [`Node`]; attaches outputs, then the default input.
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    id: Option<NodeId>,
    kind: NodeKind,
    name: String,
    position: [f32; 2],
    script_path: Option<String>,
    outputs: Vec<String>,
}

impl NodeBuilder {
    /// Use a known ID instead of a fresh one
    pub fn id(mut self, id: NodeId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the position
    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Set the script path
    pub fn script_path(mut self, path: impl Into<String>) -> Self {
        self.script_path = Some(path.into());
        self
    }

    /// Add an output point
    pub fn output(mut self, label: impl Into<String>) -> Self {
        self.outputs.push(label.into());
        self
    }

    /// Add several output points
    pub fn outputs<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs.extend(labels.into_iter().map(Into::into));
        self
    }

    /// Build the node
    pub fn build(self) -> Result<Node, NodeError> {
        let id = self.id.unwrap_or_default();

        let script_path = match (self.kind.takes_script(), self.script_path) {
            (true, None) => return Err(NodeError::MissingScriptPath(self.kind)),
            (true, path) => path,
            (false, Some(path)) => {
                tracing::warn!(node = %id, kind = %self.kind, %path, "Ignoring script path on unscripted node");
                None
            }
            (false, None) => None,
        };

        let mut points: Vec<ConnectionPoint> = Vec::with_capacity(self.outputs.len() + 1);
        let reserved = self.kind.has_default_input().then_some(DEFAULT_INPUT_LABEL);
        for label in self.outputs {
            if reserved == Some(label.as_str()) || points.iter().any(|p| p.label == label) {
                return Err(NodeError::DuplicateLabel(label));
            }
            points.push(ConnectionPoint::output(id, label));
        }

        if self.kind.has_default_input() {
            points.push(ConnectionPoint::input(id, DEFAULT_INPUT_LABEL));
        }

        Ok(Node {
            id,
            kind: self.kind,
            name: self.name,
            position: self.position,
            script_path,
            points,
        })
    }
}

/// Error when building a node
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    /// Two outputs share a label, or an output takes the default input's
    #[error("Duplicate output label: {0:?}")]
    DuplicateLabel(String),

    /// Scripted kind without a script
    #[error("{0} node requires a script path")]
    MissingScriptPath(NodeKind),
}

/// Error when a point lookup by label fails
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// No node with that ID in the document
    #[error("No node with id {0}")]
    NoSuchNode(NodeId),

    /// No point with that label on the node
    #[error("Node {node} has no connection point labelled {label:?}")]
    NoSuchPoint {
        /// Node searched
        node: NodeId,
        /// Label asked for
        label: String,
    },
}
