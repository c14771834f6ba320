// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the graph.

use crate::node::NodeId;
use crate::point::PointId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// One side of a connection: a point on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// Node owning the point
    pub node: NodeId,
    /// The point
    pub point: PointId,
}

impl Endpoint {
    /// Create an endpoint
    pub fn new(node: NodeId, point: PointId) -> Self {
        Self { node, point }
    }
}

/// A directed edge from an output point to an input point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Label of the output point at creation time
    pub label: String,
    /// Output side
    pub start: Endpoint,
    /// Input side
    pub end: Endpoint,
}

impl Connection {
    /// Create a new connection
    pub fn new(label: impl Into<String>, start: Endpoint, end: Endpoint) -> Self {
        Self {
            id: ConnectionId::new(),
            label: label.into(),
            start,
            end,
        }
    }

    /// The de-duplication key of this connection
    pub fn key(&self) -> (Endpoint, Endpoint) {
        (self.start, self.end)
    }

    /// Check if this connection joins exactly these endpoints
    pub fn joins(&self, start: Endpoint, end: Endpoint) -> bool {
        self.start == start && self.end == end
    }

    /// Check if this connection involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.start.node == node_id || self.end.node == node_id
    }

    /// Check if this connection involves a specific point
    pub fn involves_point(&self, point_id: PointId) -> bool {
        self.start.point == point_id || self.end.point == point_id
    }
}
