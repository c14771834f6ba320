// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph document containing nodes and connections.

use crate::connection::{Connection, ConnectionId, Endpoint};
use crate::node::{LookupError, Node, NodeId};
use crate::point::{ConnectionPoint, PointId};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// The unit of load/save: every node and connection of one asset graph.
///
/// Node order is the draw order. Later nodes are drawn on top and win
/// overlapping hit tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphDocument {
    /// Staleness token written by the persistence layer
    pub last_modified: DateTime<Utc>,
    /// Nodes in draw order
    nodes: IndexMap<NodeId, Node>,
    /// Connections between nodes
    connections: IndexMap<ConnectionId, Connection>,
}

impl GraphDocument {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the document
    pub fn add_node(&mut self, node: Node) -> Result<NodeId, DocumentError> {
        let id = node.id;
        if self.nodes.contains_key(&id) {
            return Err(DocumentError::DuplicateNode(id));
        }
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Remove a node and every connection touching it
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        let node = self.nodes.shift_remove(&node_id)?;
        let before = self.connections.len();
        self.connections.retain(|_, c| !c.involves_node(node_id));
        tracing::debug!(
            node = %node_id,
            dropped_connections = before - self.connections.len(),
            "Removed node"
        );
        Some(node)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get all nodes in draw order
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs in draw order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Draw position of a node, 0 being the bottom
    pub fn draw_index(&self, node_id: NodeId) -> Option<usize> {
        self.nodes.get_index_of(&node_id)
    }

    /// Move a node. Returns false if the node does not exist.
    pub fn move_node(&mut self, node_id: NodeId, position: [f32; 2]) -> bool {
        match self.nodes.get_mut(&node_id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Bring a node to the top of the draw order
    pub fn raise_node(&mut self, node_id: NodeId) -> bool {
        let Some(index) = self.nodes.get_index_of(&node_id) else {
            return false;
        };
        let last = self.nodes.len() - 1;
        self.nodes.move_index(index, last);
        true
    }

    /// Resolve an endpoint to its point
    pub fn point(&self, endpoint: Endpoint) -> Option<&ConnectionPoint> {
        self.nodes.get(&endpoint.node)?.point(endpoint.point)
    }

    /// Find a point on a node by label
    pub fn connection_point_by_label(
        &self,
        node_id: NodeId,
        label: &str,
    ) -> Result<&ConnectionPoint, LookupError> {
        self.nodes
            .get(&node_id)
            .ok_or(LookupError::NoSuchNode(node_id))?
            .point_by_label(label)
    }

    /// Add a connection between an output and an input point.
    ///
    /// Returns `Ok(None)` when the same four-tuple is already connected.
    /// The caller orients the pair; a reversed pair is rejected rather than
    /// flipped.
    pub fn add_connection(
        &mut self,
        label: impl Into<String>,
        start: Endpoint,
        end: Endpoint,
    ) -> Result<Option<ConnectionId>, ConnectionError> {
        if start.node == end.node {
            return Err(ConnectionError::SelfLoop(start.node));
        }

        let start_point = self.endpoint_point(start)?;
        let end_point = self.endpoint_point(end)?;
        if !start_point.is_output() || !end_point.is_input() {
            return Err(ConnectionError::Misoriented);
        }

        if self.contains_connection(start, end) {
            return Ok(None);
        }

        let connection = Connection::new(label, start, end);
        let id = connection.id;
        tracing::debug!(connection = ?id, label = %connection.label, "Added connection");
        self.connections.insert(id, connection);
        Ok(Some(id))
    }

    fn endpoint_point(&self, endpoint: Endpoint) -> Result<&ConnectionPoint, ConnectionError> {
        let node = self
            .nodes
            .get(&endpoint.node)
            .ok_or(ConnectionError::NodeNotFound(endpoint.node))?;
        node.point(endpoint.point)
            .ok_or(ConnectionError::PointNotFound(endpoint.point))
    }

    /// Remove a connection. Absent IDs are ignored.
    pub fn remove_connection(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        self.connections.shift_remove(&connection_id)
    }

    /// Get a connection by ID
    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&connection_id)
    }

    /// Get all connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Whether a connection joins exactly these endpoints
    pub fn contains_connection(&self, start: Endpoint, end: Endpoint) -> bool {
        self.connections.values().any(|c| c.joins(start, end))
    }

    /// Connections starting or ending at a point
    pub fn connections_touching(&self, point_id: PointId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.involves_point(point_id))
    }

    /// Get connections involving a node
    pub fn connections_for_node(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.involves_node(node_id))
    }

    /// Human-readable `node:point` text for an endpoint
    pub fn describe_point(&self, endpoint: Endpoint) -> String {
        match self.nodes.get(&endpoint.node) {
            Some(node) => match node.point(endpoint.point) {
                Some(point) => format!("{}:{}", node.name, point.label),
                None => format!("{}:?", node.name),
            },
            None => format!("{}:?", endpoint.node),
        }
    }
}

/// Error when changing the document's node set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// A node with this ID is already present
    #[error("Duplicate node: {0}")]
    DuplicateNode(NodeId),
}

/// Error when creating a connection
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Point not found
    #[error("Point not found: {0:?}")]
    PointNotFound(PointId),

    /// Start is not an output or end is not an input
    #[error("Connection must run from an output to an input")]
    Misoriented,

    /// Self-loop not allowed
    #[error("Self-loop not allowed on node {0}")]
    SelfLoop(NodeId),
}
