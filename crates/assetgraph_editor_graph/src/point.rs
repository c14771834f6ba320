// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection point definitions for node inputs/outputs.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Label given to the input point every non-source node receives.
pub const DEFAULT_INPUT_LABEL: &str = "default_input";

/// Unique identifier for a connection point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointId(pub Uuid);

impl PointId {
    /// Create a new random point ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PointId {
    fn default() -> Self {
        Self::new()
    }
}

/// Point direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointDirection {
    /// Input point
    Input,
    /// Output point
    Output,
}

impl PointDirection {
    /// The other direction
    pub fn opposite(self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
        }
    }
}

/// A directional terminal on a node.
///
/// `node` is a relationship, not ownership: the point lives inside its
/// node's point list and only remembers which node that is, so geometry
/// and label lookups can find their way back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionPoint {
    /// Unique point ID
    pub id: PointId,
    /// Owning node
    pub node: NodeId,
    /// Label, unique per (node, direction)
    pub label: String,
    /// Point direction
    pub direction: PointDirection,
}

impl ConnectionPoint {
    /// Create a new input point
    pub fn input(node: NodeId, label: impl Into<String>) -> Self {
        Self {
            id: PointId::new(),
            node,
            label: label.into(),
            direction: PointDirection::Input,
        }
    }

    /// Create a new output point
    pub fn output(node: NodeId, label: impl Into<String>) -> Self {
        Self {
            id: PointId::new(),
            node,
            label: label.into(),
            direction: PointDirection::Output,
        }
    }

    /// Whether this is an input point
    pub fn is_input(&self) -> bool {
        self.direction == PointDirection::Input
    }

    /// Whether this is an output point
    pub fn is_output(&self) -> bool {
        self.direction == PointDirection::Output
    }

    /// Check if a connection to another point is valid
    pub fn can_connect(&self, other: &ConnectionPoint) -> bool {
        compatible(self.direction, other.direction)
    }
}

/// Two directions can be joined iff exactly one of them is an output.
pub fn compatible(a: PointDirection, b: PointDirection) -> bool {
    a != b
}
