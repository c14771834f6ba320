// SPDX-License-Identifier: MIT OR Apache-2.0
//! Hit-testing contracts between the interaction engine and the host canvas.
//!
//! The engine never knows how nodes are drawn. It asks a [`GraphGeometry`]
//! which nodes and points lie under a position. [`NodeLayout`] is the stock
//! answer for hosts that draw nodes as fixed-width boxes with inputs on the
//! left edge and outputs on the right.

use crate::graph::GraphDocument;
use crate::node::{Node, NodeId};
use crate::point::{ConnectionPoint, PointDirection, PointId};
use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Geometry queries answered by the host
pub trait GraphGeometry {
    /// Nodes whose bounds contain `pos`, in document (draw) order
    fn nodes_at(&self, document: &GraphDocument, pos: Pos2) -> Vec<NodeId>;

    /// Points of `node` whose hit area contains `pos`
    fn points_at(&self, node: &Node, pos: Pos2) -> Vec<PointId>;
}

/// Node box metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    /// Width of every node box
    pub node_width: f32,
    /// Height of the title bar
    pub header_height: f32,
    /// Height of one point row
    pub point_height: f32,
    /// Drawn radius of a point
    pub point_radius: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            node_width: 180.0,
            header_height: 24.0,
            point_height: 22.0,
            point_radius: 6.0,
        }
    }
}

/// Box layout: inputs down the left edge, outputs down the right edge
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeLayout {
    /// Metrics used for every node
    pub metrics: LayoutMetrics,
}

impl NodeLayout {
    /// Create a layout with the given metrics
    pub fn new(metrics: LayoutMetrics) -> Self {
        Self { metrics }
    }

    /// Hover tolerance around a point's center
    pub fn hit_radius(&self) -> f32 {
        self.metrics.point_radius * 1.5
    }

    /// The drawn box of a node
    pub fn node_rect(&self, node: &Node) -> Rect {
        let rows = node.inputs().count().max(node.outputs().count());
        let height = self.metrics.header_height + rows as f32 * self.metrics.point_height + 8.0;
        Rect::from_min_size(
            Pos2::new(node.position[0], node.position[1]),
            Vec2::new(self.metrics.node_width, height),
        )
    }

    /// The box used for hit tests; widened so edge points are inside it
    pub fn hit_rect(&self, node: &Node) -> Rect {
        self.node_rect(node).expand2(Vec2::new(self.hit_radius(), 0.0))
    }

    /// Center of a point on its node's edge
    pub fn point_position(&self, node: &Node, point: &ConnectionPoint) -> Option<Pos2> {
        let row = match point.direction {
            PointDirection::Input => node.inputs().position(|p| p.id == point.id)?,
            PointDirection::Output => node.outputs().position(|p| p.id == point.id)?,
        };
        let x = match point.direction {
            PointDirection::Input => node.position[0],
            PointDirection::Output => node.position[0] + self.metrics.node_width,
        };
        let y = node.position[1]
            + self.metrics.header_height
            + row as f32 * self.metrics.point_height
            + self.metrics.point_height / 2.0;
        Some(Pos2::new(x, y))
    }
}

impl GraphGeometry for NodeLayout {
    fn nodes_at(&self, document: &GraphDocument, pos: Pos2) -> Vec<NodeId> {
        document
            .nodes()
            .filter(|node| self.hit_rect(node).contains(pos))
            .map(|node| node.id)
            .collect()
    }

    fn points_at(&self, node: &Node, pos: Pos2) -> Vec<PointId> {
        let radius = self.hit_radius();
        node.points()
            .iter()
            .filter(|point| {
                self.point_position(node, point)
                    .is_some_and(|center| center.distance(pos) <= radius)
            })
            .map(|point| point.id)
            .collect()
    }
}
