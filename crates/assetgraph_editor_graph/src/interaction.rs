// SPDX-License-Identifier: MIT OR Apache-2.0
//! Gesture state machine turning pointer events into connection edits.
//!
//! The host normalizes its pointer and tap notifications into
//! [`GraphEvent`]s and feeds them to [`InteractionEngine::handle`] one at a
//! time. A drag from a point is `HandleStarted`, any number of `Handling`,
//! then `Dropped`; anything else in the middle cancels it. A tap on a point
//! while idle lists the connections that could be deleted there.

use crate::connection::{ConnectionId, Endpoint};
use crate::geometry::GraphGeometry;
use crate::graph::GraphDocument;
use crate::node::NodeId;
use crate::point::{compatible, PointDirection, PointId};
use egui::Pos2;

/// Events delivered by the host
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    /// Pointer pressed on a connection point
    HandleStarted {
        /// Node owning the pressed point
        node: NodeId,
        /// The pressed point
        point: PointId,
        /// Pointer position in graph space
        pos: Pos2,
    },
    /// Pointer moved while a drag may be in progress
    Handling {
        /// Pointer position in graph space
        pos: Pos2,
    },
    /// Pointer released
    Dropped {
        /// Pointer position in graph space
        pos: Pos2,
    },
    /// A connection point was tapped
    ReceiveTapped {
        /// Node owning the tapped point
        node: NodeId,
        /// The tapped point
        point: PointId,
    },
    /// Any notification the engine does not interpret
    Other,
}

/// The drag origin recorded on `HandleStarted`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingConnection {
    /// Where the drag began
    pub origin: Endpoint,
    /// Latest pointer position
    pub current_pos: Pos2,
}

/// Engine state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum EngineState {
    /// Waiting for a gesture
    #[default]
    Idle,
    /// A drag from a point is in progress
    Connecting(PendingConnection),
}

/// A connection the user may choose to delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletableAction {
    /// Connection to delete when chosen
    pub connection: ConnectionId,
    /// Connection label
    pub label: String,
    /// `from <start>` or `to <end>`, seen from the tapped point
    pub description: String,
}

impl DeletableAction {
    /// Menu entry text
    pub fn title(&self) -> String {
        format!("delete connection:{} {}", self.label, self.description)
    }
}

/// What handling one event produced
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EngineOutcome {
    /// Nothing visible changed
    #[default]
    None,
    /// A drop created this connection
    Connected(ConnectionId),
    /// A tap listed these deletable connections
    Menu(Vec<DeletableAction>),
}

/// Why a drop produced no connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropMiss {
    NoNode,
    SelfTarget,
    NoPoint,
    NoCompatiblePoint,
    OriginGone,
}

/// Gesture interpreter for one graph editor
#[derive(Debug, Clone, Default)]
pub struct InteractionEngine {
    state: EngineState,
    highlight: Option<Endpoint>,
}

impl InteractionEngine {
    /// Create an idle engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Whether a drag is in progress
    pub fn is_connecting(&self) -> bool {
        matches!(self.state, EngineState::Connecting(_))
    }

    /// Point the current drag would connect to if dropped now
    pub fn highlight(&self) -> Option<Endpoint> {
        self.highlight
    }

    /// Abandon any gesture in progress
    pub fn reset(&mut self) {
        self.state = EngineState::Idle;
        self.highlight = None;
    }

    /// Interpret one event against the document
    pub fn handle(
        &mut self,
        event: GraphEvent,
        document: &mut GraphDocument,
        geometry: &dyn GraphGeometry,
    ) -> EngineOutcome {
        match self.state {
            EngineState::Idle => self.handle_idle(event, document),
            EngineState::Connecting(mut pending) => match event {
                GraphEvent::Handling { pos } => {
                    pending.current_pos = pos;
                    self.state = EngineState::Connecting(pending);
                    self.highlight = resolve_drop(pending.origin, pos, document, geometry)
                        .ok()
                        .map(|(_, target)| target);
                    EngineOutcome::None
                }
                GraphEvent::Dropped { pos } => {
                    self.reset();
                    self.finish_drag(pending.origin, pos, document, geometry)
                }
                other => {
                    tracing::debug!(event = ?other, "Unexpected event while connecting, cancelling drag");
                    self.reset();
                    EngineOutcome::None
                }
            },
        }
    }

    fn handle_idle(&mut self, event: GraphEvent, document: &GraphDocument) -> EngineOutcome {
        match event {
            GraphEvent::HandleStarted { node, point, pos } => {
                self.state = EngineState::Connecting(PendingConnection {
                    origin: Endpoint::new(node, point),
                    current_pos: pos,
                });
                EngineOutcome::None
            }
            GraphEvent::ReceiveTapped { node, point } => {
                EngineOutcome::Menu(deletable_actions(document, Endpoint::new(node, point)))
            }
            _ => EngineOutcome::None,
        }
    }

    fn finish_drag(
        &mut self,
        origin: Endpoint,
        pos: Pos2,
        document: &mut GraphDocument,
        geometry: &dyn GraphGeometry,
    ) -> EngineOutcome {
        let (origin_direction, target) = match resolve_drop(origin, pos, document, geometry) {
            Ok(found) => found,
            Err(miss) => {
                tracing::debug!(?miss, ?pos, "Drop made no connection");
                return EngineOutcome::None;
            }
        };

        let (start, end) = match origin_direction {
            PointDirection::Input => (target, origin),
            PointDirection::Output => (origin, target),
        };
        let label = match document.point(start) {
            Some(point) => point.label.clone(),
            None => return EngineOutcome::None,
        };

        match document.add_connection(label, start, end) {
            Ok(Some(id)) => EngineOutcome::Connected(id),
            Ok(None) => EngineOutcome::None,
            Err(e) => {
                tracing::warn!("Resolved drop was rejected by the document: {e}");
                EngineOutcome::None
            }
        }
    }
}

/// Find the point a drag from `origin` would connect to at `pos`.
///
/// Returns the origin point's direction and the target endpoint.
fn resolve_drop(
    origin: Endpoint,
    pos: Pos2,
    document: &GraphDocument,
    geometry: &dyn GraphGeometry,
) -> Result<(PointDirection, Endpoint), DropMiss> {
    let origin_direction = document.point(origin).ok_or(DropMiss::OriginGone)?.direction;

    let target_id = geometry
        .nodes_at(document, pos)
        .last()
        .copied()
        .ok_or(DropMiss::NoNode)?;
    if target_id == origin.node {
        return Err(DropMiss::SelfTarget);
    }
    let target = document.node(target_id).ok_or(DropMiss::NoNode)?;

    let candidates = geometry.points_at(target, pos);
    if candidates.is_empty() {
        return Err(DropMiss::NoPoint);
    }

    candidates
        .into_iter()
        .find(|id| {
            target
                .point(*id)
                .is_some_and(|p| compatible(origin_direction, p.direction))
        })
        .map(|point| (origin_direction, Endpoint::new(target_id, point)))
        .ok_or(DropMiss::NoCompatiblePoint)
}

/// One delete descriptor per connection touching the tapped point
fn deletable_actions(document: &GraphDocument, tapped: Endpoint) -> Vec<DeletableAction> {
    let Some(point) = document.point(tapped) else {
        return Vec::new();
    };

    document
        .connections_touching(tapped.point)
        .map(|connection| {
            let description = match point.direction {
                PointDirection::Input => format!("from {}", document.describe_point(connection.start)),
                PointDirection::Output => format!("to {}", document.describe_point(connection.end)),
            };
            DeletableAction {
                connection: connection.id,
                label: connection.label.clone(),
                description,
            }
        })
        .collect()
}
