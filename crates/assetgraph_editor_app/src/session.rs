// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editing session: the host side of the asset graph.
//!
//! Owns the document, the gesture engine and the graph store, and routes
//! host events between them. A tap menu produced by the engine stays
//! pending until the user picks an entry or the next event arrives.

use crate::settings::EditorSettings;
use assetgraph_editor_graph::{
    ConnectionId, DeletableAction, EngineOutcome, GraphDocument, GraphEvent, GraphStore,
    InteractionEngine, LookupError, NodeId, NodeLayout, PersistError, PointId, Pos2,
    ReloadOutcome,
};
use std::path::PathBuf;

/// One open asset graph
pub struct EditorSession {
    store: GraphStore,
    document: GraphDocument,
    engine: InteractionEngine,
    layout: NodeLayout,
    menu: Vec<DeletableAction>,
}

impl EditorSession {
    /// Open the graph named by the settings, creating it if needed
    pub fn open(settings: &EditorSettings) -> Result<Self, PersistError> {
        Self::open_at(settings, settings.graph_path())
    }

    /// Open a graph file at an explicit path
    pub fn open_at(settings: &EditorSettings, path: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let mut store = GraphStore::new(path);
        let document = store.open()?;
        tracing::info!(
            nodes = document.node_count(),
            connections = document.connection_count(),
            "Opened graph {:?}",
            store.path()
        );

        Ok(Self {
            store,
            document,
            engine: InteractionEngine::new(),
            layout: NodeLayout::new(settings.layout),
            menu: Vec::new(),
        })
    }

    /// The document
    pub fn document(&self) -> &GraphDocument {
        &self.document
    }

    /// The document, for edits outside the gesture engine
    pub fn document_mut(&mut self) -> &mut GraphDocument {
        &mut self.document
    }

    /// The gesture engine
    pub fn engine(&self) -> &InteractionEngine {
        &self.engine
    }

    /// Geometry used for hit tests
    pub fn layout(&self) -> &NodeLayout {
        &self.layout
    }

    /// The graph store
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Deletable connections from the last tap, if still open
    pub fn pending_menu(&self) -> &[DeletableAction] {
        &self.menu
    }

    /// Pick up external changes to the graph file.
    ///
    /// When the file really changed, point and connection IDs are rebuilt,
    /// so any drag in progress and any open menu are dropped with them.
    pub fn reload(&mut self) -> Result<ReloadOutcome, PersistError> {
        let outcome = self.store.reload(&mut self.document)?;
        if outcome == ReloadOutcome::Reloaded {
            self.engine.reset();
            self.menu.clear();
            tracing::info!(
                nodes = self.document.node_count(),
                connections = self.document.connection_count(),
                "Graph reloaded"
            );
        }
        Ok(outcome)
    }

    /// Feed one host event to the engine
    pub fn dispatch(&mut self, event: GraphEvent) -> EngineOutcome {
        self.menu.clear();
        let outcome = self.engine.handle(event, &mut self.document, &self.layout);
        match &outcome {
            EngineOutcome::Menu(actions) => self.menu = actions.clone(),
            EngineOutcome::Connected(id) => tracing::info!(connection = ?id, "Connected"),
            EngineOutcome::None => {}
        }
        outcome
    }

    /// Where a point is drawn, found by node and label
    fn point_anchor(&self, node: NodeId, label: &str) -> Result<(PointId, Pos2), LookupError> {
        let owner = self.document.node(node).ok_or(LookupError::NoSuchNode(node))?;
        let point = owner.point_by_label(label)?;
        let pos = self
            .layout
            .point_position(owner, point)
            .ok_or_else(|| LookupError::NoSuchPoint { node, label: label.to_string() })?;
        Ok((point.id, pos))
    }

    /// Replay a full drag gesture from one point onto another.
    ///
    /// Goes through the engine exactly like pointer input would, so every
    /// rule about direction, self-loops and duplicates applies.
    pub fn replay_drag(
        &mut self,
        from: NodeId,
        from_label: &str,
        to: NodeId,
        to_label: &str,
    ) -> Result<EngineOutcome, LookupError> {
        let (point, start) = self.point_anchor(from, from_label)?;
        let (_, target) = self.point_anchor(to, to_label)?;

        self.dispatch(GraphEvent::HandleStarted { node: from, point, pos: start });
        self.dispatch(GraphEvent::Handling { pos: target });
        Ok(self.dispatch(GraphEvent::Dropped { pos: target }))
    }

    /// Replay a tap on a point and return the menu it opened
    pub fn tap(&mut self, node: NodeId, label: &str) -> Result<&[DeletableAction], LookupError> {
        let (point, _) = self.point_anchor(node, label)?;
        self.dispatch(GraphEvent::ReceiveTapped { node, point });
        Ok(&self.menu)
    }

    /// Act on entry `index` of the pending menu
    pub fn choose(&mut self, index: usize) -> Option<DeletableAction> {
        if index >= self.menu.len() {
            return None;
        }
        let action = self.menu.remove(index);
        self.menu.clear();
        self.delete_connection(action.connection);
        Some(action)
    }

    /// Delete a connection. Stale IDs are ignored.
    pub fn delete_connection(&mut self, id: ConnectionId) -> bool {
        match self.document.remove_connection(id) {
            Some(connection) => {
                tracing::info!(connection = ?id, label = %connection.label, "Deleted connection");
                true
            }
            None => {
                tracing::debug!(connection = ?id, "Connection already gone");
                false
            }
        }
    }

    /// Write the document back to its file
    pub fn save(&mut self) -> Result<(), PersistError> {
        self.store.save(&mut self.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetgraph_editor_graph::{Node, NodeKind, DEFAULT_INPUT_LABEL};

    fn filter(name: &str, x: f32) -> Node {
        Node::builder(NodeKind::Filter, name)
            .script_path(format!("{name}.cs"))
            .output("main")
            .position(x, 0.0)
            .build()
            .unwrap()
    }

    fn session_with_two_filters(dir: &tempfile::TempDir) -> (EditorSession, NodeId, NodeId) {
        let mut settings = EditorSettings::default();
        settings.data_dir = dir.path().join("Temp");
        let mut session = EditorSession::open(&settings).unwrap();
        let a = session.document_mut().add_node(filter("A", 0.0)).unwrap();
        let b = session.document_mut().add_node(filter("B", 300.0)).unwrap();
        session.save().unwrap();
        (session, a, b)
    }

    fn start_drag(session: &mut EditorSession, node: NodeId) {
        let point = session.document().connection_point_by_label(node, "main").unwrap().id;
        session.dispatch(GraphEvent::HandleStarted { node, point, pos: Pos2::ZERO });
    }

    #[test]
    fn test_open_bootstraps_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = EditorSettings::default();
        settings.data_dir = dir.path().join("Temp");

        let session = EditorSession::open(&settings).unwrap();
        assert_eq!(session.document().node_count(), 0);
        assert!(settings.graph_path().exists());

        let reopened = EditorSession::open(&settings).unwrap();
        assert_eq!(reopened.store().last_loaded(), session.store().last_loaded());
    }

    #[test]
    fn test_connect_then_delete_from_menu() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, a, b) = session_with_two_filters(&dir);

        start_drag(&mut session, a);
        let outcome = session.dispatch(GraphEvent::Dropped { pos: Pos2::new(301.0, 35.0) });
        assert!(matches!(outcome, EngineOutcome::Connected(_)));

        let b_in = session.document().connection_point_by_label(b, DEFAULT_INPUT_LABEL).unwrap().id;
        session.dispatch(GraphEvent::ReceiveTapped { node: b, point: b_in });
        assert_eq!(session.pending_menu().len(), 1);
        assert_eq!(session.pending_menu()[0].description, "from A:main");

        let chosen = session.choose(0).unwrap();
        assert_eq!(session.document().connection_count(), 0);
        assert!(session.pending_menu().is_empty());
        assert!(!session.delete_connection(chosen.connection));
    }

    #[test]
    fn test_menu_closes_on_next_event() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, a, _) = session_with_two_filters(&dir);
        start_drag(&mut session, a);
        session.dispatch(GraphEvent::Dropped { pos: Pos2::new(301.0, 35.0) });

        let a_main = session.document().connection_point_by_label(a, "main").unwrap().id;
        session.dispatch(GraphEvent::ReceiveTapped { node: a, point: a_main });
        assert_eq!(session.pending_menu().len(), 1);

        session.dispatch(GraphEvent::Other);
        assert!(session.pending_menu().is_empty());
        assert!(session.choose(0).is_none());
        assert_eq!(session.document().connection_count(), 1);
    }

    #[test]
    fn test_unchanged_reload_keeps_drag() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, a, _) = session_with_two_filters(&dir);

        start_drag(&mut session, a);
        assert_eq!(session.reload().unwrap(), ReloadOutcome::Unchanged);
        assert!(session.engine().is_connecting());

        let outcome = session.dispatch(GraphEvent::Dropped { pos: Pos2::new(301.0, 35.0) });
        assert!(matches!(outcome, EngineOutcome::Connected(_)));
    }

    #[test]
    fn test_external_change_rebuilds() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, a, _) = session_with_two_filters(&dir);
        let path = session.store().path().to_path_buf();

        // Another editor instance adds a node and saves
        let mut other = EditorSession::open_at(&EditorSettings::default(), &path).unwrap();
        other.document_mut().add_node(filter("C", 600.0)).unwrap();
        other.save().unwrap();

        start_drag(&mut session, a);
        assert_eq!(session.reload().unwrap(), ReloadOutcome::Reloaded);
        assert_eq!(session.document().node_count(), 3);
        assert!(!session.engine().is_connecting());
    }

    #[test]
    fn test_save_round_trips_connections() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, a, b) = session_with_two_filters(&dir);
        start_drag(&mut session, a);
        session.dispatch(GraphEvent::Dropped { pos: Pos2::new(301.0, 35.0) });
        session.save().unwrap();

        let reopened =
            EditorSession::open_at(&EditorSettings::default(), session.store().path()).unwrap();
        let connection = reopened.document().connections().next().unwrap();
        assert_eq!(connection.label, "main");
        assert_eq!((connection.start.node, connection.end.node), (a, b));
    }

    #[test]
    fn test_replayed_gestures() {
        let dir = tempfile::tempdir().unwrap();
        let (mut session, a, b) = session_with_two_filters(&dir);

        let outcome = session.replay_drag(b, DEFAULT_INPUT_LABEL, a, "main").unwrap();
        assert!(matches!(outcome, EngineOutcome::Connected(_)));
        let outcome = session.replay_drag(a, "main", b, DEFAULT_INPUT_LABEL).unwrap();
        assert_eq!(outcome, EngineOutcome::None);
        assert_eq!(session.replay_drag(a, "main", a, DEFAULT_INPUT_LABEL).unwrap(), EngineOutcome::None);
        assert_eq!(session.document().connection_count(), 1);

        let menu = session.tap(a, "main").unwrap();
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].title(), format!("delete connection:main to B:{DEFAULT_INPUT_LABEL}"));

        assert!(matches!(
            session.tap(a, "nope"),
            Err(LookupError::NoSuchPoint { .. })
        ));
    }
}
