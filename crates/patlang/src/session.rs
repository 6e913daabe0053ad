//! The editing session: live graph, catalog, and debounced persistence.
//!
//! [`Session`] is the single mutable state container. Every mutation goes
//! through it so that the autosave debounce sees each change, and so the
//! open-diagram transition can keep the live graph and the stored diagrams
//! consistent.
//!
//! Persistence is pull-based: mutations only arm a deadline, and the host
//! drives [`Session::poll_autosave`] with a clock and a [`SnapshotSink`].
//! This keeps the engine free of timer threads and makes the debounce
//! window testable with plain `Instant` arithmetic.

use std::time::{Duration, Instant};

use log::{debug, info};

use patlang_core::{element::NodeInstance, identifier::DiagramId};

use crate::{
    catalog::Catalog,
    connect::{Candidate, EdgeStyle, Rejection},
    error::PatlangError,
    graph::DiagramGraph,
    snapshot::{self, Snapshot},
};

/// How long a session stays dirty before a write becomes due.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Debounce state for autosave: a sliding deadline armed by mutations.
///
/// Each mark pushes the deadline out by the full window, so a burst of
/// edits coalesces into one write after the burst ends.
#[derive(Debug, Clone)]
pub struct DebouncedSave {
    window: Duration,
    deadline: Option<Instant>,
}

impl DebouncedSave {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Records a mutation at `now`, (re)arming the deadline.
    pub fn mark_dirty(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Returns true while a write is armed but not yet taken.
    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Takes the deadline if it has passed. Returns true at most once per
    /// armed window.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Disarms any pending write without flushing it.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

impl Default for DebouncedSave {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

/// Destination for autosaved snapshots.
pub trait SnapshotSink {
    fn write(&mut self, snapshot: &Snapshot) -> Result<(), PatlangError>;
}

/// The mutable state of one editing session.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Catalog,
    graph: DiagramGraph,
    autosave: DebouncedSave,
}

impl Default for Session {
    /// A fresh session: default catalog with its single opened diagram,
    /// and an empty live graph.
    fn default() -> Self {
        Self::from_parts(Catalog::default(), DiagramGraph::default())
    }
}

impl Session {
    pub fn from_parts(catalog: Catalog, graph: DiagramGraph) -> Self {
        Self {
            catalog,
            graph,
            autosave: DebouncedSave::default(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn graph(&self) -> &DiagramGraph {
        &self.graph
    }

    /// Mutable catalog access for the editing collaborators. Any use is
    /// assumed to be a mutation and arms the autosave.
    pub fn catalog_mut(&mut self, now: Instant) -> &mut Catalog {
        self.autosave.mark_dirty(now);
        &mut self.catalog
    }

    /// Places a node on the live graph after resolving its box type.
    pub fn add_node(&mut self, node: NodeInstance, now: Instant) -> Result<(), PatlangError> {
        if self.catalog.box_type(node.box_type()).is_none() {
            return Err(PatlangError::UnknownBoxType(node.box_type().clone()));
        }
        self.graph.add_node(node);
        self.autosave.mark_dirty(now);
        Ok(())
    }

    /// Runs connection validation and appends the edge on acceptance.
    /// Rejections leave both the graph and the autosave deadline alone.
    pub fn connect(&mut self, candidate: Candidate, now: Instant) -> Result<EdgeStyle, Rejection> {
        let style = self.graph.try_connect(candidate, &self.catalog)?;
        self.autosave.mark_dirty(now);
        Ok(style)
    }

    /// Switches the opened diagram.
    ///
    /// The live graph is first written back into the diagram it belongs to,
    /// then `target` becomes the single diagram with `opened` set and its
    /// stored nodes and edges are loaded as the new live graph. An unknown
    /// target fails before any state changes.
    pub fn open_diagram(&mut self, target: &DiagramId, now: Instant) -> Result<(), PatlangError> {
        if self.catalog.diagram(target).is_none() {
            return Err(PatlangError::UnknownDiagram(target.clone()));
        }

        self.persist_live_graph();

        let mut loaded = DiagramGraph::default();
        for diagram in self.catalog.diagrams_mut() {
            diagram.opened = &diagram.id == target;
            if diagram.opened {
                loaded = DiagramGraph::new(diagram.nodes.clone(), diagram.edges.clone());
            }
        }
        self.graph = loaded;
        self.autosave.mark_dirty(now);
        info!(diagram = target.as_str(); "Opened diagram");
        Ok(())
    }

    /// Writes the live graph back into the opened diagram's stored state.
    fn persist_live_graph(&mut self) {
        let (nodes, edges) = self.graph.to_parts();
        if let Some(diagram) = self.catalog.diagrams_mut().find(|d| d.opened) {
            diagram.nodes = nodes;
            diagram.edges = edges;
        }
    }

    /// Drives the autosave. When the debounce deadline has passed, folds
    /// the live graph into the opened diagram, exports a snapshot, and
    /// hands it to `sink`. Returns whether a write happened.
    pub fn poll_autosave(
        &mut self,
        now: Instant,
        sink: &mut dyn SnapshotSink,
    ) -> Result<bool, PatlangError> {
        if !self.autosave.poll(now) {
            return Ok(false);
        }
        self.persist_live_graph();
        let snapshot = snapshot::export(self)?;
        sink.write(&snapshot)?;
        debug!("Autosaved session snapshot");
        Ok(true)
    }

    /// Tears the session down. A pending autosave is dropped, not flushed;
    /// an exit during the debounce window loses at most that window's
    /// edits.
    pub fn teardown(&mut self) {
        self.autosave.cancel();
    }

    /// Whether an autosave is armed but not yet written.
    pub fn autosave_pending(&self) -> bool {
        self.autosave.pending()
    }
}

#[cfg(test)]
mod tests {
    use patlang_core::{
        element::Position,
        item::{BoxType, Diagram},
    };

    use super::*;

    struct RecordingSink {
        writes: usize,
    }

    impl SnapshotSink for RecordingSink {
        fn write(&mut self, _snapshot: &Snapshot) -> Result<(), PatlangError> {
            self.writes += 1;
            Ok(())
        }
    }

    fn session_with_two_diagrams() -> Session {
        let mut session = Session::default();
        let now = Instant::now();
        session.catalog_mut(now).insert_diagram(Diagram {
            id: "d-other".into(),
            label: "Other".into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            opened: false,
        });
        session.catalog_mut(now).insert_box_type(BoxType {
            id: "b-src".into(),
            label: "Source".into(),
            color: "#333333".into(),
            kind: Default::default(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        });
        session
    }

    #[test]
    fn open_snapshots_live_graph_and_swaps_flags() {
        let mut session = session_with_two_diagrams();
        let now = Instant::now();
        session
            .add_node(NodeInstance::new("n1", "b-src", Position::default()), now)
            .unwrap();

        session.open_diagram(&"d-other".into(), now).unwrap();

        // The node placed while `init-diag` was open is stored with it.
        let stored = session.catalog().diagram(&"init-diag".into()).unwrap();
        assert_eq!(stored.nodes.len(), 1);
        assert!(!stored.opened);

        let opened = session.catalog().opened_diagram().unwrap();
        assert_eq!(opened.id, "d-other".into());
        // Exactly one diagram holds the flag.
        assert_eq!(session.catalog().diagrams().filter(|d| d.opened).count(), 1);
        // The live graph now shows the (empty) target.
        assert!(session.graph().nodes().is_empty());
    }

    #[test]
    fn reopening_restores_stored_state() {
        let mut session = session_with_two_diagrams();
        let now = Instant::now();
        session
            .add_node(NodeInstance::new("n1", "b-src", Position::default()), now)
            .unwrap();

        session.open_diagram(&"d-other".into(), now).unwrap();
        session.open_diagram(&"init-diag".into(), now).unwrap();

        assert_eq!(session.graph().nodes().len(), 1);
        assert_eq!(session.graph().nodes()[0].id, "n1".into());
    }

    #[test]
    fn opening_unknown_diagram_changes_nothing() {
        let mut session = session_with_two_diagrams();
        let now = Instant::now();
        session
            .add_node(NodeInstance::new("n1", "b-src", Position::default()), now)
            .unwrap();

        let err = session.open_diagram(&"d-ghost".into(), now).unwrap_err();
        assert!(matches!(err, PatlangError::UnknownDiagram(_)));

        // Live graph and flags are untouched.
        assert_eq!(session.graph().nodes().len(), 1);
        assert_eq!(
            session.catalog().opened_diagram().unwrap().id,
            "init-diag".into()
        );
    }

    #[test]
    fn adding_node_with_unknown_box_type_fails() {
        let mut session = Session::default();
        let err = session
            .add_node(
                NodeInstance::new("n1", "b-ghost", Position::default()),
                Instant::now(),
            )
            .unwrap_err();
        assert!(matches!(err, PatlangError::UnknownBoxType(_)));
        assert!(session.graph().nodes().is_empty());
    }

    #[test]
    fn autosave_waits_out_the_debounce_window() {
        let mut session = session_with_two_diagrams();
        let mut sink = RecordingSink { writes: 0 };
        let start = Instant::now();

        assert!(session.autosave_pending());
        // Inside the window: nothing written.
        assert!(!session.poll_autosave(start, &mut sink).unwrap());
        assert_eq!(sink.writes, 0);

        // Past the window: exactly one write, then quiescent.
        let later = start + DEFAULT_DEBOUNCE + Duration::from_millis(1);
        assert!(session.poll_autosave(later, &mut sink).unwrap());
        assert!(!session.poll_autosave(later, &mut sink).unwrap());
        assert_eq!(sink.writes, 1);
        assert!(!session.autosave_pending());
    }

    #[test]
    fn edits_inside_the_window_coalesce() {
        let mut session = session_with_two_diagrams();
        let mut sink = RecordingSink { writes: 0 };
        let start = Instant::now();

        let step = Duration::from_millis(200);
        session
            .add_node(
                NodeInstance::new("n1", "b-src", Position::default()),
                start + step,
            )
            .unwrap();
        session
            .add_node(
                NodeInstance::new("n2", "b-src", Position::default()),
                start + step * 2,
            )
            .unwrap();

        // 500ms after the first edit, but only 300ms after the second.
        assert!(
            !session
                .poll_autosave(start + step + DEFAULT_DEBOUNCE, &mut sink)
                .unwrap()
        );
        assert!(
            session
                .poll_autosave(start + step * 2 + DEFAULT_DEBOUNCE, &mut sink)
                .unwrap()
        );
        assert_eq!(sink.writes, 1);
    }

    #[test]
    fn teardown_drops_pending_autosave() {
        let mut session = session_with_two_diagrams();
        let mut sink = RecordingSink { writes: 0 };
        let start = Instant::now();

        assert!(session.autosave_pending());
        session.teardown();
        assert!(!session.autosave_pending());
        assert!(
            !session
                .poll_autosave(start + DEFAULT_DEBOUNCE * 2, &mut sink)
                .unwrap()
        );
        assert_eq!(sink.writes, 0);
    }
}
