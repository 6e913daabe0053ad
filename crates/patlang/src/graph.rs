//! The live diagram graph.
//!
//! [`DiagramGraph`] holds the node and edge instances of whichever diagram
//! is currently opened. Nodes are addressed by string id and ports by index,
//! matching the canvas collaborator's model, so the store is a flat pair of
//! lists with linear scans; diagrams are human-sized.
//!
//! The validators only read the graph. The two mutations are placing a node
//! (a canvas drop) and appending an edge through the accept path of
//! connection validation; rejected candidates leave the edge set untouched.

use log::trace;

use patlang_core::{
    element::{EdgeInstance, NodeInstance},
    handle::Handle,
    identifier::NodeId,
};

use crate::{
    catalog::Catalog,
    connect::{self, Candidate, EdgeStyle, Rejection},
};

/// Node/edge collection belonging to one diagram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagramGraph {
    nodes: Vec<NodeInstance>,
    edges: Vec<EdgeInstance>,
}

impl DiagramGraph {
    pub fn new(nodes: Vec<NodeInstance>, edges: Vec<EdgeInstance>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[NodeInstance] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeInstance] {
        &self.edges
    }

    /// Finds a placed node by id.
    pub fn node(&self, id: &NodeId) -> Option<&NodeInstance> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Returns true if some edge already targets the given input port.
    /// Fan-in is at most one per input port; fan-out is unbounded.
    pub fn input_occupied(&self, target: &NodeId, index: usize) -> bool {
        let handle = Handle::input(index);
        self.edges
            .iter()
            .any(|e| &e.target == target && e.target_handle == handle)
    }

    /// Places a node. The caller (the drop gesture) is responsible for
    /// having resolved the box type against the catalog first.
    pub fn add_node(&mut self, node: NodeInstance) {
        trace!(node = node.id.as_str(); "Placed node on live graph");
        self.nodes.push(node);
    }

    /// Runs connection validation for `candidate` and, on acceptance,
    /// appends the edge. The returned style hint carries the wire type's
    /// display color for the canvas to apply.
    pub fn try_connect(
        &mut self,
        candidate: Candidate,
        catalog: &Catalog,
    ) -> Result<EdgeStyle, Rejection> {
        connect::connect(candidate, self, catalog)
    }

    pub(crate) fn push_edge(&mut self, edge: EdgeInstance) {
        self.edges.push(edge);
    }

    /// Clones the node/edge lists, for snapshotting into a stored diagram.
    pub(crate) fn to_parts(&self) -> (Vec<NodeInstance>, Vec<EdgeInstance>) {
        (self.nodes.clone(), self.edges.clone())
    }
}
