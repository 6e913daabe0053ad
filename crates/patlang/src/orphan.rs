//! Dangling-reference detection.
//!
//! Catalog entries refer to each other by id: box ports name wire types,
//! node instances name box types, edges name nodes, equation operands name
//! diagrams. Deleting an entry does not cascade, so a reference can outlive
//! its target. The validators treat such references as silent "no match";
//! this pass makes them visible instead, as a diagnostic sweep over the
//! whole catalog plus the live graph.

use std::fmt;

use log::debug;
use thiserror::Error;

use patlang_core::{
    element::{EdgeInstance, NodeInstance},
    handle::Direction,
    identifier::{BoxTypeId, DiagramId, EdgeId, EquationId, NodeId, WireTypeId},
};

use crate::{catalog::Catalog, graph::DiagramGraph, validate::Side};

/// Where a dangling reference was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    LiveGraph,
    Diagram(DiagramId),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::LiveGraph => f.write_str("live graph"),
            Location::Diagram(id) => write!(f, "diagram `{id}`"),
        }
    }
}

fn port_noun(direction: &Direction) -> &'static str {
    match direction {
        Direction::In => "input",
        Direction::Out => "output",
    }
}

/// One reference whose target no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Orphan {
    #[error("box type `{box_type}`: {} port {index} references unknown wire type `{wire_type}`",
        port_noun(.direction))]
    WirePort {
        box_type: BoxTypeId,
        direction: Direction,
        index: usize,
        wire_type: WireTypeId,
    },

    #[error("{location}: node `{node}` references unknown box type `{box_type}`")]
    NodeBoxType {
        location: Location,
        node: NodeId,
        box_type: BoxTypeId,
    },

    #[error("{location}: edge `{edge}` references unknown node `{node}`")]
    EdgeEndpoint {
        location: Location,
        edge: EdgeId,
        node: NodeId,
    },

    #[error("equation `{equation}`: {side} references unknown diagram `{diagram}`")]
    EquationOperand {
        equation: EquationId,
        side: Side,
        diagram: DiagramId,
    },
}

/// Sweeps the catalog and the live graph for dangling references.
///
/// A missing equation operand (`None`) is not an orphan, since nothing
/// dangles; equation validation reports it separately.
pub fn find_orphans(catalog: &Catalog, graph: &DiagramGraph) -> Vec<Orphan> {
    let mut orphans = Vec::new();

    for box_type in catalog.box_types() {
        let ports = [
            (Direction::In, &box_type.inputs),
            (Direction::Out, &box_type.outputs),
        ];
        for (direction, wires) in ports {
            for (index, wire) in wires.iter().enumerate() {
                if catalog.wire_type(wire).is_none() {
                    orphans.push(Orphan::WirePort {
                        box_type: box_type.id.clone(),
                        direction,
                        index,
                        wire_type: wire.clone(),
                    });
                }
            }
        }
    }

    for diagram in catalog.diagrams() {
        sweep_elements(
            catalog,
            Location::Diagram(diagram.id.clone()),
            &diagram.nodes,
            &diagram.edges,
            &mut orphans,
        );
    }
    sweep_elements(
        catalog,
        Location::LiveGraph,
        graph.nodes(),
        graph.edges(),
        &mut orphans,
    );

    for equation in catalog.equations() {
        let operands = [(Side::Lhs, &equation.lhs), (Side::Rhs, &equation.rhs)];
        for (side, operand) in operands {
            if let Some(diagram) = operand {
                if catalog.diagram(diagram).is_none() {
                    orphans.push(Orphan::EquationOperand {
                        equation: equation.id.clone(),
                        side,
                        diagram: diagram.clone(),
                    });
                }
            }
        }
    }

    debug!(orphans = orphans.len(); "Swept catalog for dangling references");
    orphans
}

fn sweep_elements(
    catalog: &Catalog,
    location: Location,
    nodes: &[NodeInstance],
    edges: &[EdgeInstance],
    orphans: &mut Vec<Orphan>,
) {
    for node in nodes {
        if catalog.box_type(node.box_type()).is_none() {
            orphans.push(Orphan::NodeBoxType {
                location: location.clone(),
                node: node.id.clone(),
                box_type: node.box_type().clone(),
            });
        }
    }
    for edge in edges {
        for endpoint in [&edge.source, &edge.target] {
            if !nodes.iter().any(|n| &n.id == endpoint) {
                orphans.push(Orphan::EdgeEndpoint {
                    location: location.clone(),
                    edge: edge.id.clone(),
                    node: endpoint.clone(),
                });
            }
        }
    }
}
