//! Connection validation and the connection preview query.
//!
//! The canvas collaborator proposes a [`Candidate`] edge whenever the user
//! finishes a connect gesture. [`validate_connection`] decides accept or
//! reject by running a fixed rule chain; there is no tie-break or priority
//! beyond the sequential rules, and reaching the end of the chain is the
//! only accept path:
//!
//! 1. parse both port references (`out-<n>` / `in-<n>`),
//! 2. resolve both nodes and their box types,
//! 3. read the wire type at the source output index and the target input
//!    index,
//! 4. require exact wire-type identity (no coercion, no compatibility
//!    hierarchy),
//! 5. require the target input port to be free (fan-in ≤ 1; the existing
//!    edge is never displaced, the candidate is refused),
//! 6. resolve the wire type's display color into the returned style hint.
//!
//! Every failure is data, a [`Rejection`] naming the rule that fired, never
//! a fault. A rejected candidate is final until the caller constructs a new
//! one.

use std::fmt;

use log::debug;
use thiserror::Error;

use patlang_core::{
    color::Color,
    element::EdgeInstance,
    handle::{Direction, Handle},
    identifier::{BoxTypeId, EdgeId, NodeId, WireTypeId},
    item::BoxType,
};

use crate::{catalog::Catalog, graph::DiagramGraph};

/// Stroke width the canvas renders accepted edges with.
pub const STROKE_WIDTH: f32 = 3.0;

/// A proposed edge, exactly as the connect gesture hands it over: node ids
/// plus raw handle strings that have not been parsed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: EdgeId,
    pub source: NodeId,
    pub source_handle: String,
    pub target: NodeId,
    pub target_handle: String,
}

/// Rendering hint for an accepted edge. Data only; the engine never draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStyle {
    /// Display color of the connecting wire type, when it parses.
    pub stroke: Option<Color>,
    pub stroke_width: f32,
}

impl EdgeStyle {
    fn for_wire(wire: &WireTypeId, catalog: &Catalog) -> Self {
        Self {
            stroke: catalog.wire_type(wire).and_then(|w| w.display_color()),
            stroke_width: STROKE_WIDTH,
        }
    }
}

/// Which end of a candidate a rejection refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Source,
    Target,
}

impl fmt::Display for End {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            End::Source => "source",
            End::Target => "target",
        })
    }
}

/// Why a candidate edge was refused.
///
/// A handle that parses but points the wrong way (an `in-` handle used as a
/// connection source, or vice versa) counts as malformed: indexing the
/// opposite port list with it would be a silent category error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("malformed {end} port reference `{handle}`")]
    MalformedHandle { end: End, handle: String },

    #[error("{end} node `{node}` does not exist in the live graph")]
    UnknownNode { end: End, node: NodeId },

    #[error("{end} node `{node}` has unresolved box type `{box_type}`")]
    UnresolvedBoxType {
        end: End,
        node: NodeId,
        box_type: BoxTypeId,
    },

    #[error("{end} port index {index} is out of range for box type `{box_type}`")]
    PortOutOfRange {
        end: End,
        box_type: BoxTypeId,
        index: usize,
    },

    #[error("wire type mismatch: source carries `{source}`, target expects `{target}`")]
    TypeMismatch {
        source: WireTypeId,
        target: WireTypeId,
    },

    #[error("input port {index} of node `{node}` already has an incoming edge")]
    InputOccupied { node: NodeId, index: usize },
}

/// Decides whether `candidate` is a legal edge against the live graph and
/// catalog. Pure: nothing is mutated either way.
pub fn validate_connection(
    candidate: &Candidate,
    graph: &DiagramGraph,
    catalog: &Catalog,
) -> Result<EdgeStyle, Rejection> {
    evaluate(candidate, graph, catalog).map(|accepted| accepted.style)
}

/// Validates `candidate` and appends the edge to `graph` on acceptance.
pub(crate) fn connect(
    candidate: Candidate,
    graph: &mut DiagramGraph,
    catalog: &Catalog,
) -> Result<EdgeStyle, Rejection> {
    match evaluate(&candidate, graph, catalog) {
        Ok(accepted) => {
            debug!(
                source = candidate.source.as_str(),
                target = candidate.target.as_str();
                "Accepted connection"
            );
            graph.push_edge(EdgeInstance {
                id: candidate.id,
                source: candidate.source,
                source_handle: accepted.source_handle,
                target: candidate.target,
                target_handle: accepted.target_handle,
            });
            Ok(accepted.style)
        }
        Err(rejection) => {
            debug!(
                source = candidate.source.as_str(),
                target = candidate.target.as_str(),
                reason = rejection.to_string().as_str();
                "Rejected connection"
            );
            Err(rejection)
        }
    }
}

struct Accepted {
    style: EdgeStyle,
    source_handle: Handle,
    target_handle: Handle,
}

fn parse_end(raw: &str, end: End, expected: Direction) -> Result<Handle, Rejection> {
    let malformed = || Rejection::MalformedHandle {
        end,
        handle: raw.to_owned(),
    };
    let handle: Handle = raw.parse().map_err(|_| malformed())?;
    if handle.direction() != expected {
        return Err(malformed());
    }
    Ok(handle)
}

fn resolve_box_type<'a>(
    node: &NodeId,
    end: End,
    graph: &DiagramGraph,
    catalog: &'a Catalog,
) -> Result<&'a BoxType, Rejection> {
    let instance = graph.node(node).ok_or_else(|| Rejection::UnknownNode {
        end,
        node: node.clone(),
    })?;
    catalog
        .box_type(instance.box_type())
        .ok_or_else(|| Rejection::UnresolvedBoxType {
            end,
            node: node.clone(),
            box_type: instance.box_type().clone(),
        })
}

fn evaluate(
    candidate: &Candidate,
    graph: &DiagramGraph,
    catalog: &Catalog,
) -> Result<Accepted, Rejection> {
    // 1. Parse both port references.
    let source_handle = parse_end(&candidate.source_handle, End::Source, Direction::Out)?;
    let target_handle = parse_end(&candidate.target_handle, End::Target, Direction::In)?;

    // 2. Resolve both endpoint box types.
    let source_box = resolve_box_type(&candidate.source, End::Source, graph, catalog)?;
    let target_box = resolve_box_type(&candidate.target, End::Target, graph, catalog)?;

    // 3. Read the wire type at each port index.
    let source_wire =
        source_box
            .outputs
            .get(source_handle.index())
            .ok_or(Rejection::PortOutOfRange {
                end: End::Source,
                box_type: source_box.id.clone(),
                index: source_handle.index(),
            })?;
    let target_wire =
        target_box
            .inputs
            .get(target_handle.index())
            .ok_or(Rejection::PortOutOfRange {
                end: End::Target,
                box_type: target_box.id.clone(),
                index: target_handle.index(),
            })?;

    // 4. Exact wire-type identity.
    if source_wire != target_wire {
        return Err(Rejection::TypeMismatch {
            source: source_wire.clone(),
            target: target_wire.clone(),
        });
    }

    // 5. Fan-in of at most one per input port.
    if graph.input_occupied(&candidate.target, target_handle.index()) {
        return Err(Rejection::InputOccupied {
            node: candidate.target.clone(),
            index: target_handle.index(),
        });
    }

    // 6. Style hint from the wire type's display color.
    Ok(Accepted {
        style: EdgeStyle::for_wire(source_wire, catalog),
        source_handle,
        target_handle,
    })
}

/// Live-feedback query for an in-progress connect gesture: the display
/// color of the wire type behind the port the gesture started from.
///
/// Returns `None` whenever the node, port, or wire type cannot be resolved;
/// the canvas simply shows no hint. Performs no mutation and is not part of
/// edge acceptance.
pub fn preview_style(
    node: &NodeId,
    handle: &str,
    graph: &DiagramGraph,
    catalog: &Catalog,
) -> Option<EdgeStyle> {
    let handle: Handle = handle.parse().ok()?;
    let instance = graph.node(node)?;
    let box_type = catalog.box_type(instance.box_type())?;
    let ports = match handle.direction() {
        Direction::Out => &box_type.outputs,
        Direction::In => &box_type.inputs,
    };
    let wire_id = ports.get(handle.index())?;
    let wire = catalog.wire_type(wire_id)?;
    Some(EdgeStyle {
        stroke: wire.display_color(),
        stroke_width: STROKE_WIDTH,
    })
}
