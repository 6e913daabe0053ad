//! Catalog item types.
//!
//! These are the entries a catalog section holds: wire types, box types,
//! diagrams, and equations. Their serde shapes match the snapshot payload
//! exactly: the stable identifier is carried in a `type` field, and
//! equation operands use the `lhs-type` / `rhs-type` keys.

use serde::{Deserialize, Serialize};

use crate::{
    color::Color,
    element::{EdgeInstance, NodeInstance},
    identifier::{BoxTypeId, DiagramId, EquationId, WireTypeId},
};

/// A named "signal kind" used to type ports.
///
/// Connections require exact wire-type identity; the display color is the
/// rendering hint attached to accepted edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireType {
    /// Stable identifier, unique within the wires section.
    #[serde(rename = "type")]
    pub id: WireTypeId,
    /// Human-readable name.
    pub label: String,
    /// Display color as a CSS color string.
    pub color: String,
}

impl WireType {
    /// Returns the parsed display [`Color`], or `None` if the stored color
    /// string is not a valid CSS color. An unparseable color never fails a
    /// validation; the style hint is simply absent.
    pub fn display_color(&self) -> Option<Color> {
        Color::new(&self.color).ok()
    }
}

/// Marks whether a box is an ordinary computation or a terminal sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxKind {
    /// An ordinary computation box.
    #[default]
    Normal,
    /// A terminal sink. Output-kind boxes are what equation validation
    /// compares across a diagram pair.
    Output,
}

/// A reusable definition of a computation unit with typed input and output
/// ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxType {
    /// Stable identifier, unique within the boxes section.
    #[serde(rename = "type")]
    pub id: BoxTypeId,
    /// Human-readable name.
    pub label: String,
    /// Display color as a CSS color string.
    pub color: String,
    /// Whether instances of this box act as terminal sinks.
    #[serde(default)]
    pub kind: BoxKind,
    /// Wire types of the input ports, in port-index order.
    #[serde(default)]
    pub inputs: Vec<WireTypeId>,
    /// Wire types of the output ports, in port-index order.
    #[serde(default)]
    pub outputs: Vec<WireTypeId>,
}

/// A named, independently editable graph of node and edge instances.
///
/// The stored nodes/edges are overwritten from the live graph whenever the
/// diagram loses `opened` status and read back when it gains it. At most one
/// diagram in a catalog is opened at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    /// Stable identifier, unique within the diagrams section.
    #[serde(rename = "type")]
    pub id: DiagramId,
    /// Human-readable name.
    pub label: String,
    /// Stored node instances, last snapshotted from the live graph.
    #[serde(default)]
    pub nodes: Vec<NodeInstance>,
    /// Stored edge instances, last snapshotted from the live graph.
    #[serde(default)]
    pub edges: Vec<EdgeInstance>,
    /// Whether this diagram is the one currently live-edited.
    #[serde(default)]
    pub opened: bool,
}

/// A named pairing of two diagrams for the code generator.
///
/// Either operand may be `null` while the equation is still being authored;
/// validation reports the missing side instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equation {
    /// Stable identifier, unique within the equations section.
    #[serde(rename = "type")]
    pub id: EquationId,
    /// Human-readable name.
    pub label: String,
    /// Left-hand side diagram reference.
    #[serde(rename = "lhs-type", default)]
    pub lhs: Option<DiagramId>,
    /// Right-hand side diagram reference.
    #[serde(rename = "rhs-type", default)]
    pub rhs: Option<DiagramId>,
}
