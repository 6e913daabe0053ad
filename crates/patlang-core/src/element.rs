//! Placed node and edge instances.
//!
//! A [`NodeInstance`] is one occurrence of a box type on the canvas; an
//! [`EdgeInstance`] is one wire between a specific output port and a
//! specific input port. Instances are created by canvas gestures; the
//! validation engine only reads them, and only appends edges through the
//! accept path of connection validation.

use serde::{Deserialize, Serialize};

use crate::{
    handle::Handle,
    identifier::{BoxTypeId, EdgeId, NodeId},
};

/// Canvas position of a placed node.
///
/// Owned by the canvas collaborator; the engine carries it opaquely so
/// snapshots round-trip without loss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// The payload of a placed node: which box type it instantiates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// The box type this node is an instance of.
    #[serde(rename = "type")]
    pub box_type: BoxTypeId,
}

/// One placed box on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInstance {
    /// Unique id of this placement within its diagram.
    pub id: NodeId,
    /// Canvas position.
    #[serde(default)]
    pub position: Position,
    /// Node payload.
    pub data: NodeData,
}

impl NodeInstance {
    /// Convenience constructor used by canvas drop handling and tests.
    pub fn new(id: impl Into<NodeId>, box_type: impl Into<BoxTypeId>, position: Position) -> Self {
        Self {
            id: id.into(),
            position,
            data: NodeData {
                box_type: box_type.into(),
            },
        }
    }

    /// Returns the box type this node instantiates.
    pub fn box_type(&self) -> &BoxTypeId {
        &self.data.box_type
    }
}

/// One wire between an output port and an input port.
///
/// Handles are stored parsed; they serialize back to the `out-<n>` /
/// `in-<n>` string form the canvas and the snapshot payload use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeInstance {
    /// Unique id of this wire within its diagram.
    pub id: EdgeId,
    /// Source node id.
    pub source: NodeId,
    /// Source output port.
    #[serde(rename = "sourceHandle")]
    pub source_handle: Handle,
    /// Target node id.
    pub target: NodeId,
    /// Target input port.
    #[serde(rename = "targetHandle")]
    pub target_handle: Handle,
}
