//! The patlang validation engine.
//!
//! Patlang diagrams are boxes wired together by typed connections. This
//! crate holds the engine behind the canvas: the [`catalog`] of wire
//! types, box types, diagrams, and equations; the live [`graph`] being
//! edited; [`connect`]ion validation with its accept/reject rule chain;
//! completeness and equation rules in [`validate`]; dangling-reference
//! sweeps in [`orphan`]; and the [`session`] that ties them together with
//! debounced [`snapshot`] persistence.
//!
//! The usual flow: [`snapshot::import`] a saved document into a
//! [`Session`], mutate it through the session's methods (each mutation
//! arms the autosave), drive [`Session::poll_autosave`] with a clock and a
//! [`SnapshotSink`], and run [`validate::validate_all`] before handing the
//! catalog to the code generator.

pub mod catalog;
pub mod connect;
pub mod error;
pub mod graph;
pub mod orphan;
pub mod session;
pub mod snapshot;
pub mod validate;

pub use catalog::{Catalog, SectionKey};
pub use connect::{Candidate, EdgeStyle, Rejection, preview_style, validate_connection};
pub use error::PatlangError;
pub use graph::DiagramGraph;
pub use orphan::{Orphan, find_orphans};
pub use session::{DEFAULT_DEBOUNCE, DebouncedSave, Session, SnapshotSink};
pub use snapshot::Snapshot;
pub use validate::{CompletenessScope, Violation, validate_all};
