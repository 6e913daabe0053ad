//! Error types for patlang engine operations.
//!
//! This module provides the main error type [`PatlangError`]. Rule failures
//! (rejected connections, equation violations, orphaned references) are
//! ordinary return values, never errors; `PatlangError` covers I/O,
//! malformed snapshot payloads, and operations addressed at entries that do
//! not exist.

use std::io;

use thiserror::Error;

use patlang_core::identifier::{BoxTypeId, DiagramId};

/// The main error type for patlang engine operations.
#[derive(Debug, Error)]
pub enum PatlangError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A snapshot payload could not be parsed as the expected structure.
    /// Import is all-or-nothing: when this is returned, no state changed.
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unknown diagram `{0}`")]
    UnknownDiagram(DiagramId),

    #[error("unknown box type `{0}`")]
    UnknownBoxType(BoxTypeId),

    /// A durable-storage sink failed to apply a snapshot write.
    #[error("persistence error: {0}")]
    Persist(String),
}
