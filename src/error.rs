//! Error types for variant and session operations.

use crate::types::{NodeId, TypeTag};
use thiserror::Error;

/// Main error type for the crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: TypeTag, got: TypeTag },

    #[error("Length mismatch: claimed {claimed} elements, {available} available")]
    LengthMismatch { claimed: usize, available: usize },

    #[error("Index out of bounds: {index} >= {len}")]
    OutOfBounds { index: usize, len: usize },

    #[error("Operation `{op}` requires an owning handle")]
    NotOwning { op: &'static str },

    #[error("Allocation of {bytes} bytes failed")]
    Allocation { bytes: usize },

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node already exists: {0}")]
    NodeExists(NodeId),
}

/// Result type for crate operations.
pub type Result<T> = std::result::Result<T, Error>;
