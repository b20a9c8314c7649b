//! # varray
//!
//! Ownership-aware typed array handles over tagged variants, with an
//! in-process attribute session and live value subscriptions.
//!
//! ## Core Concepts
//!
//! - **Variant**: a tagged, length-carrying container for a homogeneous
//!   array of one runtime-identified element type
//! - **ArrayHandle**: the statically-typed wrapper around one variant,
//!   checked once at the untyped→typed boundary, owning or borrowing its
//!   buffer
//! - **Session**: a node → variant address space behind the `Endpoint`
//!   seam, producing and consuming variants
//! - **Monitors**: bounded-channel subscriptions to value and topology
//!   changes
//!
//! ## Example
//!
//! ```ignore
//! use varray::{ArrayHandle, Endpoint, MemorySession, NodeId, Variant};
//!
//! let session = MemorySession::new();
//! let node = NodeId::string(1, "the.answer");
//! session.register_node(node.clone(), Variant::from_slice(&[40i32, 41]))?;
//!
//! // Read the node into a typed handle, grow it, write it back.
//! let var = session.read_attribute(&node)?;
//! let len = var.len();
//! let mut array = ArrayHandle::<i32>::adopt(var, len)?;
//! array.append(42)?;
//! session.write_attribute(&node, array.variant())?;
//! ```

pub mod array;
pub mod error;
pub mod registry;
pub mod session;
pub mod subscriptions;
pub mod types;
pub mod variant;

// Re-exports
pub use array::ArrayHandle;
pub use error::{Error, Result};
pub use registry::Scalar;
pub use session::{Endpoint, MemorySession, SessionConfig};
pub use subscriptions::{
    DropReason, MonitorConfig, MonitorFilter, MonitorHandle, MonitorId, NodeEvent,
    SubscriptionManager,
};
pub use types::{Identifier, NodeId, Timestamp, TypeTag};
pub use variant::Variant;
