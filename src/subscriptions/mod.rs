//! Monitor system for live value updates.
//!
//! This module provides in-process monitors over the session's address
//! space:
//! - Value changes (a node was written)
//! - Topology changes (a node was added or removed)
//!
//! Monitors support:
//! - Filtering by node and event class
//! - Bounded buffers with slow-consumer dropping
//!
//! # Example
//!
//! ```ignore
//! let handle = session.monitor(MonitorFilter::values_of(vec![node.clone()]));
//!
//! loop {
//!     match handle.recv() {
//!         Ok(NodeEvent::ValueChanged { value, .. }) => println!("new size {}", value.len()),
//!         Ok(NodeEvent::Dropped { .. }) => break,
//!         Err(_) => break,
//!         _ => {}
//!     }
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    DropReason, MonitorConfig, MonitorFilter, MonitorHandle, MonitorId, NodeEvent,
};
