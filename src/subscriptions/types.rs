//! Monitor types for live value updates.

use crate::types::{NodeId, Timestamp, TypeTag};
use crate::variant::Variant;
use serde::{Deserialize, Serialize};

/// Configuration for a monitor.
#[derive(Clone, Debug)]
pub struct MonitorConfig {
    /// Max buffered events before the monitor is dropped.
    /// Default: 256
    pub buffer_size: usize,

    /// Filter criteria.
    pub filter: MonitorFilter,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            buffer_size: 256,
            filter: MonitorFilter::default(),
        }
    }
}

/// Filter criteria for monitors.
#[derive(Clone, Debug, Default)]
pub struct MonitorFilter {
    /// Restrict to these nodes (None = all nodes).
    pub nodes: Option<Vec<NodeId>>,

    /// Include value-change events.
    pub include_values: bool,

    /// Include node add/remove events.
    pub include_topology: bool,
}

impl MonitorFilter {
    /// Value changes on every node.
    pub fn values() -> Self {
        Self {
            include_values: true,
            ..Default::default()
        }
    }

    /// Value changes on specific nodes.
    pub fn values_of(nodes: Vec<NodeId>) -> Self {
        Self {
            nodes: Some(nodes),
            include_values: true,
            ..Default::default()
        }
    }

    /// Node add/remove events only.
    pub fn topology() -> Self {
        Self {
            include_topology: true,
            ..Default::default()
        }
    }

    /// Everything.
    pub fn all() -> Self {
        Self {
            include_values: true,
            include_topology: true,
            ..Default::default()
        }
    }
}

/// Events delivered to monitors.
///
/// `ValueChanged` carries the node's new variant by value; handlers that
/// want typed access wrap it with a non-owning
/// [`crate::ArrayHandle::attach`] for the duration of handling.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeEvent {
    /// A node's value was written.
    ValueChanged {
        node: NodeId,
        value: Variant,
        timestamp: Timestamp,
    },

    /// A node was added to the address space.
    NodeAdded { node: NodeId, tag: TypeTag },

    /// A node was removed from the address space.
    NodeRemoved { node: NodeId },

    /// The monitor was dropped.
    Dropped { reason: DropReason },
}

/// Why a monitor was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Receiver was disconnected.
    Disconnected,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Unique identifier for a monitor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MonitorId(pub u64);

/// Handle for receiving a monitor's events.
pub struct MonitorHandle {
    pub id: MonitorId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<NodeEvent>,
}

impl MonitorHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<NodeEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<NodeEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<NodeEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}
