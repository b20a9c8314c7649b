//! Monitor manager for broadcasting value and topology events.

use crate::types::{NodeId, Timestamp, TypeTag};
use crate::variant::Variant;
use crossbeam_channel::{bounded, Sender};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use super::types::{DropReason, MonitorConfig, MonitorHandle, MonitorId, NodeEvent};

/// Internal monitor state.
struct Monitor {
    config: MonitorConfig,
    sender: Sender<NodeEvent>,
}

impl Monitor {
    /// Try to send an event. Returns false if the buffer is full or the
    /// receiver is gone (the monitor will be dropped).
    fn try_send(&self, event: NodeEvent) -> bool {
        self.sender.try_send(event).is_ok()
    }

    fn matches_node(&self, node: &NodeId) -> bool {
        match &self.config.filter.nodes {
            Some(nodes) => nodes.contains(node),
            None => true,
        }
    }

    fn matches_value(&self, node: &NodeId) -> bool {
        self.config.filter.include_values && self.matches_node(node)
    }

    fn matches_topology(&self, node: &NodeId) -> bool {
        self.config.filter.include_topology && self.matches_node(node)
    }
}

/// Manages monitors and broadcasts events.
pub struct SubscriptionManager {
    /// Active monitors by ID.
    monitors: RwLock<HashMap<MonitorId, Monitor>>,
    /// Counter for generating monitor IDs.
    next_id: AtomicU64,
}

impl SubscriptionManager {
    /// Create a new subscription manager.
    pub fn new() -> Self {
        Self {
            monitors: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a new monitor.
    ///
    /// Returns a handle for receiving events. Events delivered from here
    /// on are buffered up to `config.buffer_size`; a monitor that falls
    /// behind is dropped rather than blocking the writer.
    pub fn subscribe(&self, config: MonitorConfig) -> MonitorHandle {
        let id = MonitorId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(config.buffer_size);

        self.monitors.write().insert(id, Monitor { config, sender });
        debug!(monitor = id.0, "monitor created");

        MonitorHandle { id, receiver }
    }

    /// Unsubscribe and clean up.
    pub fn unsubscribe(&self, id: MonitorId) {
        let mut monitors = self.monitors.write();
        if let Some(monitor) = monitors.remove(&id) {
            // Notify about the drop (best effort).
            let _ = monitor.sender.try_send(NodeEvent::Dropped {
                reason: DropReason::Unsubscribed,
            });
        }
    }

    /// Get monitor count.
    pub fn monitor_count(&self) -> usize {
        self.monitors.read().len()
    }

    // --- Broadcasting ---

    /// Broadcast a value change to matching monitors.
    pub fn notify_value(&self, node: &NodeId, value: &Variant) {
        let event = NodeEvent::ValueChanged {
            node: node.clone(),
            value: value.clone(),
            timestamp: Timestamp::now(),
        };

        self.broadcast(|m| m.matches_value(node), event);
    }

    /// Broadcast a node addition to matching monitors.
    pub fn notify_added(&self, node: &NodeId, tag: TypeTag) {
        let event = NodeEvent::NodeAdded {
            node: node.clone(),
            tag,
        };

        self.broadcast(|m| m.matches_topology(node), event);
    }

    /// Broadcast a node removal to matching monitors.
    pub fn notify_removed(&self, node: &NodeId) {
        let event = NodeEvent::NodeRemoved { node: node.clone() };

        self.broadcast(|m| m.matches_topology(node), event);
    }

    /// Internal broadcast helper. Drops monitors that fail to receive.
    fn broadcast<F>(&self, filter: F, event: NodeEvent)
    where
        F: Fn(&Monitor) -> bool,
    {
        let mut to_remove = Vec::new();

        {
            let monitors = self.monitors.read();
            for (id, monitor) in monitors.iter() {
                if filter(monitor) && !monitor.try_send(event.clone()) {
                    to_remove.push(*id);
                }
            }
        }

        if !to_remove.is_empty() {
            let mut monitors = self.monitors.write();
            for id in to_remove {
                if let Some(monitor) = monitors.remove(&id) {
                    debug!(monitor = id.0, "dropping slow monitor");
                    // Try to notify about the drop (might fail, that's ok).
                    let _ = monitor.sender.try_send(NodeEvent::Dropped {
                        reason: DropReason::BufferOverflow,
                    });
                }
            }
        }
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}
