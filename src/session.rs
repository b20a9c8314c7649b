//! Attribute session: the endpoint seam and an in-process implementation.
//!
//! [`Endpoint`] is the boundary the array core interoperates with: it
//! produces variants (`read_attribute`) and consumes them
//! (`write_attribute`). [`MemorySession`] is an in-process address space
//! behind that seam, enough to exercise the core and feed monitors;
//! protocol errors are surfaced to the caller unchanged, never retried or
//! reinterpreted.

use crate::error::{Error, Result};
use crate::subscriptions::{
    MonitorConfig, MonitorFilter, MonitorHandle, MonitorId, SubscriptionManager,
};
use crate::types::NodeId;
use crate::variant::Variant;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use tracing::debug;

/// Session configuration.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Default per-monitor event buffer capacity.
    pub event_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { event_buffer: 256 }
    }
}

/// The protocol endpoint the array core reads from and writes to.
pub trait Endpoint {
    /// Read a node's current value. Returns a copy owned by the caller.
    fn read_attribute(&self, node: &NodeId) -> Result<Variant>;

    /// Write a node's value. The endpoint stores its own copy; the caller
    /// keeps ownership of `value`.
    fn write_attribute(&self, node: &NodeId, value: &Variant) -> Result<()>;
}

/// In-process attribute session.
///
/// Holds the node → variant address space, enforces tag stability per node
/// (a write must carry the tag the node was registered with), and
/// broadcasts every change to monitors.
pub struct MemorySession {
    /// Session configuration.
    config: SessionConfig,

    /// The address space.
    nodes: RwLock<HashMap<NodeId, Variant>>,

    /// Monitor manager.
    monitors: SubscriptionManager,

    /// Lock for write operations to keep map update and notification
    /// ordering atomic.
    write_lock: Mutex<()>,
}

impl MemorySession {
    /// Create a session with default configuration.
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Create a session with the given configuration.
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            config,
            nodes: RwLock::new(HashMap::new()),
            monitors: SubscriptionManager::new(),
            write_lock: Mutex::new(()),
        }
    }

    // --- Address space ---

    /// Add a node with its initial value. The initial value's tag becomes
    /// the node's tag for its whole lifetime.
    pub fn register_node(&self, node: NodeId, initial: Variant) -> Result<()> {
        let _lock = self.write_lock.lock();
        let tag = initial.tag();

        {
            let mut nodes = self.nodes.write();
            if nodes.contains_key(&node) {
                return Err(Error::NodeExists(node));
            }
            nodes.insert(node.clone(), initial);
        }

        debug!(node = %node, tag = %tag, "node registered");
        self.monitors.notify_added(&node, tag);
        Ok(())
    }

    /// Remove a node from the address space.
    pub fn remove_node(&self, node: &NodeId) -> Result<()> {
        let _lock = self.write_lock.lock();

        if self.nodes.write().remove(node).is_none() {
            return Err(Error::NodeNotFound(node.clone()));
        }

        debug!(node = %node, "node removed");
        self.monitors.notify_removed(node);
        Ok(())
    }

    /// Number of registered nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.read().len()
    }

    // --- Monitors ---

    /// Monitor matching events with the session's default buffer size.
    pub fn monitor(&self, filter: MonitorFilter) -> MonitorHandle {
        self.monitor_with(MonitorConfig {
            buffer_size: self.config.event_buffer,
            filter,
        })
    }

    /// Monitor with full configuration control.
    pub fn monitor_with(&self, config: MonitorConfig) -> MonitorHandle {
        self.monitors.subscribe(config)
    }

    /// Stop a monitor.
    pub fn unmonitor(&self, id: MonitorId) {
        self.monitors.unsubscribe(id);
    }

    /// Number of live monitors.
    pub fn monitor_count(&self) -> usize {
        self.monitors.monitor_count()
    }
}

impl Endpoint for MemorySession {
    fn read_attribute(&self, node: &NodeId) -> Result<Variant> {
        self.nodes
            .read()
            .get(node)
            .cloned()
            .ok_or_else(|| Error::NodeNotFound(node.clone()))
    }

    fn write_attribute(&self, node: &NodeId, value: &Variant) -> Result<()> {
        let _lock = self.write_lock.lock();

        {
            let mut nodes = self.nodes.write();
            let current = nodes
                .get_mut(node)
                .ok_or_else(|| Error::NodeNotFound(node.clone()))?;

            // A node's tag is fixed at registration.
            if current.tag() != value.tag() {
                return Err(Error::TypeMismatch {
                    expected: current.tag(),
                    got: value.tag(),
                });
            }

            *current = value.clone();
        }

        debug!(node = %node, len = value.len(), "attribute written");
        self.monitors.notify_value(node, value);
        Ok(())
    }
}

impl Default for MemorySession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscriptions::NodeEvent;
    use crate::types::TypeTag;
    use std::time::Duration;

    fn answer_node() -> NodeId {
        NodeId::string(1, "the.answer")
    }

    #[test]
    fn test_register_then_read() {
        let session = MemorySession::new();
        let initial = Variant::from_slice(&[1i32, 2, 3]);
        session.register_node(answer_node(), initial.clone()).unwrap();

        let read = session.read_attribute(&answer_node()).unwrap();
        assert_eq!(read, initial);
    }

    #[test]
    fn test_read_missing_node() {
        let session = MemorySession::new();
        let err = session.read_attribute(&answer_node()).unwrap_err();
        assert!(matches!(err, Error::NodeNotFound(_)));
    }

    #[test]
    fn test_register_twice_fails() {
        let session = MemorySession::new();
        session
            .register_node(answer_node(), Variant::empty(TypeTag::Int32))
            .unwrap();
        let err = session
            .register_node(answer_node(), Variant::empty(TypeTag::Int32))
            .unwrap_err();
        assert!(matches!(err, Error::NodeExists(_)));
    }

    #[test]
    fn test_write_enforces_registered_tag() {
        let session = MemorySession::new();
        let initial = Variant::from_slice(&[1i32]);
        session.register_node(answer_node(), initial.clone()).unwrap();

        let handle = session.monitor(MonitorFilter::values());

        let wrong = Variant::from_slice(&[1.0f64]);
        let err = session.write_attribute(&answer_node(), &wrong).unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch {
                expected: TypeTag::Int32,
                got: TypeTag::Float64
            }
        ));

        // Stored value untouched, no event emitted.
        assert_eq!(session.read_attribute(&answer_node()).unwrap(), initial);
        assert!(handle.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn test_write_updates_and_notifies() {
        let session = MemorySession::new();
        session
            .register_node(answer_node(), Variant::empty(TypeTag::Int32))
            .unwrap();

        let handle = session.monitor(MonitorFilter::values());

        let value = Variant::from_slice(&[4i32, 5]);
        session.write_attribute(&answer_node(), &value).unwrap();

        assert_eq!(session.read_attribute(&answer_node()).unwrap(), value);

        let event = handle.recv_timeout(Duration::from_millis(100)).unwrap();
        match event {
            NodeEvent::ValueChanged { node, value: v, .. } => {
                assert_eq!(node, answer_node());
                assert_eq!(v, value);
            }
            _ => panic!("Expected ValueChanged event, got {:?}", event),
        }
    }

    #[test]
    fn test_config_buffer_applies_to_monitors() {
        let session = MemorySession::with_config(SessionConfig { event_buffer: 1 });
        session
            .register_node(answer_node(), Variant::empty(TypeTag::Int32))
            .unwrap();

        let handle = session.monitor(MonitorFilter::values());
        assert_eq!(session.monitor_count(), 1);

        // Two undrained writes overflow the single-slot buffer.
        for i in 0..2i32 {
            session
                .write_attribute(&answer_node(), &Variant::from_slice(&[i]))
                .unwrap();
        }
        assert_eq!(session.monitor_count(), 0);
        drop(handle);
    }

    #[test]
    fn test_unmonitor() {
        let session = MemorySession::new();
        let handle = session.monitor(MonitorFilter::all());
        assert_eq!(session.monitor_count(), 1);

        session.unmonitor(handle.id);
        assert_eq!(session.monitor_count(), 0);
    }

    #[test]
    fn test_remove_node() {
        let session = MemorySession::new();
        session
            .register_node(answer_node(), Variant::empty(TypeTag::Float32))
            .unwrap();
        assert_eq!(session.node_count(), 1);

        session.remove_node(&answer_node()).unwrap();
        assert_eq!(session.node_count(), 0);
        assert!(session.remove_node(&answer_node()).is_err());
    }
}
