//! Core types shared across the crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Runtime discriminant for the element type a [`crate::Variant`] holds.
///
/// Exactly one tag exists per supported element type. The discriminant
/// values are stable and part of the wire-adjacent surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TypeTag {
    /// Signed 32-bit integer.
    Int32 = 0x04,
    /// 32-bit IEEE floating point.
    Float32 = 0x09,
    /// 64-bit IEEE floating point.
    Float64 = 0x0A,
}

impl TypeTag {
    /// Encoded size of one element in bytes.
    pub fn width(self) -> usize {
        match self {
            TypeTag::Int32 | TypeTag::Float32 => 4,
            TypeTag::Float64 => 8,
        }
    }

    /// Human-readable type name.
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Int32 => "int32",
            TypeTag::Float32 => "float32",
            TypeTag::Float64 => "float64",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The identifier half of a [`NodeId`].
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identifier {
    Numeric(u32),
    String(String),
}

/// Namespaced address of a node in the endpoint's address space.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId {
    /// Namespace index.
    pub ns: u16,
    /// Identifier within the namespace.
    pub ident: Identifier,
}

impl NodeId {
    /// Node with a numeric identifier.
    pub fn numeric(ns: u16, id: u32) -> Self {
        NodeId {
            ns,
            ident: Identifier::Numeric(id),
        }
    }

    /// Node with a string identifier.
    pub fn string(ns: u16, id: impl Into<String>) -> Self {
        NodeId {
            ns,
            ident: Identifier::String(id.into()),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ident {
            Identifier::Numeric(n) => write!(f, "ns={};i={}", self.ns, n),
            Identifier::String(s) => write!(f, "ns={};s={}", self.ns, s),
        }
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self)
    }
}

/// Microseconds since Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current time.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards");
        Timestamp(duration.as_micros() as i64)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_widths() {
        assert_eq!(TypeTag::Int32.width(), 4);
        assert_eq!(TypeTag::Float32.width(), 4);
        assert_eq!(TypeTag::Float64.width(), 8);
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId::string(1, "the.answer").to_string(), "ns=1;s=the.answer");
        assert_eq!(NodeId::numeric(0, 2258).to_string(), "ns=0;i=2258");
    }

    #[test]
    fn test_node_id_as_map_key() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(NodeId::string(1, "a"), 1);
        map.insert(NodeId::numeric(1, 2), 2);

        assert_eq!(map.get(&NodeId::string(1, "a")), Some(&1));
        assert_eq!(map.get(&NodeId::numeric(1, 2)), Some(&2));
        assert_eq!(map.get(&NodeId::string(2, "a")), None);
    }

    #[test]
    fn test_timestamp_ordering() {
        let a = Timestamp(100);
        let b = Timestamp(200);
        assert!(a < b);
    }
}
