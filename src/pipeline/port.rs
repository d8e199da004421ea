//! Port descriptors for the node system.
//!
//! Each node declares its ports (inputs/outputs) via static `PortDescriptor` arrays.
//! Input ports are bound positionally: the host passes the port's index in the
//! node's input list when routing a value.

/// The kind of data flowing through a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortKind {
    /// Arbitrary structured value (JSON-like object).
    Object,
    /// Text value.
    Text,
    /// Floating point number.
    Number,
    /// Byte buffer tagged with element type metadata.
    TypedArray,
}

/// Whether a port is an input or output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output,
}

/// Static descriptor for a node's port.
#[derive(Debug, Clone)]
pub struct PortDescriptor {
    pub name: &'static str,
    pub direction: PortDirection,
    pub kind: PortKind,
    /// Human-readable description for introspection.
    pub desc: &'static str,
}

impl PortDescriptor {
    pub const fn input(name: &'static str, kind: PortKind, desc: &'static str) -> Self {
        Self {
            name,
            direction: PortDirection::Input,
            kind,
            desc,
        }
    }

    pub const fn output(name: &'static str, kind: PortKind, desc: &'static str) -> Self {
        Self {
            name,
            direction: PortDirection::Output,
            kind,
            desc,
        }
    }
}
