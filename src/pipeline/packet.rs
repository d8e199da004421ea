//! Values exchanged through node slots.
//!
//! `SlotValue` is what the host routes into input slots and reads back from
//! output slots. Structured values are shared via `Arc` so a node only holds a
//! handle to data owned by its upstream producer.
//!
//! `TypedBuffer` is immutable once built. Publishing a new result means
//! building a new buffer; consumers holding the old one keep a valid view.

use crate::types::ElementType;
use serde_json::Value;
use std::sync::Arc;

/// A value travelling through a node slot.
#[derive(Debug, Clone, Default)]
pub enum SlotValue {
    /// Nothing bound.
    #[default]
    Empty,
    /// Structured value owned by the upstream producer.
    Object(Arc<Value>),
    Text(String),
    Number(f64),
    Buffer(TypedBuffer),
}

impl SlotValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, SlotValue::Empty)
    }

    pub fn as_buffer(&self) -> Option<&TypedBuffer> {
        match self {
            SlotValue::Buffer(b) => Some(b),
            _ => None,
        }
    }

    /// Short name of the variant, used in log messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SlotValue::Empty => "empty",
            SlotValue::Object(_) => "object",
            SlotValue::Text(_) => "text",
            SlotValue::Number(_) => "number",
            SlotValue::Buffer(_) => "buffer",
        }
    }
}

impl From<Value> for SlotValue {
    fn from(value: Value) -> Self {
        SlotValue::Object(Arc::new(value))
    }
}

impl From<&str> for SlotValue {
    fn from(value: &str) -> Self {
        SlotValue::Text(value.to_string())
    }
}

impl From<f64> for SlotValue {
    fn from(value: f64) -> Self {
        SlotValue::Number(value)
    }
}

/// Contiguous byte buffer tagged with its element type.
///
/// The stride is derived from the element type so the two can never disagree.
/// An empty buffer carries no element type.
#[derive(Clone, PartialEq)]
pub struct TypedBuffer {
    bytes: Arc<[u8]>,
    element_type: Option<ElementType>,
}

impl TypedBuffer {
    /// The buffer published before any conversion succeeded.
    pub fn empty() -> Self {
        Self {
            bytes: Arc::from(Vec::<u8>::new()),
            element_type: None,
        }
    }

    /// Encode `values` in order, with no padding between elements.
    pub fn encode<I>(element_type: ElementType, values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values.into_iter();
        let mut bytes = Vec::with_capacity(values.size_hint().0 * element_type.stride());
        for value in values {
            element_type.encode_into(value, &mut bytes);
        }
        Self {
            bytes: Arc::from(bytes),
            element_type: Some(element_type),
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether this is the initial, untagged empty buffer.
    #[inline]
    pub fn is_untagged(&self) -> bool {
        self.element_type.is_none()
    }

    #[inline]
    pub fn element_type(&self) -> Option<ElementType> {
        self.element_type
    }

    /// Byte width of one element, if tagged.
    #[inline]
    pub fn stride(&self) -> Option<usize> {
        self.element_type.map(|t| t.stride())
    }

    /// Number of encoded elements.
    pub fn len(&self) -> usize {
        match self.stride() {
            Some(stride) => self.bytes.len() / stride,
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Read the elements back as `f64` values.
    pub fn decode(&self) -> Vec<f64> {
        match self.element_type {
            Some(ty) => self
                .bytes
                .chunks_exact(ty.stride())
                .filter_map(|chunk| ty.decode(chunk))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Whether both buffers share the same allocation.
    pub fn ptr_eq(&self, other: &TypedBuffer) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }
}

impl Default for TypedBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for TypedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedBuffer")
            .field("element_type", &self.element_type)
            .field("stride", &self.stride())
            .field("byte_len", &self.bytes.len())
            .finish()
    }
}

/// Configuration values that can be sent to nodes.
#[derive(Debug, Clone)]
pub enum ConfigValue {
    Int(i64),
    String(String),
}

impl ConfigValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(v) => Some(v),
            _ => None,
        }
    }
}
