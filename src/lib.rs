//! # typed-array-node: array item to typed array conversion
//!
//! A dataflow graph node that reads an array-of-arrays member out of a
//! structured value, converts one selected item into a contiguous numeric
//! byte buffer, and publishes that buffer tagged with its element type.
//!
//! ## Architecture
//!
//! - **Pipeline**: node contract, slots, ports and diagnostics for the host
//!   graph engine ([`pipeline`])
//! - **Types**: the seven-entry element type table and value encoding
//!   ([`types`])
//! - **Control**: headless model of the element type selector ([`control`])
//! - **Config**: persisted node state (JSON) and node settings (TOML)
//!   ([`config`])
//!
//! The host engine owns scheduling, routing and graph persistence. The node
//! is evaluated synchronously, once per pass, and never blocks.
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use typed_array_node::pipeline::{
//!     ArrayItemToTypedArrayNode, NodeContext, NodeId, NodePlugin, SlotValue, TracingSink,
//! };
//! use typed_array_node::types::ElementType;
//!
//! let mut node = ArrayItemToTypedArrayNode::with_element_type(ElementType::Uint8);
//! node.update_input(0, SlotValue::from(json!({"samples": [[1, 2, 3], [4, 5, 6]]})));
//! node.update_input(1, SlotValue::from("samples"));
//! node.update_input(2, SlotValue::from(1.0));
//!
//! let sink = TracingSink;
//! node.evaluate(&mut NodeContext::new(NodeId(0), &sink));
//!
//! let out = node.output(0).unwrap();
//! assert_eq!(out.as_buffer().unwrap().as_bytes(), &[4, 5, 6]);
//! ```

pub mod config;
pub mod control;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod types;

// Re-export commonly used types
pub use config::{NodeSettings, NodeState};
pub use control::{ElementTypeControl, ElementTypeSelector};
pub use error::{ConversionError, NodeError, Result};
pub use pipeline::{ArrayItemToTypedArrayNode, EvalStatus, TypedBuffer};
pub use types::ElementType;
