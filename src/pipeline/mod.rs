//! Node-side half of the dataflow graph.
//!
//! The host graph engine schedules evaluation and routes values between
//! nodes; this module defines what a node looks like to that host.
//!
//! # Evaluation Pass
//!
//! ```text
//! host ──update_input(slot, value)──► node
//! host ──evaluate(ctx)──────────────► node ──report(Diagnostic)──► DiagnosticSink
//! host ◄─output(slot)──────────────── node
//! ```
//!
//! # Design
//!
//! - **Explicit evaluation**: nodes hold no timer or loop; the host calls
//!   `evaluate` once per pass.
//! - **Replace, don't mutate**: published `TypedBuffer`s are immutable and
//!   shared via `Arc`, so consumers read them without synchronization.
//! - **Local recovery**: validation failures go to the diagnostics sink and
//!   the node keeps serving its last good output.

pub mod diagnostics;
pub mod id;
pub mod node;
pub mod nodes;
pub mod packet;
pub mod port;

pub use diagnostics::{ChannelSink, Diagnostic, DiagnosticSink, TracingSink};
pub use id::NodeId;
pub use node::{EvalStatus, NodeContext, NodePlugin};
pub use nodes::ArrayItemToTypedArrayNode;
pub use packet::{ConfigValue, SlotValue, TypedBuffer};
pub use port::{PortDescriptor, PortDirection, PortKind};
