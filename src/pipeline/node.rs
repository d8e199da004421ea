//! Node abstraction for the host graph engine.
//!
//! The host owns scheduling and routing. For each evaluation pass it:
//! 1. Pushes changed upstream values into input slots via `update_input`.
//! 2. Calls `evaluate` once with a `NodeContext`.
//! 3. Reads output slots via `output`.
//!
//! Nodes hold no timer or loop of their own.

use crate::error::ConversionError;
use crate::pipeline::diagnostics::{Diagnostic, DiagnosticSink};
use crate::pipeline::id::NodeId;
use crate::pipeline::packet::{ConfigValue, SlotValue};
use crate::pipeline::port::PortDescriptor;

/// Context passed to a node for one evaluation pass.
pub struct NodeContext<'a> {
    /// Id assigned to this node by the host.
    pub node_id: NodeId,
    /// Where validation failures are reported.
    pub diagnostics: &'a dyn DiagnosticSink,
    /// Monotonic pass counter.
    pub pass: u64,
}

impl<'a> NodeContext<'a> {
    pub fn new(node_id: NodeId, diagnostics: &'a dyn DiagnosticSink) -> Self {
        Self {
            node_id,
            diagnostics,
            pass: 0,
        }
    }

    pub fn with_pass(mut self, pass: u64) -> Self {
        self.pass = pass;
        self
    }

    /// Report a message on behalf of the node named `node_name`.
    pub fn report(&self, node_name: &str, message: impl Into<String>) {
        self.diagnostics
            .report(Diagnostic::new(self.node_id, node_name, message));
    }
}

/// Result of one evaluation pass, for host introspection.
///
/// This is a value, not a propagated error: a failed pass has already been
/// reported and the node keeps serving its previous output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalStatus {
    /// Inputs not wired yet; nothing done.
    Idle,
    /// A new output was published.
    Converted { bytes: usize },
    /// Validation failed; previous output retained.
    Failed(ConversionError),
}

impl EvalStatus {
    pub fn is_converted(&self) -> bool {
        matches!(self, EvalStatus::Converted { .. })
    }

    pub fn error(&self) -> Option<&ConversionError> {
        match self {
            EvalStatus::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Contract between a node and the host graph engine.
pub trait NodePlugin: Send {
    /// Human-readable name of this node.
    fn name(&self) -> &str;

    /// Description shown for introspection/display.
    fn description(&self) -> &str;

    /// Port descriptors for this node. Inputs and outputs are each indexed in
    /// declaration order.
    fn ports(&self) -> &[PortDescriptor];

    /// Return the node to its freshly-created state. Configuration is kept.
    fn reset(&mut self) {}

    /// Bind a value to input slot `slot`.
    fn update_input(&mut self, slot: usize, value: SlotValue);

    /// Whether an input or configuration changed since the last evaluation.
    fn needs_evaluation(&self) -> bool {
        true
    }

    /// Run one evaluation pass.
    fn evaluate(&mut self, ctx: &mut NodeContext) -> EvalStatus;

    /// Current value of output slot `slot`.
    fn output(&self, slot: usize) -> Option<SlotValue>;

    /// Called when a config value changes.
    fn on_config_change(&mut self, _key: &str, _value: &ConfigValue) {}
}
