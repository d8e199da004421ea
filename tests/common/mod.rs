//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod mock_helpers;

use typed_array_node::pipeline::{NodeContext, NodeId, NodePlugin, SlotValue, TypedBuffer};
use typed_array_node::pipeline::{DiagnosticSink, EvalStatus};

/// Minimal stand-in for the host engine: push inputs, evaluate, read output.
pub fn run_pass(
    node: &mut dyn NodePlugin,
    inputs: Vec<(usize, SlotValue)>,
    sink: &dyn DiagnosticSink,
) -> (EvalStatus, TypedBuffer) {
    for (slot, value) in inputs {
        node.update_input(slot, value);
    }
    let status = node.evaluate(&mut NodeContext::new(NodeId(0), sink));
    let out = node
        .output(0)
        .and_then(|v| v.as_buffer().cloned())
        .expect("output slot 0 always holds a buffer");
    (status, out)
}
