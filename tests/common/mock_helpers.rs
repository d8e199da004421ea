//! Diagnostics sinks for tests

use crossbeam_channel::Receiver;
use typed_array_node::pipeline::{ChannelSink, Diagnostic};

/// Create a channel sink with room for every diagnostic a test produces
pub fn create_test_sink() -> (ChannelSink, Receiver<Diagnostic>) {
    ChannelSink::new(16)
}

/// Drain all pending diagnostic messages
pub fn drain_messages(rx: &Receiver<Diagnostic>) -> Vec<String> {
    rx.try_iter().map(|d| d.message).collect()
}
