//! Diagnostics channel for node errors.
//!
//! Nodes never propagate validation failures to the host. They report a
//! human-readable message through a [`DiagnosticSink`] and carry on. Reporting
//! is fire-and-forget: sinks must not block and nodes never retry.
//!
//! Two sinks are provided:
//! - [`TracingSink`]: logs each diagnostic with `tracing::error!`.
//! - [`ChannelSink`]: forwards diagnostics over a bounded crossbeam channel,
//!   e.g. to a UI thread. Drops (and counts) messages when the channel is full.

use crate::pipeline::id::NodeId;
use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::atomic::{AtomicU64, Ordering};

/// A single error report from a node.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub node_id: NodeId,
    pub node_name: String,
    pub message: String,
    pub reported_at: DateTime<Utc>,
}

impl Diagnostic {
    pub fn new(node_id: NodeId, node_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            node_id,
            node_name: node_name.into(),
            message: message.into(),
            reported_at: Utc::now(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ERROR: {}", self.message)
    }
}

/// Receiver of node diagnostics.
pub trait DiagnosticSink: Send {
    fn report(&self, diagnostic: Diagnostic);
}

/// Sink that writes diagnostics to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::error!(
            node = %diagnostic.node_id,
            name = %diagnostic.node_name,
            "{}",
            diagnostic.message
        );
    }
}

/// Sink that forwards diagnostics over a bounded channel.
pub struct ChannelSink {
    tx: Sender<Diagnostic>,
    mirror_to_tracing: bool,
    dropped: AtomicU64,
}

impl ChannelSink {
    /// Create a sink and the receiving end of its channel.
    pub fn new(capacity: usize) -> (Self, Receiver<Diagnostic>) {
        let (tx, rx) = bounded(capacity);
        (Self::from_sender(tx), rx)
    }

    pub fn from_sender(tx: Sender<Diagnostic>) -> Self {
        Self {
            tx,
            mirror_to_tracing: false,
            dropped: AtomicU64::new(0),
        }
    }

    /// Also log every diagnostic through tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.mirror_to_tracing = enabled;
        self
    }

    /// Number of diagnostics dropped because the channel was full or closed.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl DiagnosticSink for ChannelSink {
    fn report(&self, diagnostic: Diagnostic) {
        if self.mirror_to_tracing {
            TracingSink.report(diagnostic.clone());
        }

        match self.tx.try_send(diagnostic) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::trace!("Diagnostic dropped ({} total)", dropped);
            }
        }
    }
}

impl Drop for ChannelSink {
    fn drop(&mut self) {
        let dropped = self.dropped();
        if dropped > 0 {
            tracing::warn!("ChannelSink dropped {} diagnostics due to backpressure", dropped);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::new(NodeId(1), "Array item to typed array", "boom");
        assert_eq!(diag.to_string(), "ERROR: boom");
    }

    #[test]
    fn test_channel_sink_forwards() {
        let (sink, rx) = ChannelSink::new(4);
        sink.report(Diagnostic::new(NodeId(7), "n", "first"));
        sink.report(Diagnostic::new(NodeId(7), "n", "second"));

        let got: Vec<_> = rx.try_iter().map(|d| d.message).collect();
        assert_eq!(got, vec!["first", "second"]);
        assert_eq!(sink.dropped(), 0);
    }

    #[test]
    fn test_channel_sink_drops_when_full() {
        let (sink, rx) = ChannelSink::new(1);
        sink.report(Diagnostic::new(NodeId(0), "n", "kept"));
        sink.report(Diagnostic::new(NodeId(0), "n", "lost"));

        assert_eq!(sink.dropped(), 1);
        assert_eq!(rx.try_recv().unwrap().message, "kept");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_sink_survives_closed_receiver() {
        let (sink, rx) = ChannelSink::new(1);
        drop(rx);
        sink.report(Diagnostic::new(NodeId(0), "n", "nobody listening"));
        assert_eq!(sink.dropped(), 1);
    }
}
