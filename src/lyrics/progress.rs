//! Progress reporting for lyrics resolution.
//!
//! Progress events are purely observational. Sinks are fire-and-forget:
//! [`ProgressSink::emit`] cannot fail, and a sink that drops events never
//! affects the resolution itself.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Stage a resolution has reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStage {
    Preparing,
    QueryingPrimary,
    FallingBack,
}

impl std::fmt::Display for ProgressStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Preparing => "preparing",
            Self::QueryingPrimary => "querying primary endpoint",
            Self::FallingBack => "falling back to search",
        };
        f.write_str(s)
    }
}

/// A timestamped status update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub at: DateTime<Utc>,
    pub stage: ProgressStage,
    pub message: String,
}

impl ProgressEvent {
    pub fn new(stage: ProgressStage) -> Self {
        Self {
            at: Utc::now(),
            stage,
            message: stage.to_string(),
        }
    }

    /// Attach detail to the status string, e.g. the track being queried.
    pub fn with_detail(stage: ProgressStage, detail: impl std::fmt::Display) -> Self {
        Self {
            message: format!("{stage}: {detail}"),
            ..Self::new(stage)
        }
    }
}

/// One-way consumer of progress events.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

impl<S: ProgressSink + ?Sized> ProgressSink for Arc<S> {
    fn emit(&self, event: ProgressEvent) {
        (**self).emit(event);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: ProgressEvent) {}
}

/// Writes events to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn emit(&self, event: ProgressEvent) {
        tracing::info!(target: "progress", stage = ?event.stage, "{}", event.message);
    }
}

/// Forwards events over an unbounded channel.
///
/// A closed receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&self, event: ProgressEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!(target: "progress", "Progress receiver dropped");
        }
    }
}

/// Keeps every event in memory, in emission order
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events seen so far
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().clone()
    }

    pub fn stages(&self) -> Vec<ProgressStage> {
        self.events.lock().iter().map(|e| e.stage).collect()
    }
}

impl ProgressSink for MemorySink {
    fn emit(&self, event: ProgressEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_messages() {
        assert_eq!(ProgressEvent::new(ProgressStage::Preparing).message, "preparing");
        assert_eq!(
            ProgressStage::QueryingPrimary.to_string(),
            "querying primary endpoint"
        );
        assert_eq!(ProgressStage::FallingBack.to_string(), "falling back to search");
    }

    #[test]
    fn test_event_with_detail() {
        let event = ProgressEvent::with_detail(ProgressStage::QueryingPrimary, "Song - Artist");
        assert_eq!(event.message, "querying primary endpoint: Song - Artist");
        assert_eq!(event.stage, ProgressStage::QueryingPrimary);
    }

    #[test]
    fn test_memory_sink_keeps_order() {
        let sink = MemorySink::new();
        sink.emit(ProgressEvent::new(ProgressStage::Preparing));
        sink.emit(ProgressEvent::new(ProgressStage::QueryingPrimary));
        assert_eq!(
            sink.stages(),
            vec![ProgressStage::Preparing, ProgressStage::QueryingPrimary]
        );
    }

    #[tokio::test]
    async fn test_channel_sink_forwards_events() {
        let (sink, mut rx) = ChannelSink::new();
        sink.emit(ProgressEvent::new(ProgressStage::FallingBack));
        let event = rx.recv().await.unwrap();
        assert_eq!(event.stage, ProgressStage::FallingBack);
    }

    #[test]
    fn test_channel_sink_ignores_closed_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        // Must not panic
        sink.emit(ProgressEvent::new(ProgressStage::Preparing));
    }

    #[test]
    fn test_arc_sink_delegates() {
        let sink = Arc::new(MemorySink::new());
        let shared: Arc<MemorySink> = Arc::clone(&sink);
        shared.emit(ProgressEvent::new(ProgressStage::Preparing));
        assert_eq!(sink.events().len(), 1);
    }
}
