//! Pipeline events delivered to the single consumer

use std::time::Duration;

use signa_core::FrameTime;
use tokio::sync::mpsc;

/// A debounced gesture
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    pub label: String,
    pub score: f32,
    /// Submission time of the frame that completed the hold
    pub frame_timestamp: FrameTime,
    /// When the label first became the candidate
    pub candidate_since: FrameTime,
    /// Cycle start, on the same clock as frame timestamps
    pub started_at: FrameTime,
    /// Duration of the processing cycle
    pub latency: Duration,
}

impl Recognition {
    /// Frame submission to emission
    pub fn end_to_end(&self) -> Duration {
        (self.started_at - self.frame_timestamp) + self.latency
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    Recognized(Recognition),
    Error { message: String },
}

impl PipelineEvent {
    pub fn error(message: impl Into<String>) -> Self {
        PipelineEvent::Error {
            message: message.into(),
        }
    }
}

pub type EventSender = mpsc::UnboundedSender<PipelineEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<PipelineEvent>;

/// Channel for pipeline events; events arrive in cycle order
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Send an event, ignoring a dropped consumer
pub(crate) fn emit(events: &EventSender, event: PipelineEvent) {
    if events.send(event).is_err() {
        tracing::trace!("event consumer dropped");
    }
}
