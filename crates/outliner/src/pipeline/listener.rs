use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::broadcast::{JobEvent, JobEventBroadcaster, JobEventKind};

/// Receives job lifecycle events from the orchestrator.
///
/// Called from job tasks on any worker thread; implementations must not
/// block. A UI listener should hand events off to its own thread or loop.
pub trait JobListener: Send + Sync {
    fn on_event(&self, event: &JobEvent);
}

/// Ignores all events.
pub struct NoopListener;

impl JobListener for NoopListener {
    fn on_event(&self, _event: &JobEvent) {}
}

/// Delivers every event, in emission order, to a single consumer.
pub struct ChannelListener {
    sender: mpsc::UnboundedSender<JobEvent>,
}

impl ChannelListener {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<JobEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl JobListener for ChannelListener {
    fn on_event(&self, event: &JobEvent) {
        // A dropped receiver means nobody is watching any more
        let _ = self.sender.send(event.clone());
    }
}

/// Bridges orchestrator events to a [`JobEventBroadcaster`].
pub struct BroadcastListener {
    broadcaster: JobEventBroadcaster,
}

impl BroadcastListener {
    pub fn new(broadcaster: JobEventBroadcaster) -> Self {
        Self { broadcaster }
    }
}

impl JobListener for BroadcastListener {
    fn on_event(&self, event: &JobEvent) {
        self.broadcaster.send(event.clone());
    }
}

/// Writes events to the tracing log, including usage details on success.
pub struct LogListener;

impl JobListener for LogListener {
    fn on_event(&self, event: &JobEvent) {
        match &event.kind {
            JobEventKind::Started => {
                info!(job_id = %event.job_id, "Processing {}", event.filename);
            }
            JobEventKind::ClipboardWarning { message } => {
                warn!(job_id = %event.job_id, "Clipboard copy failed for {}: {}", event.filename, message);
            }
            JobEventKind::Succeeded { usage, output_path } => {
                info!(
                    job_id = %event.job_id,
                    model = %usage.model,
                    prompt_tokens = usage.prompt_tokens,
                    completion_tokens = usage.completion_tokens,
                    total_tokens = usage.total_tokens,
                    response_time = usage.elapsed_seconds,
                    "Saved {} to {}",
                    event.filename,
                    output_path.display()
                );
            }
            JobEventKind::Failed { failure } => {
                warn!(job_id = %event.job_id, reason = %failure.reason, "Failed {}: {}", event.filename, failure.message);
            }
        }
    }
}

/// Forwards each event to several listeners, in order.
#[derive(Default)]
pub struct FanoutListener {
    listeners: Vec<Arc<dyn JobListener>>,
}

impl FanoutListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, listener: Arc<dyn JobListener>) -> Self {
        self.listeners.push(listener);
        self
    }
}

impl JobListener for FanoutListener {
    fn on_event(&self, event: &JobEvent) {
        for listener in &self.listeners {
            listener.on_event(event);
        }
    }
}
