//! Job lifecycle events and their broadcaster.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::completion::Usage;
use crate::pipeline::JobFailure;
use crate::sanitize::redact_path;
use crate::worker::JobId;

/// What happened to a job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobEventKind {
    /// The job left `Pending` and is running.
    Started,
    /// The artifact was written but copying it to the clipboard failed.
    /// Does not change the job's outcome.
    ClipboardWarning { message: String },
    /// Terminal: the transform succeeded and the artifact is on disk.
    Succeeded { usage: Usage, output_path: PathBuf },
    /// Terminal: the job failed for the tagged reason.
    Failed { failure: JobFailure },
}

/// An event for one job.
///
/// Per job: exactly one `Started`, then at most one `ClipboardWarning`, then
/// exactly one terminal event. Events of different jobs interleave freely.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobEvent {
    pub job_id: JobId,
    /// Source file the job processes.
    pub path: PathBuf,
    /// File name of `path`, for display.
    pub filename: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: JobEventKind,
}

impl JobEvent {
    pub fn new(job_id: JobId, path: &Path, kind: JobEventKind) -> Self {
        Self {
            job_id,
            path: path.to_path_buf(),
            filename: redact_path(path),
            timestamp: Utc::now(),
            kind,
        }
    }

    pub fn started(job_id: JobId, path: &Path) -> Self {
        Self::new(job_id, path, JobEventKind::Started)
    }

    pub fn succeeded(job_id: JobId, path: &Path, usage: Usage, output_path: PathBuf) -> Self {
        Self::new(job_id, path, JobEventKind::Succeeded { usage, output_path })
    }

    pub fn failed(job_id: JobId, path: &Path, failure: JobFailure) -> Self {
        Self::new(job_id, path, JobEventKind::Failed { failure })
    }

    pub fn clipboard_warning(job_id: JobId, path: &Path, message: impl Into<String>) -> Self {
        Self::new(
            job_id,
            path,
            JobEventKind::ClipboardWarning {
                message: message.into(),
            },
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            JobEventKind::Succeeded { .. } | JobEventKind::Failed { .. }
        )
    }
}

/// Broadcasts job events to every subscriber.
///
/// Subscribers that fall more than `capacity` events behind lose the oldest
/// ones (`RecvError::Lagged`). Use a channel listener when every event must
/// be seen by a single consumer.
#[derive(Clone)]
pub struct JobEventBroadcaster {
    sender: Arc<broadcast::Sender<JobEvent>>,
}

impl JobEventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Sends an event to all current subscribers.
    pub fn send(&self, event: JobEvent) {
        // No active receivers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.sender.subscribe()
    }
}

impl Default for JobEventBroadcaster {
    fn default() -> Self {
        Self::new(256)
    }
}
