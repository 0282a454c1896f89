//! Test harness for isolated orchestrator runs.
//!
//! The `TestHarness` struct bundles:
//! - Temporary source, processed and config directories
//! - A `JobOrchestrator` wired to a `StubTransform` and a `RecordingClipboard`
//! - The receiving end of the orchestrator's event channel

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

use outliner::broadcast::JobEvent;
use outliner::config::{ConfigProfile, OutputFormat};
use outliner::pipeline::ChannelListener;
use outliner::storage::{ArtifactStorage, ProcessedIndex};
use outliner::worker::JobOrchestrator;

use super::doubles::{RecordingClipboard, StubTransform};

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct TestHarness {
    temp_dir: TempDir,
    pub source_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub config_dir: PathBuf,
    pub service: Arc<StubTransform>,
    pub clipboard: Arc<RecordingClipboard>,
    pub orchestrator: JobOrchestrator,
    pub events: UnboundedReceiver<JobEvent>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_service(StubTransform::new())
    }

    pub fn with_service(service: StubTransform) -> Self {
        Self::build(service, RecordingClipboard::new(), None)
    }

    /// `processed_dir` overrides the artifact root, e.g. to make it unwritable.
    pub fn build(
        service: StubTransform,
        clipboard: RecordingClipboard,
        processed_dir: Option<PathBuf>,
    ) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();

        let source_dir = base.join("source");
        let config_dir = base.join("config");
        std::fs::create_dir_all(&source_dir).expect("Failed to create source dir");
        std::fs::create_dir_all(&config_dir).expect("Failed to create config dir");
        let processed_dir = processed_dir.unwrap_or_else(|| base.join("processed"));

        let service = Arc::new(service);
        let clipboard = Arc::new(clipboard);
        let (listener, events) = ChannelListener::new();

        let orchestrator = JobOrchestrator::new(
            service.clone(),
            ArtifactStorage::new(&processed_dir),
            clipboard.clone(),
            Arc::new(listener),
        );

        Self {
            temp_dir,
            source_dir,
            processed_dir,
            config_dir,
            service,
            clipboard,
            orchestrator,
            events,
        }
    }

    pub fn base_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes a source file and returns its path.
    pub fn write_source(&self, name: &str, content: &str) -> PathBuf {
        let path = self.source_dir.join(name);
        std::fs::write(&path, content).expect("Failed to write source file");
        path
    }

    /// Profile `{model: "m", temperature: 0.5, top_p: 1.0, format: .txt}`.
    pub fn profile(&self) -> ConfigProfile {
        ConfigProfile::new("m", "Outline the text.")
            .with_temperature(0.5)
            .with_top_p(1.0)
            .with_output_format(OutputFormat::PlainText)
    }

    pub fn index(&self) -> ProcessedIndex {
        self.orchestrator.processed_index()
    }

    pub async fn next_event(&mut self) -> JobEvent {
        tokio::time::timeout(EVENT_TIMEOUT, self.events.recv())
            .await
            .expect("Timed out waiting for job event")
            .expect("Event channel closed")
    }

    /// Receives events until `terminal` terminal events have arrived.
    pub async fn collect_terminal(&mut self, terminal: usize) -> Vec<JobEvent> {
        let mut events = Vec::new();
        let mut seen = 0;
        while seen < terminal {
            let event = self.next_event().await;
            if event.is_terminal() {
                seen += 1;
            }
            events.push(event);
        }
        events
    }

    /// Polls until `active_count()` equals `expected`.
    pub async fn wait_for_active(&self, expected: usize) {
        tokio::time::timeout(EVENT_TIMEOUT, async {
            while self.orchestrator.active_count() != expected {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("Timed out waiting for active count");
    }
}
