//! Test doubles for the completion service and the clipboard.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use outliner::clipboard::{Clipboard, ClipboardError};
use outliner::completion::{Completion, ServiceError, TransformService, Usage};
use outliner::config::ConfigProfile;

/// Completion service stand-in.
///
/// Replies with the uppercased input unless a canned reply is registered for
/// the exact content. Optionally holds every call until the test releases a
/// permit through the gate.
pub struct StubTransform {
    configured: bool,
    replies: Mutex<HashMap<String, Result<Completion, ServiceError>>>,
    gate: Option<Arc<Semaphore>>,
    calls: Mutex<Vec<(String, ConfigProfile)>>,
}

impl StubTransform {
    pub fn new() -> Self {
        Self {
            configured: true,
            replies: Mutex::new(HashMap::new()),
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    /// Calls block until a permit is added to the returned semaphore.
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub fn reply(self, content: &str, text: &str, usage: Usage) -> Self {
        self.replies.lock().unwrap().insert(
            content.to_string(),
            Ok(Completion {
                text: text.to_string(),
                usage,
            }),
        );
        self
    }

    pub fn fail(self, content: &str, error: ServiceError) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(content.to_string(), Err(error));
        self
    }

    pub fn calls(&self) -> Vec<(String, ConfigProfile)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

pub fn usage(model: &str, prompt: u64, completion: u64, elapsed_seconds: f64) -> Usage {
    let mut usage = Usage::new(model, prompt, completion, Duration::ZERO);
    usage.elapsed_seconds = elapsed_seconds;
    usage
}

#[async_trait]
impl TransformService for StubTransform {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn transform(
        &self,
        content: &str,
        profile: &ConfigProfile,
    ) -> Result<Completion, ServiceError> {
        if !self.configured {
            return Err(ServiceError::NotConfigured);
        }
        self.calls
            .lock()
            .unwrap()
            .push((content.to_string(), profile.clone()));

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| ServiceError::RequestFailed(e.to_string()))?
                .forget();
        }

        let canned = self.replies.lock().unwrap().get(content).cloned();
        match canned {
            Some(reply) => reply,
            None => Ok(Completion {
                text: content.to_uppercase(),
                usage: usage(&profile.model, 1, 1, 0.01),
            }),
        }
    }
}

#[derive(Default, Clone, Copy, PartialEq, Eq)]
enum ClipboardMode {
    #[default]
    Record,
    Fail,
    Panic,
}

/// Clipboard that remembers everything copied, always fails, or panics.
#[derive(Default)]
pub struct RecordingClipboard {
    mode: ClipboardMode,
    copied: Mutex<Vec<String>>,
}

impl RecordingClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            mode: ClipboardMode::Fail,
            ..Self::default()
        }
    }

    pub fn panicking() -> Self {
        Self {
            mode: ClipboardMode::Panic,
            ..Self::default()
        }
    }

    pub fn copied(&self) -> Vec<String> {
        self.copied.lock().unwrap().clone()
    }
}

impl Clipboard for RecordingClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        match self.mode {
            ClipboardMode::Record => {}
            ClipboardMode::Fail => {
                return Err(ClipboardError::Unavailable("no display".to_string()));
            }
            ClipboardMode::Panic => panic!("clipboard backend crashed"),
        }
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
