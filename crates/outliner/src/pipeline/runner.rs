use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::FutureExt;
use tracing::{debug, info_span, warn, Instrument};

use crate::clipboard::Clipboard;
use crate::completion::{Completion, TransformService, Usage};
use crate::config::ConfigProfile;
use crate::storage::ArtifactStorage;

use super::error::{FailureReason, JobFailure, PipelineWarning};

/// Result of a job that reached `Succeeded`.
#[derive(Debug, Clone)]
pub struct JobOutput {
    pub output_path: PathBuf,
    pub usage: Usage,
    pub warnings: Vec<PipelineWarning>,
}

/// The steps of one job: read the source, transform it, persist the
/// artifact, copy it to the clipboard.
///
/// A job succeeds only if the artifact is on disk. A failed clipboard copy is
/// recorded as a warning.
pub struct TransformPipeline {
    service: Arc<dyn TransformService>,
    storage: ArtifactStorage,
    clipboard: Arc<dyn Clipboard>,
}

impl TransformPipeline {
    pub fn new(
        service: Arc<dyn TransformService>,
        storage: ArtifactStorage,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        Self {
            service,
            storage,
            clipboard,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.service.is_configured()
    }

    pub fn storage(&self) -> &ArtifactStorage {
        &self.storage
    }

    /// Runs every step for `source` under the given profile snapshot.
    pub async fn run(&self, source: &Path, profile: &ConfigProfile) -> Result<JobOutput, JobFailure> {
        let content = self
            .step_read_source(source)
            .instrument(info_span!("read_source"))
            .await?;

        let completion = self
            .step_transform(&content, profile)
            .instrument(info_span!("transform", model = %profile.model))
            .await?;

        let output_path = self
            .step_persist(source, profile, &completion.text)
            .instrument(info_span!("persist_artifact"))
            .await?;

        let warnings = self
            .step_copy_to_clipboard(&completion.text)
            .instrument(info_span!("copy_to_clipboard"))
            .await
            .into_iter()
            .collect();

        Ok(JobOutput {
            output_path,
            usage: completion.usage,
            warnings,
        })
    }

    async fn step_read_source(&self, source: &Path) -> Result<String, JobFailure> {
        let content = tokio::fs::read_to_string(source).await.map_err(|e| {
            JobFailure::new(
                FailureReason::Read,
                format!("failed to read '{}': {}", source.display(), e),
            )
        })?;
        debug!("Loaded source ({} chars)", content.chars().count());
        Ok(content)
    }

    async fn step_transform(
        &self,
        content: &str,
        profile: &ConfigProfile,
    ) -> Result<Completion, JobFailure> {
        match AssertUnwindSafe(self.service.transform(content, profile))
            .catch_unwind()
            .await
        {
            Ok(result) => Ok(result?),
            Err(_) => Err(JobFailure::new(
                FailureReason::Service,
                "completion service panicked",
            )),
        }
    }

    async fn step_persist(
        &self,
        source: &Path,
        profile: &ConfigProfile,
        text: &str,
    ) -> Result<PathBuf, JobFailure> {
        let storage = self.storage.clone();
        let source = source.to_path_buf();
        let format = profile.output_format;
        let text = text.to_string();

        let path = tokio::task::spawn_blocking(move || storage.write(&source, format, &text))
            .await
            .map_err(|e| {
                JobFailure::new(FailureReason::Persist, format!("write task failed: {e}"))
            })??;
        debug!("Saved artifact to {}", path.display());
        Ok(path)
    }

    /// Best effort: a failing or panicking clipboard backend becomes a warning.
    async fn step_copy_to_clipboard(&self, text: &str) -> Option<PipelineWarning> {
        let clipboard = Arc::clone(&self.clipboard);
        let text = text.to_string();

        let error = match tokio::task::spawn_blocking(move || clipboard.set_text(&text)).await {
            Ok(Ok(())) => return None,
            Ok(Err(e)) => e.to_string(),
            Err(e) if e.is_panic() => "clipboard backend panicked".to_string(),
            Err(e) => format!("clipboard task failed: {e}"),
        };
        warn!("Clipboard copy failed: {}", error);
        Some(PipelineWarning::ClipboardFailed { error })
    }
}
