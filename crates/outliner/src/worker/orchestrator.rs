//! Fans a batch of files out to one concurrent job each.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::Notify;
use tracing::{debug, error, info, info_span, Instrument};

use crate::broadcast::JobEvent;
use crate::clipboard::Clipboard;
use crate::completion::TransformService;
use crate::config::ConfigProfile;
use crate::error::WorkerError;
use crate::pipeline::{JobListener, PipelineWarning, TransformPipeline};
use crate::sanitize::redact_path;
use crate::storage::{ArtifactStorage, ProcessedIndex};

use super::job::{Job, JobId, JobState};

/// Runs file-transform jobs and reports their lifecycle to a listener.
///
/// Every submitted path starts its own task right away; there is no queue
/// and no concurrency limit. Jobs are independent: one slow or failing job
/// never affects another. There is no cancellation and no retry.
///
/// Cloning yields another handle to the same orchestrator.
#[derive(Clone)]
pub struct JobOrchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    pipeline: TransformPipeline,
    listener: Arc<dyn JobListener>,
    jobs: Mutex<HashMap<JobId, Job>>,
    active: AtomicUsize,
    idle: Notify,
}

impl JobOrchestrator {
    pub fn new(
        service: Arc<dyn TransformService>,
        storage: ArtifactStorage,
        clipboard: Arc<dyn Clipboard>,
        listener: Arc<dyn JobListener>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                pipeline: TransformPipeline::new(service, storage, clipboard),
                listener,
                jobs: Mutex::new(HashMap::new()),
                active: AtomicUsize::new(0),
                idle: Notify::new(),
            }),
        }
    }

    /// Starts one job per path, all sharing the `profile` snapshot.
    ///
    /// Returns once the jobs are spawned, with their ids in path order. The
    /// whole batch is refused if it is empty, the profile is invalid, or the
    /// completion service has no credential. Must be called within a tokio
    /// runtime.
    pub fn submit<I, P>(&self, paths: I, profile: ConfigProfile) -> Result<Vec<JobId>, WorkerError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let paths: Vec<PathBuf> = paths.into_iter().map(Into::into).collect();
        if paths.is_empty() {
            return Err(WorkerError::EmptyBatch);
        }
        profile.validate().map_err(WorkerError::InvalidProfile)?;
        if !self.inner.pipeline.is_configured() {
            return Err(WorkerError::NotConfigured);
        }
        let runtime = Handle::try_current().map_err(|_| WorkerError::NoRuntime)?;

        let profile = Arc::new(profile);
        let batch: Vec<Job> = paths
            .into_iter()
            .map(|path| Job::new(path, Arc::clone(&profile)))
            .collect();

        {
            let mut jobs = self.inner.lock_jobs();
            for job in &batch {
                jobs.insert(job.id, job.clone());
            }
            self.inner.active.fetch_add(batch.len(), Ordering::SeqCst);
        }

        info!(
            count = batch.len(),
            model = %profile.model,
            format = %profile.output_format,
            "Submitting batch"
        );

        let ids = batch.iter().map(|job| job.id).collect();
        for job in batch {
            let inner = Arc::clone(&self.inner);
            let span = info_span!(
                "job",
                job_id = %job.id,
                filename = %redact_path(&job.source_path),
            );
            runtime.spawn(inner.run_job(job).instrument(span));
        }

        Ok(ids)
    }

    /// Number of jobs not yet terminal. Never blocks.
    pub fn active_count(&self) -> usize {
        self.inner.active.load(Ordering::SeqCst)
    }

    /// State of an in-flight job. `None` once the job has finished and its
    /// terminal event has been emitted, or for an unknown id.
    pub fn job_state(&self, id: JobId) -> Option<JobState> {
        self.inner.lock_jobs().get(&id).map(|job| job.state)
    }

    /// Snapshot of all in-flight jobs, oldest submission first.
    pub fn jobs(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.inner.lock_jobs().values().cloned().collect();
        jobs.sort_by_key(|job| job.submitted_at);
        jobs
    }

    /// Waits until no job is pending or running.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.active_count() == 0 {
                return;
            }
            notified.await;
        }
    }

    pub fn processed_index(&self) -> ProcessedIndex {
        ProcessedIndex::from(self.inner.pipeline.storage())
    }

    pub fn storage(&self) -> &ArtifactStorage {
        self.inner.pipeline.storage()
    }
}

impl Inner {
    fn lock_jobs(&self) -> MutexGuard<'_, HashMap<JobId, Job>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, id: JobId, next: JobState) {
        if let Some(job) = self.lock_jobs().get_mut(&id) {
            job.transition(next);
        }
    }

    async fn run_job(self: Arc<Self>, job: Job) {
        let id = job.id;
        let path = job.source_path.clone();
        let profile = Arc::clone(&job.profile);
        let _active = ActiveGuard { inner: &self, id };

        self.set_state(id, JobState::Running);
        self.emit(&JobEvent::started(id, &path));

        let (state, event) = match self.pipeline.run(&path, &profile).await {
            Ok(output) => {
                for warning in output.warnings {
                    match warning {
                        PipelineWarning::ClipboardFailed { error } => {
                            self.emit(&JobEvent::clipboard_warning(id, &path, error));
                        }
                    }
                }
                (
                    JobState::Succeeded,
                    JobEvent::succeeded(id, &path, output.usage, output.output_path),
                )
            }
            Err(failure) => (JobState::Failed, JobEvent::failed(id, &path, failure)),
        };

        self.finish(id, state, event);
    }

    /// A panicking listener loses that one event but never the job.
    fn emit(&self, event: &JobEvent) {
        if panic::catch_unwind(AssertUnwindSafe(|| self.listener.on_event(event))).is_err() {
            error!("Job listener panicked while handling an event");
        }
    }

    /// Records the terminal state and emits the terminal event. The active
    /// count is released afterwards by the job's [`ActiveGuard`].
    fn finish(&self, id: JobId, state: JobState, event: JobEvent) {
        let finished = self.lock_jobs().remove(&id);
        if let Some(mut job) = finished {
            job.transition(state);
            debug!(
                state = %job.state,
                elapsed_ms = job.duration().map(|d| d.num_milliseconds()),
                "Job finished"
            );
        }

        self.emit(&event);
    }
}

/// Releases a job from the registry and the active count when its task ends,
/// including by panic. A consumer that reads a count of zero has therefore
/// been sent every terminal event.
struct ActiveGuard<'a> {
    inner: &'a Inner,
    id: JobId,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.inner.lock_jobs().remove(&self.id);
        if self.inner.active.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}
