pub mod broadcast;
pub mod clipboard;
pub mod completion;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod sanitize;
pub mod secrets;
pub mod storage;
pub mod worker;

pub use broadcast::{JobEvent, JobEventBroadcaster, JobEventKind};
pub use clipboard::{Clipboard, ClipboardError, NoopClipboard, SystemClipboard};
pub use completion::{Completion, OpenAiTransform, ServiceError, TransformService, Usage};
pub use config::{ConfigProfile, OutputFormat, PromptPreset, SettingsStore};
pub use error::{ConfigError, OutlinerError, Result, StorageError, WorkerError};
pub use pipeline::{FailureReason, JobFailure, JobListener};
pub use secrets::{resolve_api_key, SecretError};
pub use storage::{processed_path, ArtifactStorage, ProcessedIndex};
pub use worker::{DirectoryScanner, JobId, JobOrchestrator, JobState, SourceFile};
