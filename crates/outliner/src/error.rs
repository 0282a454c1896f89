use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutlinerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("Completion service error: {0}")]
    Service(#[from] crate::completion::ServiceError),

    #[error("Secret error: {0}")]
    Secret(#[from] crate::secrets::SecretError),

    #[error("Clipboard error: {0}")]
    Clipboard(#[from] crate::clipboard::ClipboardError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write settings file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Settings validation failed: {message}")]
    Validation { message: String },

    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    #[error("Unknown prompt id: {0}")]
    UnknownPrompt(String),
}

impl ConfigError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        ConfigError::Validation {
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Source path has no file name: {0}")]
    InvalidSource(PathBuf),

    #[error("Processed file not found: {0}")]
    ArtifactMissing(PathBuf),

    #[error("Processed file is empty: {0}")]
    ArtifactEmpty(PathBuf),
}

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("No files were submitted")]
    EmptyBatch,

    #[error("Completion service is not configured (set OPENAI_API_KEY)")]
    NotConfigured,

    #[error("Invalid profile: {0}")]
    InvalidProfile(#[source] ConfigError),

    #[error("No async runtime available to run jobs")]
    NoRuntime,

    #[error("Directory scan failed for '{path}': {source}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Folder does not exist: {0}")]
    MissingFolder(PathBuf),
}

pub type Result<T> = std::result::Result<T, OutlinerError>;
