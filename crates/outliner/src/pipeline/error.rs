use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::completion::ServiceError;
use crate::error::StorageError;

/// Why a job failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureReason {
    /// The source file could not be read.
    #[serde(rename = "read_error")]
    Read,
    /// The completion service failed (transport, protocol or remote error).
    #[serde(rename = "service_error")]
    Service,
    /// The transform succeeded but the artifact could not be written.
    #[serde(rename = "persist_error")]
    Persist,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Read => f.write_str("ReadError"),
            FailureReason::Service => f.write_str("ServiceError"),
            FailureReason::Persist => f.write_str("PersistError"),
        }
    }
}

/// Terminal failure of one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{reason}: {message}")]
pub struct JobFailure {
    pub reason: FailureReason,
    pub message: String,
}

impl JobFailure {
    pub fn new(reason: FailureReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }
}

impl From<ServiceError> for JobFailure {
    fn from(err: ServiceError) -> Self {
        JobFailure::new(FailureReason::Service, err.to_string())
    }
}

impl From<StorageError> for JobFailure {
    fn from(err: StorageError) -> Self {
        JobFailure::new(FailureReason::Persist, err.to_string())
    }
}

/// Non-fatal problems recorded while a job still succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineWarning {
    ClipboardFailed { error: String },
}
