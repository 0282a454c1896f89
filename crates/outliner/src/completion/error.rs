use thiserror::Error;

/// Failure of a completion request.
///
/// All transport, protocol and remote faults collapse into `RequestFailed`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Completion service is not configured: no API key available")]
    NotConfigured,

    #[error("Completion request failed: {0}")]
    RequestFailed(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::RequestFailed(err.to_string())
    }
}
