//! Remote text-completion service.
//!
//! [`TransformService`] is the seam between job orchestration and the remote
//! endpoint. [`OpenAiTransform`] is the production adapter; tests substitute
//! their own implementation.

pub mod catalog;
pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;

pub use catalog::{default_model, find_model, ModelInfo, MODEL_CATALOG};
pub use client::OpenAiTransform;
pub use error::ServiceError;
pub use types::{Completion, Usage};

use crate::config::ConfigProfile;

/// Sends file content through a completion model under a frozen profile.
#[async_trait]
pub trait TransformService: Send + Sync {
    /// Returns true when a credential is available.
    ///
    /// Checked before any job of a batch is dispatched.
    fn is_configured(&self) -> bool;

    /// Transforms `content` using the model, sampling parameters and system
    /// prompt carried by `profile`.
    async fn transform(
        &self,
        content: &str,
        profile: &ConfigProfile,
    ) -> Result<Completion, ServiceError>;
}
