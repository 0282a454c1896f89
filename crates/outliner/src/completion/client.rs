//! Chat-completions adapter over HTTP.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use super::error::ServiceError;
use super::types::{ChatRequest, ChatResponse, Completion};
use super::TransformService;
use crate::config::ConfigProfile;
use crate::sanitize::truncate_body;
use crate::secrets::{self, SecretError};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variable overriding [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV_VAR: &str = "OPENAI_BASE_URL";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// [`TransformService`] backed by an OpenAI-compatible chat-completions API.
pub struct OpenAiTransform {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl OpenAiTransform {
    /// Creates an adapter with the given credential. A `None` key yields an
    /// adapter that reports itself as not configured.
    pub fn new(api_key: Option<SecretString>) -> Result<Self, ServiceError> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::RequestFailed(format!("failed to build HTTP client: {e}")))?;

        let base_url = std::env::var(BASE_URL_ENV_VAR)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Resolves the credential from the environment (`OPENAI_API_KEY`).
    ///
    /// A missing key is not an error here; it surfaces as
    /// [`ServiceError::NotConfigured`] when a batch is submitted.
    pub fn from_env() -> Result<Self, SecretError> {
        let api_key = secrets::resolve_api_key(None, None)?;
        if api_key.is_none() {
            warn!(
                "{} not set. Configure it before processing files.",
                secrets::API_KEY_ENV_VAR
            );
        }
        Self::new(api_key).map_err(|e| SecretError::ClientSetup(e.to_string()))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl TransformService for OpenAiTransform {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn transform(
        &self,
        content: &str,
        profile: &ConfigProfile,
    ) -> Result<Completion, ServiceError> {
        let api_key = self.api_key.as_ref().ok_or(ServiceError::NotConfigured)?;

        let request = ChatRequest::from_profile(content, profile);
        debug!(
            model = %profile.model,
            temperature = ?profile.temperature,
            top_p = ?profile.top_p,
            chars = content.len(),
            "Sending completion request"
        );

        let started = Instant::now();
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::RequestFailed(format!(
                "HTTP {}: {}",
                status,
                truncate_body(&body)
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        let elapsed = started.elapsed();

        parsed.into_completion(&profile.model, elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    fn profile() -> ConfigProfile {
        ConfigProfile {
            model: "gpt-4.1".to_string(),
            temperature: Some(0.7),
            top_p: Some(1.0),
            output_format: OutputFormat::PlainText,
            system_prompt: String::new(),
        }
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        // Unroutable base URL: reaching the network would produce RequestFailed.
        let service = OpenAiTransform::new(None)
            .unwrap()
            .with_base_url("http://127.0.0.1:9");

        assert!(!service.is_configured());
        let err = service.transform("hello", &profile()).await.unwrap_err();
        assert_eq!(err, ServiceError::NotConfigured);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_request_failure() {
        let service = OpenAiTransform::with_timeout(
            Some(SecretString::from("sk-test")),
            Duration::from_secs(2),
        )
        .unwrap()
        .with_base_url("http://127.0.0.1:9");

        assert!(service.is_configured());
        let err = service.transform("hello", &profile()).await.unwrap_err();
        assert!(matches!(err, ServiceError::RequestFailed(_)));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let service = OpenAiTransform::new(None)
            .unwrap()
            .with_base_url("http://localhost:8080/v1/");
        assert_eq!(service.base_url(), "http://localhost:8080/v1");
        assert_eq!(service.endpoint(), "http://localhost:8080/v1/chat/completions");
    }
}
