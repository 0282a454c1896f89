//! Completion results and the chat-completions wire format.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::catalog::find_model;
use super::error::ServiceError;
use crate::config::ConfigProfile;

/// Token accounting and timing for one completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    /// Model the request was sent to.
    pub model: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    /// Wall-clock time around the remote call, rounded to hundredths.
    pub elapsed_seconds: f64,
}

impl Usage {
    pub fn new(model: &str, prompt_tokens: u64, completion_tokens: u64, elapsed: Duration) -> Self {
        Self {
            model: model.to_string(),
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
            elapsed_seconds: round_hundredths(elapsed.as_secs_f64()),
        }
    }

    /// Estimated USD cost from catalog list prices. `None` for models
    /// outside the catalog.
    pub fn estimated_cost(&self) -> Option<f64> {
        let info = find_model(&self.model)?;
        let input = self.prompt_tokens as f64 * info.input_price_per_1m / 1_000_000.0;
        let output = self.completion_tokens as f64 * info.output_price_per_1m / 1_000_000.0;
        Some(input + output)
    }
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Generated text plus usage for one transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: Usage,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

/// Request body for `POST /chat/completions`.
///
/// Sampling parameters absent from the profile are omitted so the service
/// applies its own defaults.
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
}

impl<'a> ChatRequest<'a> {
    pub fn from_profile(content: &'a str, profile: &'a ConfigProfile) -> Self {
        Self {
            model: &profile.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &profile.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content,
                },
            ],
            temperature: profile.temperature,
            top_p: profile.top_p,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

impl ChatResponse {
    pub fn into_completion(self, model: &str, elapsed: Duration) -> Result<Completion, ServiceError> {
        let choice = self.choices.into_iter().next().ok_or_else(|| {
            ServiceError::RequestFailed("response contained no choices".to_string())
        })?;
        let text = choice
            .message
            .content
            .ok_or_else(|| {
                ServiceError::RequestFailed("response contained no message content".to_string())
            })?
            .trim()
            .to_string();
        let wire = self.usage.unwrap_or_default();

        let mut usage = Usage::new(model, wire.prompt_tokens, wire.completion_tokens, elapsed);
        // Trust the service's total when it reports one.
        if wire.total_tokens > 0 {
            usage.total_tokens = wire.total_tokens;
        }

        Ok(Completion { text, usage })
    }
}
