use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::completion::catalog;
use crate::error::ConfigError;

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TOP_P: f64 = 1.0;

/// Artifact file format, identified by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = ".txt")]
    PlainText,
    #[serde(rename = ".md")]
    Markdown,
}

impl OutputFormat {
    /// Extension including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::PlainText => ".txt",
            OutputFormat::Markdown => ".md",
        }
    }

    /// Accepts an extension with or without the leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "txt" => Some(OutputFormat::PlainText),
            "md" => Some(OutputFormat::Markdown),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::from_extension(s)
            .ok_or_else(|| ConfigError::validation("output_format must be '.txt' or '.md'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl FromStr for Theme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(ConfigError::validation("Theme must be 'dark' or 'light'.")),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => f.write_str("dark"),
            Theme::Light => f.write_str("light"),
        }
    }
}

/// The frozen set of model, sampling, format and prompt parameters that
/// governs one job.
///
/// Captured when a batch is submitted; later settings changes never reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigProfile {
    pub model: String,
    /// `None` leaves the service default in effect.
    pub temperature: Option<f64>,
    /// `None` leaves the service default in effect.
    pub top_p: Option<f64>,
    pub output_format: OutputFormat,
    pub system_prompt: String,
}

impl ConfigProfile {
    pub fn new(model: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: None,
            top_p: None,
            output_format: OutputFormat::default(),
            system_prompt: system_prompt.into(),
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }

    /// Checks sampling ranges and that a model is named.
    ///
    /// The model is not checked against the catalog here: a profile may target
    /// any model an OpenAI-compatible endpoint serves.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::validation("model cannot be empty"));
        }
        if let Some(t) = self.temperature {
            validate_temperature(t)?;
        }
        if let Some(p) = self.top_p {
            validate_top_p(p)?;
        }
        Ok(())
    }
}

pub(crate) fn validate_temperature(value: f64) -> Result<(), ConfigError> {
    if !(0.0..=2.0).contains(&value) {
        return Err(ConfigError::validation("temperature must be between 0 and 2"));
    }
    Ok(())
}

pub(crate) fn validate_top_p(value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::validation("top_p must be between 0 and 1"));
    }
    Ok(())
}

/// Persisted model and sampling settings, defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub output_format: OutputFormat,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: catalog::default_model().to_string(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            output_format: OutputFormat::default(),
        }
    }
}

/// Partial update for [`ModelSettings`]; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ModelSettingsUpdate {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub output_format: Option<OutputFormat>,
}

impl ModelSettingsUpdate {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(model) = &self.model {
            if !catalog::is_supported(model) {
                return Err(ConfigError::UnsupportedModel(model.clone()));
            }
        }
        if let Some(t) = self.temperature {
            validate_temperature(t)?;
        }
        if let Some(p) = self.top_p {
            validate_top_p(p)?;
        }
        Ok(())
    }
}
