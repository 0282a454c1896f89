//! User settings persisted as a JSON document.
//!
//! Reads are lenient: a missing file, malformed JSON or an invalid field all
//! fall back to that field's default. Writes are validated and fail loudly.
//! Unknown keys in the file are preserved across writes.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::prompts::PromptStore;
use super::schema::{
    validate_temperature, validate_top_p, ConfigProfile, ModelSettings, ModelSettingsUpdate,
    OutputFormat, Theme,
};
use crate::completion::catalog;
use crate::error::ConfigError;

pub const SETTINGS_FILE_NAME: &str = "user_settings.json";
pub const SYSTEM_PROMPT_FILE_NAME: &str = "SYSTEM_PROMPT.txt";
pub const PROCESSED_DIR_NAME: &str = "processed";
pub const SOURCE_DIR_NAME: &str = "source";

/// Platform configuration directory for outliner, e.g.
/// `~/.config/outliner` on Linux.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("outliner"))
        .unwrap_or_else(|| PathBuf::from(".outliner"))
}

type RawSettings = Map<String, Value>;

/// Handle to the settings file. Pass it to whatever needs live settings;
/// jobs only ever see the [`ConfigProfile`] resolved from it at submit time.
#[derive(Debug)]
pub struct SettingsStore {
    config_dir: PathBuf,
    path: PathBuf,
    data: RwLock<RawSettings>,
}

impl SettingsStore {
    /// Opens (or starts) the settings file inside `config_dir`.
    pub fn open<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref().to_path_buf();
        fs::create_dir_all(&config_dir).map_err(|e| ConfigError::WriteFile {
            path: config_dir.clone(),
            source: e,
        })?;

        let path = config_dir.join(SETTINGS_FILE_NAME);
        let data = load_raw(&path);

        Ok(Self {
            config_dir,
            path,
            data: RwLock::new(data),
        })
    }

    /// Re-reads the file, picking up edits made by other processes.
    pub fn reload(&self) {
        let data = load_raw(&self.path);
        *self.data.write().unwrap_or_else(PoisonError::into_inner) = data;
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn settings_path(&self) -> &Path {
        &self.path
    }

    /// Fixed destination root for artifacts.
    pub fn processed_folder(&self) -> PathBuf {
        self.config_dir.join(PROCESSED_DIR_NAME)
    }

    pub fn system_prompt_path(&self) -> PathBuf {
        self.config_dir.join(SYSTEM_PROMPT_FILE_NAME)
    }

    /// Creates the monitored folder and the destination root if missing.
    pub fn ensure_folders(&self) -> Result<(), ConfigError> {
        for dir in [self.text_folder(), self.processed_folder()] {
            fs::create_dir_all(&dir).map_err(|e| ConfigError::WriteFile {
                path: dir.clone(),
                source: e,
            })?;
        }
        Ok(())
    }

    pub(crate) fn read<T>(&self, f: impl FnOnce(&RawSettings) -> T) -> T {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Applies `f` to a copy of the settings, persists it, then commits it in
    /// memory. Nothing changes if `f` or the write fails.
    pub(crate) fn update(
        &self,
        f: impl FnOnce(&mut RawSettings) -> Result<(), ConfigError>,
    ) -> Result<(), ConfigError> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = guard.clone();
        f(&mut next)?;
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    fn persist(&self, data: &RawSettings) -> Result<(), ConfigError> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized).map_err(|e| ConfigError::WriteFile {
            path: self.path.clone(),
            source: e,
        })?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }

    pub fn model_settings(&self) -> ModelSettings {
        self.read(|raw| {
            let defaults = ModelSettings::default();

            let model = raw
                .get("model")
                .and_then(Value::as_str)
                .filter(|m| catalog::is_supported(m))
                .map(str::to_string)
                .unwrap_or(defaults.model);

            let temperature = raw
                .get("temperature")
                .and_then(as_f64_lenient)
                .filter(|t| validate_temperature(*t).is_ok())
                .unwrap_or(defaults.temperature);

            let top_p = raw
                .get("top_p")
                .and_then(as_f64_lenient)
                .filter(|p| validate_top_p(*p).is_ok())
                .unwrap_or(defaults.top_p);

            let output_format = raw
                .get("output_format")
                .and_then(Value::as_str)
                .and_then(OutputFormat::from_extension)
                .unwrap_or(defaults.output_format);

            ModelSettings {
                model,
                temperature: round4(temperature),
                top_p: round4(top_p),
                output_format,
            }
        })
    }

    pub fn set_model_settings(
        &self,
        update: ModelSettingsUpdate,
    ) -> Result<ModelSettings, ConfigError> {
        update.validate()?;
        self.update(|raw| {
            if let Some(model) = update.model {
                raw.insert("model".into(), Value::from(model));
            }
            if let Some(temperature) = update.temperature {
                raw.insert("temperature".into(), Value::from(temperature));
            }
            if let Some(top_p) = update.top_p {
                raw.insert("top_p".into(), Value::from(top_p));
            }
            if let Some(format) = update.output_format {
                raw.insert("output_format".into(), Value::from(format.extension()));
            }
            Ok(())
        })?;
        Ok(self.model_settings())
    }

    /// Folder monitored for source files. A stored folder that no longer
    /// exists falls back to the default `source` folder.
    pub fn text_folder(&self) -> PathBuf {
        let stored = self.read(|raw| {
            raw.get("text_folder")
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
        });
        match stored {
            Some(folder) if folder.is_dir() => folder,
            Some(folder) => {
                warn!(
                    "Configured text folder {} does not exist, using default",
                    folder.display()
                );
                self.default_text_folder()
            }
            None => self.default_text_folder(),
        }
    }

    pub fn default_text_folder(&self) -> PathBuf {
        self.config_dir.join(SOURCE_DIR_NAME)
    }

    /// Persists the folder to monitor. Relative paths resolve against the
    /// config directory.
    pub fn set_text_folder<P: AsRef<Path>>(&self, folder: P) -> Result<PathBuf, ConfigError> {
        let folder = folder.as_ref();
        if folder.as_os_str().is_empty() {
            return Err(ConfigError::validation("Text folder path cannot be empty."));
        }
        let candidate = if folder.is_absolute() {
            folder.to_path_buf()
        } else {
            self.config_dir.join(folder)
        };
        if !candidate.is_dir() {
            return Err(ConfigError::validation("Provided text folder does not exist."));
        }
        let normalized = fs::canonicalize(&candidate).map_err(|e| ConfigError::ReadFile {
            path: candidate.clone(),
            source: e,
        })?;

        let stored = normalized.to_string_lossy().into_owned();
        self.update(|raw| {
            raw.insert("text_folder".into(), Value::from(stored));
            Ok(())
        })?;
        Ok(normalized)
    }

    pub fn theme(&self) -> Theme {
        self.read(|raw| {
            raw.get("theme")
                .and_then(Value::as_str)
                .and_then(|t| t.parse().ok())
                .unwrap_or_default()
        })
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), ConfigError> {
        self.update(|raw| {
            raw.insert("theme".into(), Value::from(theme.to_string()));
            Ok(())
        })
    }

    pub fn prompts(&self) -> PromptStore<'_> {
        PromptStore::new(self)
    }

    /// Resolves a frozen profile from the current settings and the given
    /// prompt preset (or the default preset).
    pub fn profile(&self, prompt_id: Option<&str>) -> ConfigProfile {
        let settings = self.model_settings();
        let prompt = self.prompts().get(prompt_id);
        ConfigProfile {
            model: settings.model,
            temperature: Some(settings.temperature),
            top_p: Some(settings.top_p),
            output_format: settings.output_format,
            system_prompt: prompt.content,
        }
    }
}

fn load_raw(path: &Path) -> RawSettings {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return RawSettings::new(),
        Err(e) => {
            warn!("Failed to read settings from {}: {}", path.display(), e);
            return RawSettings::new();
        }
    };
    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!("Settings file {} is not a JSON object, ignoring", path.display());
            RawSettings::new()
        }
        Err(e) => {
            warn!("Settings file {} is invalid JSON: {}", path.display(), e);
            RawSettings::new()
        }
    }
}

fn as_f64_lenient(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
