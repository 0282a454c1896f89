//! Named system-prompt presets stored in the settings file.

use std::collections::HashSet;
use std::fs;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::settings::SettingsStore;
use crate::error::ConfigError;

/// Id of the built-in preset backed by `SYSTEM_PROMPT.txt`.
pub const DEFAULT_PROMPT_ID: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPreset {
    pub id: String,
    pub name: String,
    pub content: String,
}

/// Prompt preset operations over a [`SettingsStore`].
pub struct PromptStore<'a> {
    store: &'a SettingsStore,
}

impl<'a> PromptStore<'a> {
    pub(crate) fn new(store: &'a SettingsStore) -> Self {
        Self { store }
    }

    /// All presets, de-duplicated by id.
    ///
    /// The built-in default preset comes first unless a stored preset
    /// already uses its id. Entries without an id get a fresh random one.
    pub fn presets(&self) -> Vec<PromptPreset> {
        let stored = self.store.read(|raw| match raw.get("prompts") {
            Some(Value::Array(entries)) => entries.clone(),
            _ => Vec::new(),
        });

        let mut seen = HashSet::new();
        let mut presets = Vec::with_capacity(stored.len() + 1);
        for entry in stored {
            let Value::Object(entry) = entry else {
                continue;
            };
            let mut id = field_string(&entry, "id").trim().to_string();
            if id.is_empty() {
                id = uuid::Uuid::new_v4().to_string();
            }
            if !seen.insert(id.clone()) {
                continue;
            }
            let name = match field_string(&entry, "name").trim() {
                "" => id.clone(),
                name => name.to_string(),
            };
            let content = field_string(&entry, "content").trim().to_string();
            presets.push(PromptPreset { id, name, content });
        }

        if !seen.contains(DEFAULT_PROMPT_ID) {
            presets.insert(0, self.builtin());
        }
        presets
    }

    fn builtin(&self) -> PromptPreset {
        PromptPreset {
            id: DEFAULT_PROMPT_ID.to_string(),
            name: "Default (SYSTEM_PROMPT.txt)".to_string(),
            content: fs::read_to_string(self.store.system_prompt_path()).unwrap_or_default(),
        }
    }

    /// The active default id, falling back to [`DEFAULT_PROMPT_ID`] when the
    /// stored id is blank or no longer names a preset.
    pub fn default_prompt_id(&self) -> String {
        let stored = self.store.read(|raw| {
            raw.get("default_prompt_id")
                .map(value_string)
                .unwrap_or_default()
        });
        let stored = stored.trim();
        if stored.is_empty() || !self.presets().iter().any(|p| p.id == stored) {
            return DEFAULT_PROMPT_ID.to_string();
        }
        stored.to_string()
    }

    pub fn set_default_prompt_id(&self, prompt_id: &str) -> Result<(), ConfigError> {
        let prompt_id = prompt_id.trim();
        if prompt_id.is_empty() {
            return Err(ConfigError::validation("Prompt id cannot be empty."));
        }
        if !self.presets().iter().any(|p| p.id == prompt_id) {
            return Err(ConfigError::UnknownPrompt(prompt_id.to_string()));
        }
        self.store.update(|raw| {
            raw.insert("default_prompt_id".into(), Value::from(prompt_id));
            Ok(())
        })
    }

    /// The preset with `prompt_id`, or the default preset when the id is
    /// absent or unknown.
    pub fn get(&self, prompt_id: Option<&str>) -> PromptPreset {
        let presets = self.presets();
        if let Some(wanted) = prompt_id.filter(|id| !id.is_empty()) {
            if let Some(found) = presets.iter().find(|p| p.id == wanted) {
                return found.clone();
            }
        }
        let active = self.default_prompt_id();
        presets
            .iter()
            .find(|p| p.id == active)
            .or_else(|| presets.first())
            .cloned()
            .unwrap_or_else(|| self.builtin())
    }

    /// Creates or replaces a preset. A blank id creates a new preset with a
    /// random id.
    pub fn upsert(
        &self,
        preset_id: Option<&str>,
        name: &str,
        content: &str,
        set_default: bool,
    ) -> Result<PromptPreset, ConfigError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ConfigError::validation("Prompt name cannot be empty."));
        }
        if content.trim().is_empty() {
            return Err(ConfigError::validation("Prompt content cannot be empty."));
        }
        let preset_id = match preset_id.map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => uuid::Uuid::new_v4().to_string(),
        };

        self.store.update(|raw| {
            let mut prompts = match raw.remove("prompts") {
                Some(Value::Array(entries)) => entries,
                _ => Vec::new(),
            };

            let existing = prompts
                .iter_mut()
                .filter_map(Value::as_object_mut)
                .find(|obj| field_string(obj, "id").trim() == preset_id);
            match existing {
                Some(obj) => {
                    obj.insert("name".into(), Value::from(name));
                    obj.insert("content".into(), Value::from(content));
                }
                None => {
                    let preset = PromptPreset {
                        id: preset_id.clone(),
                        name: name.to_string(),
                        content: content.to_string(),
                    };
                    prompts.push(serde_json::to_value(preset)?);
                }
            }

            raw.insert("prompts".into(), Value::Array(prompts));
            if set_default {
                raw.insert("default_prompt_id".into(), Value::from(preset_id.clone()));
            }
            Ok(())
        })?;

        Ok(self.get(Some(&preset_id)))
    }
}

fn field_string(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key).map(value_string).unwrap_or_default()
}

fn value_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
