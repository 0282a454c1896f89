pub mod prompts;
pub mod schema;
pub mod settings;

pub use prompts::{PromptPreset, PromptStore, DEFAULT_PROMPT_ID};
pub use schema::{ConfigProfile, ModelSettings, ModelSettingsUpdate, OutputFormat, Theme};
pub use settings::{default_config_dir, SettingsStore};
