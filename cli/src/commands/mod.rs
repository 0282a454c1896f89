//! CLI commands, organized by domain:
//! - `files`: listing and opening source files, copying outlines
//! - `process`: running outline jobs
//! - `settings`: model, folder and theme settings
//! - `prompts`: system prompt presets

pub mod files;
pub mod process;
pub mod prompts;
pub mod settings;
