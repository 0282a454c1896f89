//! Shared state for CLI commands.

use std::path::PathBuf;
use std::sync::Arc;

use outliner::clipboard::{Clipboard, NoopClipboard, SystemClipboard};
use outliner::completion::OpenAiTransform;
use outliner::config::{default_config_dir, SettingsStore};
use outliner::secrets;
use outliner::Result;
use tracing::{debug, warn};

pub struct AppState {
    pub settings: SettingsStore,
    pub service: Arc<OpenAiTransform>,
    pub clipboard: Arc<dyn Clipboard>,
    pub clipboard_available: bool,
}

impl AppState {
    /// Opens the settings store and builds the completion client.
    ///
    /// A missing API key is allowed; commands that need the service report
    /// it when they run.
    pub fn load(config_dir: Option<PathBuf>, api_key_file: Option<&str>) -> Result<Self> {
        let config_dir = config_dir.unwrap_or_else(default_config_dir);
        let settings = SettingsStore::open(&config_dir)?;
        settings.ensure_folders()?;

        let api_key = secrets::resolve_api_key(None, api_key_file)?;
        if api_key.is_none() {
            debug!("No API key configured");
        }
        let service = OpenAiTransform::new(api_key)?;

        let (clipboard, clipboard_available): (Arc<dyn Clipboard>, bool) =
            match SystemClipboard::new() {
                Ok(clipboard) => (Arc::new(clipboard), true),
                Err(e) => {
                    warn!("Clipboard unavailable, outlines will not be copied: {}", e);
                    (Arc::new(NoopClipboard), false)
                }
            };

        Ok(Self {
            settings,
            service: Arc::new(service),
            clipboard,
            clipboard_available,
        })
    }
}
