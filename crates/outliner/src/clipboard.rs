//! System clipboard access.
//!
//! [`SystemClipboard`] is compiled with the `system-clipboard` feature. Without
//! it, a stub reports the clipboard as unavailable so callers can keep a single
//! code path.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Clipboard is unavailable: {0}")]
    Unavailable(String),

    #[error("Clipboard copy failed: {0}")]
    CopyFailed(String),
}

/// Destination for text copied after a successful job.
///
/// A single global resource: concurrent successes overwrite each other and
/// the last write wins.
pub trait Clipboard: Send + Sync {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Discards everything. For headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopClipboard;

impl Clipboard for NoopClipboard {
    fn set_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Ok(())
    }
}

#[cfg(feature = "system-clipboard")]
mod system {
    use std::sync::Mutex;

    use super::{Clipboard, ClipboardError};

    /// The desktop clipboard.
    ///
    /// Holds one handle for the life of the process; on X11 the copied text
    /// is served from it.
    pub struct SystemClipboard {
        inner: Mutex<arboard::Clipboard>,
    }

    impl SystemClipboard {
        pub fn new() -> Result<Self, ClipboardError> {
            let inner = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            Ok(Self {
                inner: Mutex::new(inner),
            })
        }
    }

    impl Clipboard for SystemClipboard {
        fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
            let mut guard = self
                .inner
                .lock()
                .map_err(|_| ClipboardError::CopyFailed("clipboard lock poisoned".to_string()))?;
            guard
                .set_text(text.to_owned())
                .map_err(|e| ClipboardError::CopyFailed(e.to_string()))
        }
    }
}

#[cfg(not(feature = "system-clipboard"))]
mod system {
    use super::{Clipboard, ClipboardError};

    /// Stand-in used when the `system-clipboard` feature is disabled.
    pub struct SystemClipboard;

    impl SystemClipboard {
        pub fn new() -> Result<Self, ClipboardError> {
            Err(ClipboardError::Unavailable(
                "built without the system-clipboard feature".to_string(),
            ))
        }
    }

    impl Clipboard for SystemClipboard {
        fn set_text(&self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Unavailable(
                "built without the system-clipboard feature".to_string(),
            ))
        }
    }
}

pub use system::SystemClipboard;
