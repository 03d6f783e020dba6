//! Clipboard backends.

use crate::spec::ClipboardAccessError;

/// Plain-text clipboard boundary.
pub trait ClipboardBackend {
    /// Replace the clipboard contents with `text`.
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardAccessError>;
    /// Read the current clipboard text.
    fn read_text(&mut self) -> Result<String, ClipboardAccessError>;
}

/// In-process clipboard.
///
/// `if_deny_read` / `if_deny_write` simulate a host that refuses access.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
    pub if_deny_read: bool,
    pub if_deny_write: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clipboard preloaded with `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Last written text, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }
}

impl ClipboardBackend for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardAccessError> {
        if self.if_deny_write {
            return Err(ClipboardAccessError("write permission denied".to_string()));
        }
        self.text = Some(text.to_string());
        Ok(())
    }

    fn read_text(&mut self) -> Result<String, ClipboardAccessError> {
        if self.if_deny_read {
            return Err(ClipboardAccessError("read permission denied".to_string()));
        }
        Ok(self.text.clone().unwrap_or_default())
    }
}

/// OS clipboard via `arboard`.
///
/// A fresh `arboard::Clipboard` handle is opened per call, so the backend
/// itself holds no platform resources.
#[cfg(feature = "system-clipboard")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }

    fn open() -> Result<arboard::Clipboard, ClipboardAccessError> {
        arboard::Clipboard::new().map_err(|e| ClipboardAccessError(e.to_string()))
    }
}

#[cfg(feature = "system-clipboard")]
impl ClipboardBackend for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardAccessError> {
        Self::open()?
            .set_text(text)
            .map_err(|e| ClipboardAccessError(e.to_string()))
    }

    fn read_text(&mut self) -> Result<String, ClipboardAccessError> {
        Self::open()?
            .get_text()
            .map_err(|e| ClipboardAccessError(e.to_string()))
    }
}
