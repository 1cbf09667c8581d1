//! Clipboard targets for copying workspace buffers.

use crate::error::{NarrativeError, Result};

/// Something that can receive buffer text.
pub trait Clipboard {
    /// Replace the clipboard contents with `text`.
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// Keeps the last copied text in memory. Used headless and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last text copied, if any.
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// The platform clipboard.
#[cfg(feature = "system-clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let inner = arboard::Clipboard::new().map_err(|e| NarrativeError::Clipboard(e.to_string()))?;
        Ok(Self { inner })
    }
}

#[cfg(feature = "system-clipboard")]
impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text.to_string())
            .map_err(|e| NarrativeError::Clipboard(e.to_string()))
    }
}

/// Clipboard target used when the crate is built without system clipboard support.
#[cfg(not(feature = "system-clipboard"))]
pub struct SystemClipboard;

#[cfg(not(feature = "system-clipboard"))]
impl SystemClipboard {
    pub fn new() -> Result<Self> {
        Err(NarrativeError::Clipboard(
            "built without the system-clipboard feature".to_string(),
        ))
    }
}

#[cfg(not(feature = "system-clipboard"))]
impl Clipboard for SystemClipboard {
    fn set_text(&mut self, _text: &str) -> Result<()> {
        Err(NarrativeError::Clipboard(
            "built without the system-clipboard feature".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_keeps_last_text() {
        let mut clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.contents(), None);

        clipboard.set_text("first").unwrap();
        clipboard.set_text("second\n").unwrap();
        assert_eq!(clipboard.contents(), Some("second\n"));
    }
}
