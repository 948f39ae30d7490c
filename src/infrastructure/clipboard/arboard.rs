//! System clipboard adapter using arboard
//!
//! Works on Windows, macOS, and Linux (X11/Wayland). arboard exposes no
//! change counter, so one is derived from the hash of the text payload
//! (see [`ContentCounter`]).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::ports::{ClipboardError, SystemClipboard};
use crate::domain::entry::ContentHash;
use crate::domain::markdown::RichDocument;

/// System clipboard adapter using arboard
///
/// One arboard handle is kept for the adapter's lifetime: on Linux the
/// handle serves the written content to other applications.
pub struct ArboardClipboard {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    clipboard: Option<arboard::Clipboard>,
    counter: ContentCounter,
}

/// Change counter derived from clipboard content.
///
/// It only advances when the text differs from the last observation, so a
/// copy of text identical to what is already on the clipboard is never a
/// change. In particular, after an older entry is pasted back, copying that
/// same text again from another application is not captured.
#[derive(Debug, Default)]
struct ContentCounter {
    count: u64,
    last_seen: Option<ContentHash>,
}

impl ContentCounter {
    fn observe(&mut self, text: Option<&str>) -> u64 {
        let seen = text.map(ContentHash::of);
        if seen != self.last_seen {
            self.last_seen = seen;
            self.count += 1;
        }
        self.count
    }
}

impl Inner {
    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.clipboard.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.clipboard = Some(clipboard);
        }
        self.clipboard
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("clipboard not initialized".to_string()))
    }

    fn read_text(&mut self) -> Result<Option<String>, ClipboardError> {
        match self.handle()?.get_text() {
            Ok(text) => Ok(Some(text)),
            // images, files or an empty clipboard
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => {
                // reconnect on the next call
                self.clipboard = None;
                Err(read_error(e))
            }
        }
    }
}

fn read_error(error: arboard::Error) -> ClipboardError {
    match error {
        arboard::Error::ClipboardOccupied => ClipboardError::AccessDenied(error.to_string()),
        other => ClipboardError::Unavailable(other.to_string()),
    }
}

impl ArboardClipboard {
    /// Create a new arboard clipboard adapter; the OS handle is opened lazily
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    // arboard operations are blocking, so run in spawn_blocking
    async fn with_inner<T, F>(&self, op: F) -> Result<T, ClipboardError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Inner) -> Result<T, ClipboardError> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut guard = inner
                .lock()
                .map_err(|_| ClipboardError::Unavailable("clipboard lock poisoned".to_string()))?;
            op(&mut guard)
        })
        .await
        .map_err(|e| ClipboardError::Unavailable(format!("Task join error: {}", e)))?
    }
}

impl Default for ArboardClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SystemClipboard for ArboardClipboard {
    async fn change_count(&self) -> Result<u64, ClipboardError> {
        self.with_inner(|inner| {
            let text = inner.read_text()?;
            Ok(inner.counter.observe(text.as_deref()))
        })
        .await
    }

    async fn read_text(&self) -> Result<Option<String>, ClipboardError> {
        self.with_inner(Inner::read_text).await
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let text = text.to_owned();
        self.with_inner(move |inner| {
            inner
                .handle()?
                .set_text(text)
                .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
        })
        .await
    }

    async fn write_rich_text(
        &self,
        document: &RichDocument,
        plain: &str,
    ) -> Result<(), ClipboardError> {
        let html = document.to_html();
        let plain = plain.to_owned();
        self.with_inner(move |inner| {
            inner
                .handle()?
                .set_html(html, Some(plain))
                .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipboard_creates_without_touching_the_os() {
        let clipboard = ArboardClipboard::new();
        let inner = clipboard.inner.lock().unwrap();
        assert!(inner.clipboard.is_none());
        assert_eq!(inner.counter.count, 0);
    }

    #[test]
    fn counter_advances_only_when_content_differs() {
        let mut counter = ContentCounter::default();
        assert_eq!(counter.observe(Some("first")), 1);
        assert_eq!(counter.observe(Some("first")), 1);
        assert_eq!(counter.observe(Some("second")), 2);
        assert_eq!(counter.observe(None), 3);
        assert_eq!(counter.observe(None), 3);

        // same text written back and then copied again elsewhere
        assert_eq!(counter.observe(Some("first")), 4);
        assert_eq!(counter.observe(Some("first")), 4);
    }

    #[test]
    fn occupied_clipboard_maps_to_access_denied() {
        assert!(matches!(
            read_error(arboard::Error::ClipboardOccupied),
            ClipboardError::AccessDenied(_)
        ));
        assert!(matches!(
            read_error(arboard::Error::ClipboardNotSupported),
            ClipboardError::Unavailable(_)
        ));
    }
}
