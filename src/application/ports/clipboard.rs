//! System clipboard port interface

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::markdown::RichDocument;

/// Clipboard errors
#[derive(Debug, Clone, Error)]
pub enum ClipboardError {
    #[error("Clipboard access denied: {0}")]
    AccessDenied(String),

    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to write clipboard: {0}")]
    WriteFailed(String),
}

/// Port for the operating system's shared clipboard.
///
/// These four primitives are all the engine needs; which OS API backs
/// them is up to the adapter.
#[async_trait]
pub trait SystemClipboard: Send + Sync {
    /// Counter that changes whenever the clipboard content changes.
    async fn change_count(&self) -> Result<u64, ClipboardError>;

    /// Current text payload, `None` when the clipboard holds no text.
    async fn read_text(&self) -> Result<Option<String>, ClipboardError>;

    /// Replace the clipboard with plain text.
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;

    /// Replace the clipboard with a rich document plus a plain-text
    /// alternative for targets that cannot read rich content.
    async fn write_rich_text(
        &self,
        document: &RichDocument,
        plain: &str,
    ) -> Result<(), ClipboardError>;
}

/// Blanket implementation for shared clipboard handles
#[async_trait]
impl<T: SystemClipboard + ?Sized> SystemClipboard for Arc<T> {
    async fn change_count(&self) -> Result<u64, ClipboardError> {
        self.as_ref().change_count().await
    }

    async fn read_text(&self) -> Result<Option<String>, ClipboardError> {
        self.as_ref().read_text().await
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.as_ref().write_text(text).await
    }

    async fn write_rich_text(
        &self,
        document: &RichDocument,
        plain: &str,
    ) -> Result<(), ClipboardError> {
        self.as_ref().write_rich_text(document, plain).await
    }
}
