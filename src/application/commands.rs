//! Entry points for the global-hotkey collaborator

use async_trait::async_trait;
use tracing::debug;

use super::dispatcher::PasteStatus;
use super::engine::{ClipboardEngine, EngineError};
use super::events::EngineEvent;

/// Parameterless commands bound to global hotkeys
#[async_trait]
pub trait HotkeyCommands: Send + Sync {
    /// Ask the presentation layer to show the history
    async fn on_show_history_requested(&self);

    /// Paste the latest entry with its rich representation when present
    async fn on_paste_rich_text_requested(&self) -> Result<PasteStatus, EngineError>;

    /// Paste the latest entry as plain text
    async fn on_paste_as_plain_text_requested(&self) -> Result<PasteStatus, EngineError>;
}

#[async_trait]
impl HotkeyCommands for ClipboardEngine {
    async fn on_show_history_requested(&self) {
        debug!("show history requested");
        self.events().publish(EngineEvent::ShowHistoryRequested);
    }

    async fn on_paste_rich_text_requested(&self) -> Result<PasteStatus, EngineError> {
        self.paste_latest(true).await
    }

    async fn on_paste_as_plain_text_requested(&self) -> Result<PasteStatus, EngineError> {
        self.paste_latest(false).await
    }
}
