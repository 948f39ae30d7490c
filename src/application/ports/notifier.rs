//! Notification port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::application::events::EngineEvent;

/// Notification errors
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Failed to show notification: {0}")]
    SendFailed(String),
}

/// Severity shown with a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationIcon {
    Info,
    Warning,
    Error,
}

impl NotificationIcon {
    /// Get the freedesktop icon name
    pub const fn icon_name(&self) -> &'static str {
        match self {
            Self::Info => "edit-paste",
            Self::Warning => "dialog-warning",
            Self::Error => "dialog-error",
        }
    }
}

/// Engine situations the user has to act on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Entry is on the clipboard but the paste chord could not be sent
    PastePermissionMissing,
    /// Capture dropped: every slot holds a favorite
    HistoryFull,
    SaveFailed(String),
    ClipboardUnavailable(String),
}

impl Notice {
    /// The notice an event warrants, if any
    pub fn from_event(event: &EngineEvent) -> Option<Self> {
        match event {
            EngineEvent::PastePermissionMissing => Some(Self::PastePermissionMissing),
            EngineEvent::EntryRejected => Some(Self::HistoryFull),
            EngineEvent::PersistenceFailed { message } => Some(Self::SaveFailed(message.clone())),
            EngineEvent::ClipboardUnavailable { message } => {
                Some(Self::ClipboardUnavailable(message.clone()))
            }
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::PastePermissionMissing => "Paste not permitted",
            Self::HistoryFull => "History full",
            Self::SaveFailed(_) => "History not saved",
            Self::ClipboardUnavailable(_) => "Clipboard unavailable",
        }
    }

    pub fn body(&self) -> String {
        match self {
            Self::PastePermissionMissing => {
                "The entry is on the clipboard. Grant input access or paste manually.".to_string()
            }
            Self::HistoryFull => {
                "Every slot holds a favorite; the copy was not recorded.".to_string()
            }
            Self::SaveFailed(message) | Self::ClipboardUnavailable(message) => message.clone(),
        }
    }

    pub fn icon(&self) -> NotificationIcon {
        match self {
            Self::HistoryFull => NotificationIcon::Info,
            Self::PastePermissionMissing | Self::ClipboardUnavailable(_) => {
                NotificationIcon::Warning
            }
            Self::SaveFailed(_) => NotificationIcon::Error,
        }
    }
}

/// Port for desktop notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: &Notice) -> Result<(), NotificationError>;
}
