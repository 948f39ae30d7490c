//! History persistence port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entry::ClipboardEntry;

/// Persistence errors
#[derive(Debug, Clone, Error)]
pub enum PersistenceError {
    #[error("Failed to read history file: {0}")]
    ReadFailed(String),

    #[error("History file is corrupt: {0}")]
    Corrupt(String),

    #[error("Failed to write history file: {0}")]
    WriteFailed(String),
}

/// Port for durable history storage
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Load entries in insertion order. A missing store loads as empty.
    async fn load(&self) -> Result<Vec<ClipboardEntry>, PersistenceError>;

    /// Replace the stored entries.
    async fn save(&self, entries: &[ClipboardEntry]) -> Result<(), PersistenceError>;

    /// Human-readable location for logs
    fn location(&self) -> String;
}
