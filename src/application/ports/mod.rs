//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod clipboard;
pub mod config;
pub mod history_repository;
pub mod keystroke;
pub mod notifier;
pub mod permission;

// Re-export common types
pub use clipboard::{ClipboardError, SystemClipboard};
pub use config::ConfigStore;
pub use history_repository::{HistoryRepository, PersistenceError};
pub use keystroke::{Keystroke, KeystrokeError};
pub use notifier::{Notice, NotificationError, NotificationIcon, Notifier};
pub use permission::InjectionPermission;
