//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces: system
//! clipboard, keystroke injection, permissions, history file, config file
//! and desktop notifications.

pub mod clipboard;
pub mod config;
pub mod keystroke;
pub mod notification;
pub mod permission;
pub mod persistence;

// Re-export adapters
pub use clipboard::ArboardClipboard;
pub use config::XdgConfigStore;
pub use keystroke::{create_keystroke, KeystrokeTool, KeystrokeToolPreference, NoOpKeystroke};
pub use notification::NotifyRustNotifier;
pub use permission::{SessionPermission, StaticPermission};
pub use persistence::JsonHistoryFile;
