//! Application layer - Services and port interfaces
//!
//! Contains the clipboard engine services (watcher, history store,
//! dispatcher) and the trait definitions for external system interactions.

pub mod commands;
pub mod dispatcher;
pub mod engine;
pub mod events;
pub mod history_store;
pub mod persistence;
pub mod ports;
pub mod self_write;
pub mod watcher;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export services
pub use commands::HotkeyCommands;
pub use dispatcher::{DispatchError, DispatcherConfig, PasteDispatcher, PasteStatus, WrittenFormat};
pub use engine::{ClipboardEngine, EngineConfig, EngineError, EnginePorts};
pub use events::{EngineEvent, EventBus};
pub use history_store::HistoryStore;
pub use self_write::SelfWriteGuard;
pub use watcher::{ClipboardWatcher, PollOutcome, WatcherConfig};
