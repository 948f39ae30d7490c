//! Clipboard infrastructure module
//!
//! arboard backs the system clipboard on every platform.

mod arboard;

pub use arboard::ArboardClipboard;
