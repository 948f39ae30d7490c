//! Keystroke infrastructure module
//!
//! Sends the paste chord using enigo (default) or, on Linux, a native
//! input tool.

mod enigo;
mod factory;
mod native;
mod noop;

pub use enigo::EnigoKeystroke;
pub use factory::{create_keystroke, detect_keystroke_tool, KeystrokeTool, KeystrokeToolPreference};
pub use native::NativeKeystroke;
pub use noop::NoOpKeystroke;
