//! Cross-platform paste chord via enigo
//!
//! Works on Windows, macOS, and Linux (X11; Wayland via libei where
//! available).

use async_trait::async_trait;

use crate::application::ports::{Keystroke, KeystrokeError};

/// Paste modifier: Command on macOS, Control elsewhere
#[cfg(target_os = "macos")]
const PASTE_MODIFIER: enigo::Key = enigo::Key::Meta;
#[cfg(not(target_os = "macos"))]
const PASTE_MODIFIER: enigo::Key = enigo::Key::Control;

/// Keystroke adapter using enigo
pub struct EnigoKeystroke;

impl EnigoKeystroke {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnigoKeystroke {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Keystroke for EnigoKeystroke {
    async fn send_paste(&self) -> Result<(), KeystrokeError> {
        // enigo operations are blocking, so run in spawn_blocking
        tokio::task::spawn_blocking(|| {
            use enigo::{Direction, Enigo, Key, Keyboard, Settings};

            let failed = |e: enigo::InputError| KeystrokeError::InjectionFailed(e.to_string());

            let mut enigo = Enigo::new(&Settings::default()).map_err(|e| {
                KeystrokeError::InjectionFailed(format!("Failed to create enigo: {}", e))
            })?;

            enigo.key(PASTE_MODIFIER, Direction::Press).map_err(failed)?;
            let pressed = enigo.key(Key::Unicode('v'), Direction::Click);
            // always release the modifier, even if the click failed
            let released = enigo.key(PASTE_MODIFIER, Direction::Release);
            pressed.map_err(failed)?;
            released.map_err(failed)
        })
        .await
        .map_err(|e| KeystrokeError::InjectionFailed(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keystroke_creates_successfully() {
        let _keystroke = EnigoKeystroke::new();
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn paste_uses_control_outside_macos() {
        assert_eq!(PASTE_MODIFIER, enigo::Key::Control);
    }
}
