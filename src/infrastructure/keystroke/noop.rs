//! No-op keystroke adapter

use async_trait::async_trait;

use crate::application::ports::{Keystroke, KeystrokeError};

/// Keystroke adapter that never injects anything.
///
/// Used when paste replay is disabled; entries are only copied.
pub struct NoOpKeystroke;

#[async_trait]
impl Keystroke for NoOpKeystroke {
    async fn send_paste(&self) -> Result<(), KeystrokeError> {
        Ok(())
    }
}
